//! The template-engine seam and the built-in HTML engine.
//!
//! The text-rendering engine is an external collaborator: the orchestrator
//! only talks to the [`TemplateEngine`] trait, one method per page kind,
//! each taking that page's typed view-model. [`HtmlEngine`] is the built-in
//! implementation producing self-contained HTML referencing the provisioned
//! theme assets.

use std::fmt::Write as _;
use std::path::Path;

use crate::aggregate::{FeatureStats, StatusCounts};
use crate::charts::{DonutPayload, TagChartPayload};
use crate::views::{
    ErrorPage, FeatureOverviewPage, FeaturePage, PageMeta, ScreenshotPage, TagOverviewPage,
    TagPage,
};
use crate::{ReportError, Result};

/// Renders each page kind from its typed view-model.
pub trait TemplateEngine {
    /// Renders the suite overview page.
    fn feature_overview(&self, page: &FeatureOverviewPage) -> String;
    /// Renders one feature page.
    fn feature(&self, page: &FeaturePage) -> String;
    /// Renders one tag page.
    fn tag(&self, page: &TagPage) -> String;
    /// Renders the tag overview page.
    fn tag_overview(&self, page: &TagOverviewPage) -> String;
    /// Renders the screenshot correlation page.
    fn screenshots(&self, page: &ScreenshotPage) -> String;
    /// Renders the fallback error page.
    fn error(&self, page: &ErrorPage) -> String;
}

/// Writes one rendered page into the output directory.
pub fn write_page(report_dir: &Path, file_name: &str, contents: &str) -> Result<()> {
    std::fs::write(report_dir.join(file_name), contents)
        .map_err(|e| ReportError::page_write(file_name, e))
}

/// Built-in HTML renderer.
///
/// Pages are deliberately plain: visual layout is owned by the provisioned
/// theme stylesheet, not by this engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEngine;

impl HtmlEngine {
    /// Creates the engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_header(out: &mut String, meta: &PageMeta, title: &str) {
        let _ = write!(
            out,
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
             <title>{}</title>\
             <link rel=\"stylesheet\" href=\"css/style.css\">\
             </head><body>",
            escape_html(title)
        );
        let _ = write!(
            out,
            "<div class=\"header\"><h1>{}</h1>\
             <span class=\"project\">{}</span>\
             <span class=\"build\">build {}</span></div>",
            escape_html(title),
            escape_html(&meta.build_project),
            escape_html(&meta.build_number)
        );
    }

    fn write_footer(out: &mut String, meta: &PageMeta) {
        let _ = write!(
            out,
            "<div class=\"footer\">{} | generated {}{}</div></body></html>",
            escape_html(&meta.version),
            escape_html(&meta.time_stamp),
            if meta.from_ci {
                format!(" | <a href=\"{}\">CI</a>", escape_html(&meta.base_url))
            } else {
                String::new()
            }
        );
    }

    fn write_counts_row(out: &mut String, counts: &StatusCounts) {
        let _ = write!(
            out,
            "<td class=\"passed\">{}</td><td class=\"failed\">{}</td>\
             <td class=\"skipped\">{}</td><td class=\"pending\">{}</td>\
             <td class=\"undefined\">{}</td><td class=\"total\">{}</td>",
            counts.passed,
            counts.failed,
            counts.skipped,
            counts.pending,
            counts.undefined,
            counts.total()
        );
    }

    fn write_feature_row(out: &mut String, feature: &FeatureStats) {
        let _ = write!(
            out,
            "<tr style=\"background-color:{}\"><td><a href=\"{}\">{}</a></td>",
            feature.color.hex(),
            feature.file_name,
            escape_html(&feature.name)
        );
        Self::write_counts_row(out, &feature.counts);
        let _ = write!(
            out,
            "<td>{}</td></tr>",
            crate::aggregate::format_duration(feature.duration_ns)
        );
    }

    fn write_donut(out: &mut String, id: &str, chart: &DonutPayload) {
        match chart {
            DonutPayload::Legacy { encoded } => {
                let _ = write!(
                    out,
                    "<div id=\"{id}\" class=\"chart legacy\">{}</div>",
                    escape_html(encoded)
                );
            }
            DonutPayload::Ordered { colors } => {
                let _ = write!(out, "<div id=\"{id}\" class=\"chart\" data-colors=\"");
                let _ = write!(out, "{}", colors.join(","));
                out.push_str("\"></div>");
            }
        }
    }

    fn write_tag_chart(out: &mut String, chart: &TagChartPayload) {
        match chart {
            TagChartPayload::Legacy { encoded } => {
                let _ = write!(
                    out,
                    "<div class=\"chart legacy\">{}</div>",
                    escape_html(encoded)
                );
            }
            TagChartPayload::Rows { rows } => {
                out.push_str("<table class=\"chart-rows\">");
                for row in rows {
                    let _ = write!(
                        out,
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        escape_html(&row.tag),
                        row.passed,
                        row.failed,
                        row.skipped,
                        row.pending
                    );
                }
                out.push_str("</table>");
            }
            TagChartPayload::Rich(rich) => {
                let _ = write!(
                    out,
                    "<div class=\"chart rich\" data-categories=\"{}\">",
                    escape_html(&rich.categories.join(","))
                );
                for series in &rich.series {
                    let values: Vec<String> =
                        series.data.iter().map(std::string::ToString::to_string).collect();
                    let _ = write!(
                        out,
                        "<span class=\"series\" data-name=\"{}\" data-values=\"{}\"></span>",
                        escape_html(&series.name),
                        values.join(",")
                    );
                }
                out.push_str("</div>");
            }
        }
    }
}

impl TemplateEngine for HtmlEngine {
    fn feature_overview(&self, page: &FeatureOverviewPage) -> String {
        let mut out = String::new();
        Self::write_header(&mut out, &page.meta, "Feature Overview");

        let _ = write!(
            out,
            "<div class=\"totals\">{} features, {} scenarios ({} passed, {} failed), \
             {} steps, duration {}</div>",
            page.total_features,
            page.total_scenarios,
            page.scenarios_passed,
            page.scenarios_failed,
            page.counts.total(),
            page.total_duration
        );
        Self::write_donut(&mut out, "step-chart", &page.step_chart);
        Self::write_donut(&mut out, "scenario-chart", &page.scenario_chart);

        out.push_str(
            "<table class=\"stats\"><tr><th>Feature</th><th>Passed</th><th>Failed</th>\
             <th>Skipped</th><th>Pending</th><th>Undefined</th><th>Total</th>\
             <th>Duration</th></tr>",
        );
        for feature in &page.features {
            Self::write_feature_row(&mut out, feature);
        }
        out.push_str("</table>");

        Self::write_footer(&mut out, &page.meta);
        out
    }

    fn feature(&self, page: &FeaturePage) -> String {
        let mut out = String::new();
        Self::write_header(&mut out, &page.meta, &page.feature.name);

        let _ = write!(
            out,
            "<div class=\"feature\" style=\"background-color:{}\">",
            page.feature.color.hex()
        );
        for scenario in &page.feature.scenarios {
            let _ = write!(
                out,
                "<div class=\"scenario {}\"><h2>{}</h2><table class=\"stats\"><tr>",
                if scenario.failed { "failed" } else { "passed" },
                escape_html(&scenario.name)
            );
            Self::write_counts_row(&mut out, &scenario.counts);
            out.push_str("</tr></table></div>");
        }
        out.push_str("</div>");
        if page.artifacts_enabled {
            out.push_str("<div class=\"artifacts\" data-viewer=\"enabled\"></div>");
        }

        Self::write_footer(&mut out, &page.meta);
        out
    }

    fn tag(&self, page: &TagPage) -> String {
        let mut out = String::new();
        Self::write_header(&mut out, &page.meta, &page.tag.name);

        let _ = write!(
            out,
            "<div class=\"tag\" style=\"background-color:{}\">\
             {} scenarios ({} passed, {} failed)</div><table class=\"stats\"><tr>",
            page.tag.color.hex(),
            page.tag.scenario_count,
            page.tag.scenarios_passed,
            page.tag.scenarios_failed
        );
        Self::write_counts_row(&mut out, &page.tag.counts);
        out.push_str("</tr></table>");

        Self::write_footer(&mut out, &page.meta);
        out
    }

    fn tag_overview(&self, page: &TagOverviewPage) -> String {
        let mut out = String::new();
        Self::write_header(&mut out, &page.meta, "Tag Overview");

        let _ = write!(
            out,
            "<div class=\"totals\">{} tags, {} scenarios ({} passed, {} failed), \
             {} steps, duration {}</div>",
            page.totals.tag_count,
            page.totals.scenario_count,
            page.totals.scenarios_passed,
            page.totals.scenarios_failed,
            page.totals.counts.total(),
            page.total_duration
        );
        Self::write_tag_chart(&mut out, &page.chart);

        out.push_str(
            "<table class=\"stats\"><tr><th>Tag</th><th>Passed</th><th>Failed</th>\
             <th>Skipped</th><th>Pending</th><th>Undefined</th><th>Total</th></tr>",
        );
        for tag in &page.tags {
            let _ = write!(
                out,
                "<tr style=\"background-color:{}\"><td><a href=\"{}\">{}</a></td>",
                tag.color.hex(),
                crate::views::tag_file_name(&tag.name),
                escape_html(&tag.name)
            );
            Self::write_counts_row(&mut out, &tag.counts);
            out.push_str("</tr>");
        }
        out.push_str("</table>");

        Self::write_footer(&mut out, &page.meta);
        out
    }

    fn screenshots(&self, page: &ScreenshotPage) -> String {
        let mut out = String::new();
        Self::write_header(&mut out, &page.meta, "Screenshots");

        for (key, paths) in &page.grouped_images {
            let _ = write!(out, "<div class=\"group\"><h2>{}</h2>", escape_html(key));
            for path in paths {
                let _ = write!(
                    out,
                    "<a href=\"{0}\"><img src=\"{0}\" alt=\"{1}\"></a>",
                    escape_html(path),
                    escape_html(key)
                );
            }
            out.push_str("</div>");
        }
        if !page.failures.is_empty() {
            out.push_str("<div class=\"diagnostics\"><h2>Uncorrelated screenshots</h2><ul>");
            for failure in &page.failures {
                let _ = write!(
                    out,
                    "<li>{}: {}</li>",
                    escape_html(&failure.path),
                    escape_html(&failure.reason)
                );
            }
            out.push_str("</ul></div>");
        }

        Self::write_footer(&mut out, &page.meta);
        out
    }

    fn error(&self, page: &ErrorPage) -> String {
        let mut out = String::new();
        Self::write_header(&mut out, &page.meta, "Report generation failed");
        let _ = write!(
            out,
            "<div class=\"error\"><pre>{}</pre></div>",
            escape_html(&page.error_message)
        );
        Self::write_footer(&mut out, &page.meta);
        out
    }
}

/// Escapes user content for HTML text and attribute positions.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}

// ============================================================================
// Tests
// ============================================================================
