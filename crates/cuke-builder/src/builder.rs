//! The report generation orchestrator.
//!
//! [`ReportBuilder`] sequences the whole pipeline: parse the input
//! documents, build the aggregate snapshot, provision static resources,
//! then render every page from immutable data. Failures never unwind
//! through the pipeline; the builder reacts to each one according to its
//! current [`BuildPhase`], which is what guarantees at most one fallback
//! error page per run.

use chrono::Utc;
use cuke_model::{parser, TagIndex};
use cuke_report::aggregate::{ReportStats, TIMESTAMP_FORMAT};
use cuke_report::charts::{donut_chart, scenario_pie, tag_chart};
use cuke_report::render::{write_page, HtmlEngine, TemplateEngine};
use cuke_report::screenshots::ScreenshotScan;
use cuke_report::views::{
    tag_file_name, ErrorPage, FeatureOverviewPage, FeaturePage, PageMeta, ScreenshotPage,
    TagOverviewPage, TagPage,
};

use crate::config::ReportConfig;
use crate::error::{BuildError, Result};
use crate::phase::{BuildPhase, BuildStatus};

/// Version identifier stamped onto every page.
pub const VERSION: &str = concat!("cukereport-", env!("CARGO_PKG_VERSION"));

/// File name of the suite overview page; the fallback error page overwrites
/// this same file.
pub const OVERVIEW_FILE: &str = "feature-overview.html";

/// File name of the tag overview page.
pub const TAG_OVERVIEW_FILE: &str = "tag-overview.html";

/// File name of the screenshot correlation page.
pub const SCREENSHOT_FILE: &str = "screenshot-overview.html";

/// Orchestrates one report generation run.
pub struct ReportBuilder<E = HtmlEngine> {
    config: ReportConfig,
    engine: E,
    phase: BuildPhase,
    stats: Option<ReportStats>,
}

impl ReportBuilder<HtmlEngine> {
    /// Creates a builder using the built-in HTML engine.
    #[must_use]
    pub const fn new(config: ReportConfig) -> Self {
        Self::with_engine(config, HtmlEngine::new())
    }
}

impl<E: TemplateEngine> ReportBuilder<E> {
    /// Creates a builder rendering through the given template engine.
    #[must_use]
    pub const fn with_engine(config: ReportConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            phase: BuildPhase::Init,
            stats: None,
        }
    }

    /// Current pipeline phase.
    #[must_use]
    pub const fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// The aggregate snapshot, present once parsing succeeded.
    #[must_use]
    pub const fn stats(&self) -> Option<&ReportStats> {
        self.stats.as_ref()
    }

    /// Pass/fail signal for the CI caller, derived solely from the
    /// suite-level failing-step count. `Failed` when the snapshot was never
    /// built.
    #[must_use]
    pub fn build_status(&self) -> BuildStatus {
        self.stats.as_ref().map_or(BuildStatus::Failed, |stats| {
            if stats.suite().counts.failed > 0 {
                BuildStatus::Failed
            } else {
                BuildStatus::Passed
            }
        })
    }

    /// Runs the whole pipeline and returns the terminal phase.
    ///
    /// On a parse or provisioning failure the fallback error page is the
    /// only artifact. A failure during page rendering renders the fallback
    /// page once and the remaining independent renders still run; their
    /// failures are logged only.
    pub fn build(&mut self) -> BuildPhase {
        self.phase = BuildPhase::Parsing;
        if let Err(e) = self.parse_and_aggregate() {
            self.fail(&e);
            return self.phase;
        }

        self.phase = BuildPhase::Generating;
        if let Err(e) = self.provision() {
            // Every page references the provisioned assets, so none may
            // render; the fallback page stays the only artifact.
            self.fail(&e);
            return self.phase;
        }
        self.render_all();

        if self.phase != BuildPhase::Failed {
            self.phase = BuildPhase::Done;
        }
        self.phase
    }

    fn parse_and_aggregate(&mut self) -> Result<()> {
        tracing::info!(documents = self.config.input_documents.len(), "parsing input documents");
        let results = parser::parse_documents(&self.config.input_documents)?;
        let tags = TagIndex::build(&results);
        self.stats = Some(ReportStats::build(
            &results,
            &tags,
            self.config.status_policy(),
        ));
        Ok(())
    }

    fn provision(&self) -> Result<()> {
        cuke_report::resources::provision(
            &self.config.output_dir,
            self.config.chart_mode(),
            self.config.embed_artifacts,
        )?;
        Ok(())
    }

    fn render_all(&mut self) {
        let Some(stats) = self.stats.clone() else {
            return;
        };

        self.render("feature overview", |b| b.render_overview(&stats));

        for feature in stats.features() {
            self.render("feature page", |b| {
                let page = FeaturePage {
                    meta: b.meta(&stats),
                    feature: feature.clone(),
                    artifacts_enabled: b.config.embed_artifacts,
                };
                let html = b.engine.feature(&page);
                write_page(&b.config.output_dir, &feature.file_name, &html)?;
                Ok(())
            });
        }

        for tag in stats.tags() {
            self.render("tag page", |b| {
                let page = TagPage {
                    meta: b.meta(&stats),
                    tag: tag.clone(),
                };
                let html = b.engine.tag(&page);
                write_page(&b.config.output_dir, &tag_file_name(&tag.name), &html)?;
                Ok(())
            });
        }

        self.render("tag overview", |b| b.render_tag_overview(&stats));
        self.render("screenshot page", |b| b.render_screenshots(&stats));
    }

    /// Runs one independent render, reacting to a failure according to the
    /// current phase: the first failure produces the fallback page, later
    /// ones are logged only.
    fn render(&mut self, what: &str, f: impl FnOnce(&Self) -> Result<()>) {
        match f(self) {
            Ok(()) => tracing::debug!(page = what, "rendered"),
            Err(e) => {
                tracing::error!(page = what, error = %e, "render failed");
                self.fail(&e);
            }
        }
    }

    fn render_overview(&self, stats: &ReportStats) -> Result<()> {
        let suite = stats.suite();
        let mode = self.config.chart_mode();
        let page = FeatureOverviewPage {
            meta: self.meta(stats),
            features: stats.features().to_vec(),
            total_features: suite.feature_count,
            total_scenarios: suite.scenario_count,
            counts: suite.counts,
            scenarios_passed: suite.scenarios_passed,
            scenarios_failed: suite.scenarios_failed,
            total_duration: stats.total_duration_text(),
            step_chart: donut_chart(mode, &suite.counts),
            scenario_chart: scenario_pie(mode, suite.scenarios_passed, suite.scenarios_failed),
        };
        let html = self.engine.feature_overview(&page);
        write_page(&self.config.output_dir, OVERVIEW_FILE, &html)?;
        Ok(())
    }

    fn render_tag_overview(&self, stats: &ReportStats) -> Result<()> {
        let page = TagOverviewPage {
            meta: self.meta(stats),
            tags: stats.tags().to_vec(),
            totals: stats.tag_totals().clone(),
            total_duration: stats.tag_duration_text(),
            chart: tag_chart(self.config.chart_mode(), stats.tags()),
        };
        let html = self.engine.tag_overview(&page);
        write_page(&self.config.output_dir, TAG_OVERVIEW_FILE, &html)?;
        Ok(())
    }

    fn render_screenshots(&self, stats: &ReportStats) -> Result<()> {
        let scan = ScreenshotScan::scan(&self.config.output_dir, &self.config.build_number);
        let page = ScreenshotPage {
            meta: self.meta(stats),
            image_paths: scan.image_paths().to_vec(),
            grouped_images: scan
                .groups()
                .map(|(k, v)| (k.to_string(), v.to_vec()))
                .collect(),
            failures: scan.failures().iter().map(Into::into).collect(),
        };
        let html = self.engine.screenshots(&page);
        write_page(&self.config.output_dir, SCREENSHOT_FILE, &html)?;
        Ok(())
    }

    /// Enters the `Failed` phase and renders the fallback error page.
    ///
    /// Only the transition into `Failed` renders the page; when already
    /// failed, the error is logged and nothing is re-rendered.
    fn fail(&mut self, error: &BuildError) {
        if self.phase == BuildPhase::Failed {
            tracing::warn!(error = %error, "already failed, suppressing further error pages");
            return;
        }
        self.phase = BuildPhase::Failed;
        tracing::error!(error = %error, "report generation failed, writing fallback page");

        let page = ErrorPage {
            meta: self.fallback_meta(),
            error_message: error.to_string(),
        };
        let html = self.engine.error(&page);
        if let Err(e) = write_page(&self.config.output_dir, OVERVIEW_FILE, &html) {
            tracing::error!(error = %e, "failed to write fallback error page");
        }
    }

    fn meta(&self, stats: &ReportStats) -> PageMeta {
        PageMeta {
            version: VERSION.to_string(),
            build_number: self.config.build_number.clone(),
            build_project: self.config.build_project.clone(),
            from_ci: self.config.from_ci,
            base_url: self.config.base_url_path().to_string(),
            time_stamp: stats.timestamp().to_string(),
        }
    }

    /// Page meta for the error page, which must render even when no
    /// snapshot exists.
    fn fallback_meta(&self) -> PageMeta {
        let time_stamp = self.stats.as_ref().map_or_else(
            || Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            |s| s.timestamp().to_string(),
        );
        PageMeta {
            version: VERSION.to_string(),
            build_number: self.config.build_number.clone(),
            build_project: self.config.build_project.clone(),
            from_ci: self.config.from_ci,
            base_url: self.config.base_url_path().to_string(),
            time_stamp,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
