//! Chart-data adaptation for the three charting backends.
//!
//! The same status counts must be re-encoded for three incompatible
//! backends, selected by configuration; the adapter never chooses the mode
//! itself. The legacy backend wants one encoded chart object, the generic
//! backend wants ordered color lists and per-tag rows, and the rich backend
//! wants a categories array with parallel per-status series whose index
//! alignment is a strict invariant.

use std::fmt::Write;

use cuke_model::Status;
use serde::Serialize;

use crate::aggregate::{StatusCounts, TagStats};

/// Charting backend selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// Legacy vector-graphic charts (single encoded chart object).
    Legacy,
    /// Generic script-driven charts.
    Generic,
    /// Rich script-driven charts with separate category/series arrays.
    Rich,
}

/// The four statuses that appear as chart slices/columns, in canonical
/// order. Undefined steps show up in the tabular counts but not in charts.
pub const CHART_STATUSES: [Status; 4] = [
    Status::Passed,
    Status::Failed,
    Status::Skipped,
    Status::Pending,
];

/// Slice color for a charted status.
#[must_use]
pub const fn chart_color(status: Status) -> &'static str {
    match status {
        Status::Passed => "#88dd11",
        Status::Failed => "#cc1134",
        Status::Skipped => "#88aaff",
        Status::Pending => "#fbb957",
        Status::Undefined => "#fbb907",
    }
}

// ============================================================================
// Donut / pie payloads
// ============================================================================

/// Backend-specific donut/pie payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DonutPayload {
    /// One encoded chart object for the legacy backend.
    Legacy {
        /// The encoded chart document.
        encoded: String,
    },
    /// Colors ordered by descending slice value for the script backends.
    Ordered {
        /// Colors of the slices, largest first.
        colors: Vec<String>,
    },
}

/// Encodes the step-status donut for the selected backend.
///
/// For the script backends the entries are ordered by descending count with
/// a stable tie-break in original status order, so the largest slice renders
/// first.
#[must_use]
pub fn donut_chart(mode: ChartMode, counts: &StatusCounts) -> DonutPayload {
    let entries: Vec<(Status, usize)> = CHART_STATUSES
        .iter()
        .map(|s| (*s, counts.get(*s)))
        .collect();
    match mode {
        ChartMode::Legacy => DonutPayload::Legacy {
            encoded: encode_legacy_pie("Step results", &entries),
        },
        ChartMode::Generic | ChartMode::Rich => DonutPayload::Ordered {
            colors: ordered_colors(&entries),
        },
    }
}

/// Encodes the scenario pass/fail pie for the selected backend.
#[must_use]
pub fn scenario_pie(mode: ChartMode, passed: usize, failed: usize) -> DonutPayload {
    let entries = vec![(Status::Passed, passed), (Status::Failed, failed)];
    match mode {
        ChartMode::Legacy => DonutPayload::Legacy {
            encoded: encode_legacy_pie("Scenario results", &entries),
        },
        ChartMode::Generic | ChartMode::Rich => DonutPayload::Ordered {
            colors: ordered_colors(&entries),
        },
    }
}

/// Orders slice colors by descending count.
///
/// `sort_by_key` is stable, so ties keep the original status order.
fn ordered_colors(entries: &[(Status, usize)]) -> Vec<String> {
    let mut ordered: Vec<(Status, usize)> = entries.to_vec();
    ordered.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    ordered
        .into_iter()
        .map(|(status, _)| chart_color(status).to_string())
        .collect()
}

fn encode_legacy_pie(caption: &str, entries: &[(Status, usize)]) -> String {
    let mut encoded = format!(
        "<chart caption='{}' showPercentageValues='1'>",
        escape_attribute(caption)
    );
    for (status, count) in entries {
        let _ = write!(
            encoded,
            "<set label='{}' value='{}' color='{}'/>",
            escape_attribute(&status.to_string()),
            count,
            chart_color(*status)
        );
    }
    encoded.push_str("</chart>");
    encoded
}

/// Escapes a value for a single-quoted attribute of the encoded chart
/// object.
fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

// ============================================================================
// Tag stacked-column payloads
// ============================================================================

/// One generic-backend row: a tag and its charted counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRow {
    /// Tag name.
    pub tag: String,
    /// Passed step count.
    pub passed: usize,
    /// Failed step count.
    pub failed: usize,
    /// Skipped step count.
    pub skipped: usize,
    /// Pending step count.
    pub pending: usize,
}

/// One rich-backend series: a status with its per-category values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSeries {
    /// Status name of the series.
    pub name: String,
    /// Series color.
    pub color: String,
    /// Value at index `i` belongs to `categories[i]`.
    pub data: Vec<usize>,
}

/// Rich-backend stacked-column chart: categories with parallel series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RichTagChart {
    /// Tag names in tag-index insertion order.
    pub categories: Vec<String>,
    /// One series per charted status; every series is category-aligned.
    pub series: Vec<StatusSeries>,
}

/// Backend-specific tag stacked-column payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TagChartPayload {
    /// One encoded chart object for the legacy backend.
    Legacy {
        /// The encoded chart document.
        encoded: String,
    },
    /// One row per tag for the generic backend.
    Rows {
        /// Rows in tag-index insertion order.
        rows: Vec<TagRow>,
    },
    /// Categories plus parallel series for the rich backend.
    Rich(RichTagChart),
}

/// Encodes the per-tag stacked-column chart for the selected backend.
///
/// All encodings derive their ordering from the slice order of `tags`, which
/// is the tag index's insertion order.
#[must_use]
pub fn tag_chart(mode: ChartMode, tags: &[TagStats]) -> TagChartPayload {
    match mode {
        ChartMode::Legacy => TagChartPayload::Legacy {
            encoded: encode_legacy_tag_chart(tags),
        },
        ChartMode::Generic => TagChartPayload::Rows {
            rows: tags
                .iter()
                .map(|t| TagRow {
                    tag: t.name.clone(),
                    passed: t.counts.passed,
                    failed: t.counts.failed,
                    skipped: t.counts.skipped,
                    pending: t.counts.pending,
                })
                .collect(),
        },
        ChartMode::Rich => TagChartPayload::Rich(RichTagChart {
            categories: tags.iter().map(|t| t.name.clone()).collect(),
            series: CHART_STATUSES
                .iter()
                .map(|status| StatusSeries {
                    name: status.to_string(),
                    color: chart_color(*status).to_string(),
                    data: tags.iter().map(|t| t.counts.get(*status)).collect(),
                })
                .collect(),
        }),
    }
}

fn encode_legacy_tag_chart(tags: &[TagStats]) -> String {
    let mut encoded =
        String::from("<chart caption='Steps per tag' useRoundEdges='1'><categories>");
    for tag in tags {
        let _ = write!(encoded, "<category label='{}'/>", escape_attribute(&tag.name));
    }
    encoded.push_str("</categories>");
    for status in CHART_STATUSES {
        let _ = write!(
            encoded,
            "<dataset seriesName='{}' color='{}'>",
            escape_attribute(&status.to_string()),
            chart_color(status)
        );
        for tag in tags {
            let _ = write!(encoded, "<set value='{}'/>", tag.counts.get(status));
        }
        encoded.push_str("</dataset>");
    }
    encoded.push_str("</chart>");
    encoded
}

// ============================================================================
// Tests
// ============================================================================
