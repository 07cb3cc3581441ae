//! Typed view-models, one per page kind.
//!
//! Every page carries the same [`PageMeta`] block; this fixed field set is
//! the compatibility contract with the template-rendering collaborator.
//! Each page struct enumerates exactly what its template may reference -
//! there is no free-form key/value context.

use serde::Serialize;

use crate::aggregate::{FeatureStats, StatusCounts, TagStats, TagTotals};
use crate::charts::{DonutPayload, TagChartPayload};
use crate::screenshots::CorrelationFailure;

/// Fields present on every rendered page.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    /// Generator version identifier.
    pub version: String,
    /// Opaque CI build number.
    pub build_number: String,
    /// Opaque CI project name.
    pub build_project: String,
    /// Whether the report is hosted by a CI server.
    pub from_ci: bool,
    /// Base URL path; empty input is normalized to `/` upstream.
    pub base_url: String,
    /// Formatted generation timestamp (`dd-MM-yyyy HH:mm:ss`).
    pub time_stamp: String,
}

/// The suite overview page (`feature-overview.html`).
#[derive(Debug, Clone, Serialize)]
pub struct FeatureOverviewPage {
    /// Shared page fields.
    pub meta: PageMeta,
    /// Per-feature rollups in insertion order.
    pub features: Vec<FeatureStats>,
    /// Number of features.
    pub total_features: usize,
    /// Number of scenarios.
    pub total_scenarios: usize,
    /// Suite step counts.
    pub counts: StatusCounts,
    /// Scenarios without a failed step.
    pub scenarios_passed: usize,
    /// Scenarios with at least one failed step.
    pub scenarios_failed: usize,
    /// Suite duration as `H:MM:SS`.
    pub total_duration: String,
    /// Step-status donut payload.
    pub step_chart: DonutPayload,
    /// Scenario pass/fail pie payload.
    pub scenario_chart: DonutPayload,
}

/// One feature page, named by the feature's own output file name.
#[derive(Debug, Clone, Serialize)]
pub struct FeaturePage {
    /// Shared page fields.
    pub meta: PageMeta,
    /// The feature's rollup including its scenarios.
    pub feature: FeatureStats,
    /// Whether artifact embedding is enabled.
    pub artifacts_enabled: bool,
}

/// One tag page (`<tag without leading @, trimmed>.html`).
#[derive(Debug, Clone, Serialize)]
pub struct TagPage {
    /// Shared page fields.
    pub meta: PageMeta,
    /// The tag's rollup.
    pub tag: TagStats,
}

/// The tag overview page (`tag-overview.html`).
#[derive(Debug, Clone, Serialize)]
pub struct TagOverviewPage {
    /// Shared page fields.
    pub meta: PageMeta,
    /// Per-tag rollups in insertion order.
    pub tags: Vec<TagStats>,
    /// Totals across the tag index.
    pub totals: TagTotals,
    /// Tag-index duration as `H:MM:SS`.
    pub total_duration: String,
    /// Stacked-column payload.
    pub chart: TagChartPayload,
}

/// The screenshot correlation page (`screenshot-overview.html`).
#[derive(Debug, Clone, Serialize)]
pub struct ScreenshotPage {
    /// Shared page fields.
    pub meta: PageMeta,
    /// All rewritten screenshot paths in discovery order.
    pub image_paths: Vec<String>,
    /// Ordered grouping from scenario key to rewritten paths.
    pub grouped_images: Vec<(String, Vec<String>)>,
    /// Paths that could not be correlated.
    pub failures: Vec<CorrelationFailureView>,
}

/// Serializable form of a correlation diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationFailureView {
    /// The rewritten path that failed to correlate.
    pub path: String,
    /// Why the key could not be derived.
    pub reason: String,
}

impl From<&CorrelationFailure> for CorrelationFailureView {
    fn from(f: &CorrelationFailure) -> Self {
        Self {
            path: f.path.clone(),
            reason: f.reason.clone(),
        }
    }
}

/// The fallback error page, written over `feature-overview.html` when the
/// pipeline cannot complete normally.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPage {
    /// Shared page fields.
    pub meta: PageMeta,
    /// Human-readable description of the failure.
    pub error_message: String,
}

/// Output file name of a tag page: the tag name without its leading `@`,
/// trimmed, plus `.html`.
#[must_use]
pub fn tag_file_name(tag_name: &str) -> String {
    format!("{}.html", tag_name.replace('@', "").trim())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_file_name_strips_at_and_trims() {
        assert_eq!(tag_file_name("@smoke"), "smoke.html");
        assert_eq!(tag_file_name(" @fast "), "fast.html");
        assert_eq!(tag_file_name("plain"), "plain.html");
    }
}
