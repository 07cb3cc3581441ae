//! Status-count rollups over the domain model.
//!
//! [`ReportStats`] is built exactly once per run with a single bottom-up
//! pass: step counts sum into their owning scenario, scenario counts into
//! their owning feature, feature counts into the suite total. Orthogonally,
//! each scenario's counts also sum into every tag it carries, so tag totals
//! intentionally need not sum to suite totals when scenarios carry multiple
//! tags. All getters are pure reads of the memoized snapshot.

use chrono::Utc;
use cuke_model::{Feature, ResultSet, Scenario, Status, TagIndex};
use serde::Serialize;

/// Timestamp format shared by every rendered page.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

// ============================================================================
// StatusCounts
// ============================================================================

/// Step counts per status at one granularity level.
///
/// The level invariant `total == passed+failed+skipped+pending+undefined`
/// holds by construction: every step is counted exactly once per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Number of passed steps.
    pub passed: usize,
    /// Number of failed steps.
    pub failed: usize,
    /// Number of skipped steps.
    pub skipped: usize,
    /// Number of pending steps.
    pub pending: usize,
    /// Number of undefined steps.
    pub undefined: usize,
}

impl StatusCounts {
    /// Counts one step outcome.
    pub fn add(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Skipped => self.skipped += 1,
            Status::Pending => self.pending += 1,
            Status::Undefined => self.undefined += 1,
        }
    }

    /// Sums another level's counts into this one.
    pub fn merge(&mut self, other: &Self) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.pending += other.pending;
        self.undefined += other.undefined;
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: Status) -> usize {
        match status {
            Status::Passed => self.passed,
            Status::Failed => self.failed,
            Status::Skipped => self.skipped,
            Status::Pending => self.pending,
            Status::Undefined => self.undefined,
        }
    }

    /// Total step count across all five statuses.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.pending + self.undefined
    }
}

// ============================================================================
// StatusPolicy and StatusColor
// ============================================================================

/// Configured failure policies for lenient step outcomes.
///
/// These arrive from the report configuration; nothing here is ambient or
/// process-global.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusPolicy {
    /// When enabled, a skipped step fails its feature/tag.
    pub skip_failures: bool,
    /// When enabled, an undefined step fails its feature/tag.
    pub undefined_failures: bool,
}

/// Derived pass/fail color of a feature or tag page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    /// All steps passed, or only lenient outcomes under a lenient policy.
    Pass,
    /// At least one failing outcome under the configured policy.
    Fail,
}

impl StatusColor {
    /// Hex color used by the rendered pages.
    #[must_use]
    pub const fn hex(&self) -> &'static str {
        match self {
            Self::Pass => "#C5D88A",
            Self::Fail => "#D88A8A",
        }
    }

    /// Applies the fixed precedence over a set of counts: failed beats
    /// skipped-under-policy beats undefined-under-policy beats pass.
    #[must_use]
    pub const fn from_counts(counts: &StatusCounts, policy: StatusPolicy) -> Self {
        if counts.failed > 0 {
            Self::Fail
        } else if counts.skipped > 0 && policy.skip_failures {
            Self::Fail
        } else if counts.undefined > 0 && policy.undefined_failures {
            Self::Fail
        } else {
            Self::Pass
        }
    }
}

// ============================================================================
// Per-level snapshots
// ============================================================================

/// Rollup for one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioStats {
    /// Scenario name.
    pub name: String,
    /// Step counts of the scenario.
    pub counts: StatusCounts,
    /// Total step duration in nanoseconds.
    pub duration_ns: u64,
    /// Whether the scenario contains at least one failed step.
    pub failed: bool,
}

/// Rollup for one feature.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureStats {
    /// Feature name.
    pub name: String,
    /// Output file name of the feature page.
    pub file_name: String,
    /// Step counts summed over the feature's scenarios.
    pub counts: StatusCounts,
    /// Total step duration in nanoseconds.
    pub duration_ns: u64,
    /// Per-scenario rollups in declaration order.
    pub scenarios: Vec<ScenarioStats>,
    /// Scenarios without a failed step.
    pub scenarios_passed: usize,
    /// Scenarios with at least one failed step.
    pub scenarios_failed: usize,
    /// Derived pass/fail color under the configured policy.
    pub color: StatusColor,
}

/// Rollup for one tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagStats {
    /// Tag name including its leading `@`.
    pub name: String,
    /// Step counts summed over the scenarios carrying the tag.
    pub counts: StatusCounts,
    /// Total step duration in nanoseconds.
    pub duration_ns: u64,
    /// Number of scenarios carrying the tag.
    pub scenario_count: usize,
    /// Scenarios without a failed step.
    pub scenarios_passed: usize,
    /// Scenarios with at least one failed step.
    pub scenarios_failed: usize,
    /// Derived pass/fail color under the configured policy.
    pub color: StatusColor,
}

/// Suite-level rollup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteStats {
    /// Number of features.
    pub feature_count: usize,
    /// Number of scenarios.
    pub scenario_count: usize,
    /// Step counts over the whole suite.
    pub counts: StatusCounts,
    /// Total step duration in nanoseconds.
    pub duration_ns: u64,
    /// Scenarios without a failed step.
    pub scenarios_passed: usize,
    /// Scenarios with at least one failed step.
    pub scenarios_failed: usize,
}

/// Totals across the tag index (not required to equal suite totals).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagTotals {
    /// Number of distinct tags.
    pub tag_count: usize,
    /// Tagged scenario occurrences, counted once per carried tag.
    pub scenario_count: usize,
    /// Occurrences without a failed step.
    pub scenarios_passed: usize,
    /// Occurrences with at least one failed step.
    pub scenarios_failed: usize,
    /// Step counts summed over all tag entries.
    pub counts: StatusCounts,
    /// Duration summed over all tag entries, in nanoseconds.
    pub duration_ns: u64,
}

// ============================================================================
// ReportStats
// ============================================================================

/// Immutable statistic snapshot over one domain model.
///
/// Built exactly once; consumers only read. Construction requires a fully
/// built model and tag index - there is no way to obtain a `ReportStats`
/// after a parse failure, which is what makes the orchestrator's "no stats,
/// build failed" rule possible.
#[derive(Debug, Clone)]
pub struct ReportStats {
    suite: SuiteStats,
    features: Vec<FeatureStats>,
    tags: Vec<TagStats>,
    tag_totals: TagTotals,
    timestamp: String,
}

impl ReportStats {
    /// Computes the full rollup in one bottom-up pass.
    #[must_use]
    pub fn build(results: &ResultSet, tags: &TagIndex, policy: StatusPolicy) -> Self {
        let mut suite = SuiteStats::default();
        let mut features = Vec::with_capacity(results.feature_count());

        for feature in results.features() {
            let stats = feature_stats(feature, policy);
            suite.counts.merge(&stats.counts);
            suite.duration_ns += stats.duration_ns;
            suite.scenario_count += stats.scenarios.len();
            suite.scenarios_passed += stats.scenarios_passed;
            suite.scenarios_failed += stats.scenarios_failed;
            features.push(stats);
        }
        suite.feature_count = features.len();

        let mut tag_stats = Vec::with_capacity(tags.len());
        let mut tag_totals = TagTotals {
            tag_count: tags.len(),
            ..TagTotals::default()
        };
        for (name, refs) in tags.iter() {
            let stats = tag_entry(name, refs, results, policy);
            tag_totals.scenario_count += stats.scenario_count;
            tag_totals.scenarios_passed += stats.scenarios_passed;
            tag_totals.scenarios_failed += stats.scenarios_failed;
            tag_totals.counts.merge(&stats.counts);
            tag_totals.duration_ns += stats.duration_ns;
            tag_stats.push(stats);
        }

        Self {
            suite,
            features,
            tags: tag_stats,
            tag_totals,
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Suite-level totals.
    #[must_use]
    pub const fn suite(&self) -> &SuiteStats {
        &self.suite
    }

    /// Per-feature rollups in insertion order.
    #[must_use]
    pub fn features(&self) -> &[FeatureStats] {
        &self.features
    }

    /// Per-tag rollups in tag-index insertion order.
    #[must_use]
    pub fn tags(&self) -> &[TagStats] {
        &self.tags
    }

    /// Totals across the tag index.
    #[must_use]
    pub const fn tag_totals(&self) -> &TagTotals {
        &self.tag_totals
    }

    /// Formatted timestamp captured when the snapshot was built.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Suite duration as a fixed `H:MM:SS` string.
    #[must_use]
    pub fn total_duration_text(&self) -> String {
        format_duration(self.suite.duration_ns)
    }

    /// Tag-index duration as a fixed `H:MM:SS` string.
    #[must_use]
    pub fn tag_duration_text(&self) -> String {
        format_duration(self.tag_totals.duration_ns)
    }
}

fn scenario_stats(scenario: &Scenario) -> ScenarioStats {
    let mut counts = StatusCounts::default();
    for step in &scenario.steps {
        counts.add(step.status);
    }
    ScenarioStats {
        name: scenario.name.clone(),
        counts,
        duration_ns: scenario.duration_ns(),
        failed: scenario.is_failed(),
    }
}

fn feature_stats(feature: &Feature, policy: StatusPolicy) -> FeatureStats {
    let scenarios: Vec<ScenarioStats> = feature.scenarios.iter().map(scenario_stats).collect();

    let mut counts = StatusCounts::default();
    let mut duration_ns = 0u64;
    let mut scenarios_failed = 0usize;
    for s in &scenarios {
        counts.merge(&s.counts);
        duration_ns += s.duration_ns;
        if s.failed {
            scenarios_failed += 1;
        }
    }

    FeatureStats {
        name: feature.name.clone(),
        file_name: feature.file_name(),
        color: StatusColor::from_counts(&counts, policy),
        scenarios_passed: scenarios.len() - scenarios_failed,
        scenarios_failed,
        counts,
        duration_ns,
        scenarios,
    }
}

fn tag_entry(
    name: &str,
    refs: &[cuke_model::ScenarioRef],
    results: &ResultSet,
    policy: StatusPolicy,
) -> TagStats {
    let mut counts = StatusCounts::default();
    let mut duration_ns = 0u64;
    let mut scenarios_failed = 0usize;
    let mut scenario_count = 0usize;

    for r in refs {
        let Some(scenario) = TagIndex::resolve(results, *r) else {
            continue;
        };
        scenario_count += 1;
        for step in &scenario.steps {
            counts.add(step.status);
        }
        duration_ns += scenario.duration_ns();
        if scenario.is_failed() {
            scenarios_failed += 1;
        }
    }

    TagStats {
        name: name.to_string(),
        color: StatusColor::from_counts(&counts, policy),
        scenarios_passed: scenario_count - scenarios_failed,
        scenarios_failed,
        scenario_count,
        counts,
        duration_ns,
    }
}

/// Fixed unit conversion from nanoseconds to `H:MM:SS`.
#[must_use]
pub fn format_duration(duration_ns: u64) -> String {
    let total_secs = duration_ns / 1_000_000_000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

// ============================================================================
// Tests
// ============================================================================
