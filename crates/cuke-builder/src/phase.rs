//! Pipeline phase tracking.
//!
//! The builder moves through these phases:
//! - `Init` -> `Parsing` -> `Generating` -> `Done`
//! - `Parsing` -> `Failed` (parse/aggregation failure)
//! - `Generating` -> `Failed` (first generation failure)
//!
//! `Failed` is terminal and is what guarantees at most one fallback error
//! page: entering it renders the page, and it can only be entered once.

use serde::{Deserialize, Serialize};

/// Current phase of the report pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    /// Builder constructed, nothing parsed yet.
    #[default]
    Init,
    /// Parsing input documents and building the aggregate snapshot.
    Parsing,
    /// Rendering pages from the immutable snapshots.
    Generating,
    /// All pages were rendered.
    Done,
    /// The run failed; the fallback error page is the only overview artifact.
    Failed,
}

impl BuildPhase {
    /// Returns `true` if no further work will happen in this run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Init => "init",
            Self::Parsing => "parsing",
            Self::Generating => "generating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// Pass/fail signal for the CI caller.
///
/// Derived solely from the suite-level failing-step count; independent of
/// the error-page mechanism, which is about report-generation failures, not
/// test-result failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    /// No failing steps in the suite.
    Passed,
    /// At least one failing step, or the aggregate was never built.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(BuildPhase::Done.is_terminal());
        assert!(BuildPhase::Failed.is_terminal());
        assert!(!BuildPhase::Init.is_terminal());
        assert!(!BuildPhase::Parsing.is_terminal());
        assert!(!BuildPhase::Generating.is_terminal());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(BuildPhase::Generating.to_string(), "generating");
        assert_eq!(BuildPhase::Failed.to_string(), "failed");
    }
}
