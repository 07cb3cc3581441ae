//! Domain model for cukereport.
//!
//! The model is an immutable ownership tree: a [`ResultSet`] groups
//! [`Feature`]s per project, each feature owns its [`Scenario`]s in
//! declaration order and each scenario owns its [`Step`]s in execution order.
//! A derived [`TagIndex`] provides the cross-cutting tag navigation.
//!
//! The model is constructed once per report run by the [`parser`] module and
//! is read-only afterwards; nothing downstream mutates it.

pub mod parser;
mod tags;

pub use tags::{ScenarioRef, TagIndex};

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Types
// ============================================================================

/// Errors produced while building the domain model from input documents.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An input document could not be read or contained malformed JSON.
    #[error("failed to parse report document '{path}': {message}")]
    Parse {
        /// Path to the offending document.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },
}

impl ModelError {
    /// Creates a new `Parse` error.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for model construction.
pub type Result<T> = std::result::Result<T, ModelError>;

// ============================================================================
// Status
// ============================================================================

/// Outcome of a single executed step.
///
/// Exactly five values are representable; unknown strings in input documents
/// are mapped to [`Status::Undefined`] at the parser boundary so the enum
/// stays closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Step executed and succeeded.
    Passed,
    /// Step executed and failed.
    Failed,
    /// Step was skipped because an earlier step failed.
    Skipped,
    /// Step is marked pending by the test author.
    Pending,
    /// Step has no matching definition.
    Undefined,
}

impl Status {
    /// All statuses in their canonical order.
    pub const ALL: [Self; 5] = [
        Self::Passed,
        Self::Failed,
        Self::Skipped,
        Self::Pending,
        Self::Undefined,
    ];

    /// Maps a raw status label to a `Status`, defaulting unknown labels to
    /// [`Status::Undefined`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "skipped" => Self::Skipped,
            "pending" => Self::Pending,
            _ => Self::Undefined,
        }
    }

    /// Returns the lowercase label used in input documents and page classes.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Pending => "pending",
            Self::Undefined => "undefined",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Step
// ============================================================================

/// The smallest executed unit, owned exclusively by its [`Scenario`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Gherkin keyword ("Given ", "When ", ...).
    pub keyword: String,
    /// Step text.
    pub name: String,
    /// Outcome of the step.
    pub status: Status,
    /// Execution duration in nanoseconds.
    pub duration_ns: u64,
}

// ============================================================================
// Scenario
// ============================================================================

/// One executed test case: an ordered sequence of steps plus its tag names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Gherkin keyword ("Scenario", "Scenario Outline").
    pub keyword: String,
    /// Scenario name.
    pub name: String,
    /// Tag names carried by the scenario, with their leading `@`.
    pub tags: Vec<String>,
    /// Steps in execution order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Returns `true` if any step in the scenario has the given status.
    #[must_use]
    pub fn has_status(&self, status: Status) -> bool {
        self.steps.iter().any(|s| s.status == status)
    }

    /// A scenario is failed if it contains at least one failed step,
    /// independent of any configured skip/undefined policy.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.has_status(Status::Failed)
    }

    /// Total duration of all steps in nanoseconds.
    #[must_use]
    pub fn duration_ns(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_ns).sum()
    }
}

// ============================================================================
// Feature
// ============================================================================

/// A named collection of scenarios; the unit of one generated report page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name.
    pub name: String,
    /// Source uri of the feature file; basis of the output file name.
    pub uri: String,
    /// Scenarios in declaration order.
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Name of the report page generated for this feature.
    ///
    /// The uri is sanitised so it is safe as a file name: every character
    /// outside `[0-9A-Za-z_]` becomes `-`, then `.html` is appended.
    #[must_use]
    pub fn file_name(&self) -> String {
        let mut name: String = self
            .uri
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        name.push_str(".html");
        name
    }

    /// Returns `true` if any scenario in the feature has a step with the
    /// given status.
    #[must_use]
    pub fn has_status(&self, status: Status) -> bool {
        self.scenarios.iter().any(|s| s.has_status(status))
    }
}

// ============================================================================
// ResultSet
// ============================================================================

/// The complete parsed result of one report run.
///
/// Features are grouped under an insertion-ordered project key (one entry per
/// input document) for multi-project reports. Flat iteration over all
/// features preserves that insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    projects: IndexMap<String, Vec<Feature>>,
}

impl ResultSet {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends features under the given project key, preserving insertion
    /// order. Repeated keys extend the existing feature list.
    pub fn add_project(&mut self, key: impl Into<String>, features: Vec<Feature>) {
        self.projects.entry(key.into()).or_default().extend(features);
    }

    /// Iterates projects in insertion order.
    pub fn projects(&self) -> impl Iterator<Item = (&str, &[Feature])> {
        self.projects.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterates all features across projects in insertion order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.projects.values().flatten()
    }

    /// Number of features across all projects.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.projects.values().map(Vec::len).sum()
    }

    /// Number of scenarios across all features.
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.features().map(|f| f.scenarios.len()).sum()
    }

    /// Returns `true` if the set holds no features at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.feature_count() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn step(status: Status) -> Step {
        Step {
            keyword: "Given ".to_string(),
            name: "a step".to_string(),
            status,
            duration_ns: 1_000_000,
        }
    }

    fn scenario(statuses: &[Status], tags: &[&str]) -> Scenario {
        Scenario {
            keyword: "Scenario".to_string(),
            name: "a scenario".to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            steps: statuses.iter().copied().map(step).collect(),
        }
    }

    #[test]
    fn test_status_from_label_known_values() {
        assert_eq!(Status::from_label("passed"), Status::Passed);
        assert_eq!(Status::from_label("failed"), Status::Failed);
        assert_eq!(Status::from_label("skipped"), Status::Skipped);
        assert_eq!(Status::from_label("pending"), Status::Pending);
        assert_eq!(Status::from_label("undefined"), Status::Undefined);
    }

    #[test]
    fn test_status_from_label_unknown_maps_to_undefined() {
        assert_eq!(Status::from_label("ambiguous"), Status::Undefined);
        assert_eq!(Status::from_label(""), Status::Undefined);
    }

    #[test]
    fn test_scenario_is_failed() {
        assert!(scenario(&[Status::Passed, Status::Failed], &[]).is_failed());
        assert!(!scenario(&[Status::Passed, Status::Skipped], &[]).is_failed());
    }

    #[test]
    fn test_scenario_duration_sums_steps() {
        let s = scenario(&[Status::Passed, Status::Passed, Status::Passed], &[]);
        assert_eq!(s.duration_ns(), 3_000_000);
    }

    #[test]
    fn test_feature_file_name_sanitises_uri() {
        let feature = Feature {
            name: "Login".to_string(),
            uri: "features/auth/login.feature".to_string(),
            scenarios: vec![],
        };
        assert_eq!(feature.file_name(), "features-auth-login-feature.html");
    }

    #[test]
    fn test_feature_file_name_keeps_underscores() {
        let feature = Feature {
            name: "X".to_string(),
            uri: "my_feature".to_string(),
            scenarios: vec![],
        };
        assert_eq!(feature.file_name(), "my_feature.html");
    }

    #[test]
    fn test_result_set_preserves_insertion_order() {
        let mut set = ResultSet::new();
        set.add_project(
            "beta",
            vec![Feature {
                name: "B".to_string(),
                uri: "b".to_string(),
                scenarios: vec![],
            }],
        );
        set.add_project(
            "alpha",
            vec![Feature {
                name: "A".to_string(),
                uri: "a".to_string(),
                scenarios: vec![],
            }],
        );

        let keys: Vec<_> = set.projects().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["beta", "alpha"]);

        let names: Vec<_> = set.features().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_result_set_repeated_key_extends() {
        let mut set = ResultSet::new();
        let feature = |name: &str| Feature {
            name: name.to_string(),
            uri: name.to_string(),
            scenarios: vec![],
        };
        set.add_project("p", vec![feature("one")]);
        set.add_project("p", vec![feature("two")]);

        assert_eq!(set.projects().count(), 1);
        assert_eq!(set.feature_count(), 2);
    }
}
