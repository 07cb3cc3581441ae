//! Derived tag index over a fully constructed feature tree.
//!
//! Tags are discovered, never declared: a tag exists in the index only
//! because at least one scenario carries it. The index stores positions
//! rather than references so the tree stays plainly owned; it must be rebuilt
//! whenever the tree is rebuilt.

use indexmap::IndexMap;

use crate::{ResultSet, Scenario};

/// Position of a scenario inside a [`ResultSet`]: flat feature index plus
/// scenario index within that feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioRef {
    /// Index of the owning feature in flat insertion order.
    pub feature: usize,
    /// Index of the scenario within the feature.
    pub scenario: usize,
}

/// Insertion-ordered mapping from tag name to the scenarios carrying it.
///
/// Tag order is discovery order: the order tags are first encountered while
/// walking features and scenarios in insertion order. A scenario carrying
/// multiple tags appears under each of them.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: IndexMap<String, Vec<ScenarioRef>>,
}

impl TagIndex {
    /// Builds the index with one pass over all scenarios.
    #[must_use]
    pub fn build(results: &ResultSet) -> Self {
        let mut tags: IndexMap<String, Vec<ScenarioRef>> = IndexMap::new();
        for (feature_idx, feature) in results.features().enumerate() {
            for (scenario_idx, scenario) in feature.scenarios.iter().enumerate() {
                for tag in &scenario.tags {
                    tags.entry(tag.clone()).or_default().push(ScenarioRef {
                        feature: feature_idx,
                        scenario: scenario_idx,
                    });
                }
            }
        }
        Self { tags }
    }

    /// Iterates tags in discovery order with the scenarios carrying them.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ScenarioRef])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if no scenario carried any tag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Resolves a stored position back to its scenario.
    #[must_use]
    pub fn resolve<'a>(results: &'a ResultSet, r: ScenarioRef) -> Option<&'a Scenario> {
        results.features().nth(r.feature)?.scenarios.get(r.scenario)
    }
}
