//! Parser for cucumber-style JSON test-run documents.
//!
//! One document is a JSON array of features; each feature carries `elements`
//! (scenarios and backgrounds) and each element carries `steps` with a
//! `result { status, duration }`. Background steps are folded into the
//! scenario that follows them, matching how execution interleaves them.
//!
//! Malformed or unreadable documents are fatal to the whole run and surface
//! as [`ModelError::Parse`].

use std::path::Path;

use serde::Deserialize;

use crate::{Feature, ModelError, Result, ResultSet, Scenario, Status, Step};

// Raw serde shapes for the wire format. Field absence is common in real
// documents, so everything defaults.

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    tags: Vec<RawTag>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    name: String,
    #[serde(default)]
    keyword: String,
    result: Option<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(default)]
    status: String,
    #[serde(default)]
    duration: u64,
}

/// Parses one report document into its features.
pub fn parse_file(path: &Path) -> Result<Vec<Feature>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ModelError::parse(path, format!("failed to read file: {e}")))?;
    let raw: Vec<RawFeature> = serde_json::from_str(&contents)
        .map_err(|e| ModelError::parse(path, e.to_string()))?;
    Ok(raw.into_iter().map(into_feature).collect())
}

/// Parses all input documents into a [`ResultSet`], grouping each document's
/// features under the document's file stem and preserving input order.
pub fn parse_documents(paths: &[impl AsRef<Path>]) -> Result<ResultSet> {
    let mut results = ResultSet::new();
    for path in paths {
        let path = path.as_ref();
        let features = parse_file(path)?;
        results.add_project(project_key(path), features);
    }
    Ok(results)
}

/// Project key for a document: its file stem, falling back to the full path.
fn project_key(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

fn into_feature(raw: RawFeature) -> Feature {
    let mut scenarios = Vec::new();
    let mut background: Vec<Step> = Vec::new();

    for element in raw.elements {
        if element.kind == "background" {
            // Held until the next scenario; executions run the background
            // before each scenario's own steps.
            background = element.steps.into_iter().map(into_step).collect();
            continue;
        }

        let mut steps = std::mem::take(&mut background);
        steps.extend(element.steps.into_iter().map(into_step));
        scenarios.push(Scenario {
            keyword: element.keyword,
            name: element.name,
            tags: element.tags.into_iter().map(|t| t.name).collect(),
            steps,
        });
    }

    Feature {
        name: raw.name,
        uri: raw.uri,
        scenarios,
    }
}

fn into_step(raw: RawStep) -> Step {
    // A step without a result never ran a matching definition.
    let (status, duration_ns) = raw.result.map_or((Status::Undefined, 0), |r| {
        (Status::from_label(&r.status), r.duration)
    });
    Step {
        keyword: raw.keyword,
        name: raw.name,
        status,
        duration_ns,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCUMENT: &str = r#"[
      {
        "name": "Account login",
        "uri": "features/login.feature",
        "elements": [
          {
            "type": "background",
            "keyword": "Background",
            "name": "session",
            "steps": [
              {"keyword": "Given ", "name": "a browser",
               "result": {"status": "passed", "duration": 1000}}
            ]
          },
          {
            "type": "scenario",
            "keyword": "Scenario",
            "name": "valid credentials",
            "tags": [{"name": "@smoke"}],
            "steps": [
              {"keyword": "When ", "name": "I log in",
               "result": {"status": "passed", "duration": 2000}},
              {"keyword": "Then ", "name": "I see my dashboard",
               "result": {"status": "failed", "duration": 500}}
            ]
          },
          {
            "type": "scenario",
            "keyword": "Scenario",
            "name": "missing step",
            "steps": [
              {"keyword": "When ", "name": "something unwritten"}
            ]
          }
        ]
      }
    ]"#;

    fn write_document(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_file_builds_features() {
        let file = write_document(DOCUMENT);
        let features = parse_file(file.path()).unwrap();

        assert_eq!(features.len(), 1);
        let feature = &features[0];
        assert_eq!(feature.name, "Account login");
        assert_eq!(feature.scenarios.len(), 2);
    }

    #[test]
    fn test_background_steps_fold_into_next_scenario() {
        let file = write_document(DOCUMENT);
        let features = parse_file(file.path()).unwrap();
        let scenario = &features[0].scenarios[0];

        assert_eq!(scenario.name, "valid credentials");
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[0].name, "a browser");
        assert_eq!(scenario.tags, vec!["@smoke"]);
    }

    #[test]
    fn test_step_without_result_is_undefined() {
        let file = write_document(DOCUMENT);
        let features = parse_file(file.path()).unwrap();
        let step = &features[0].scenarios[1].steps[0];

        assert_eq!(step.status, Status::Undefined);
        assert_eq!(step.duration_ns, 0);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = write_document("{ not json");
        let err = parse_file(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let err = parse_file(Path::new("/nonexistent/run.json")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/nonexistent/run.json"));
    }

    #[test]
    fn test_parse_documents_groups_by_file_stem() {
        let file = write_document(DOCUMENT);
        let results = parse_documents(&[file.path()]).unwrap();

        let (key, features) = results.projects().next().unwrap();
        let stem = file
            .path()
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(key, stem);
        assert_eq!(features.len(), 1);
    }
}
