//! End-to-end integration tests for cukereport
//!
//! These tests drive the complete pipeline from cucumber JSON documents
//! through aggregation to the rendered HTML report directory.

use std::fs;
use std::path::{Path, PathBuf};

use cuke_builder::{BuildPhase, BuildStatus, ReportBuilder, ReportConfig};
use cuke_model::{parser, TagIndex};
use cuke_report::aggregate::{ReportStats, StatusPolicy};

/// Path to the sample result document fixture.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/shop-run.json")
}

fn config(output_dir: &Path) -> ReportConfig {
    ReportConfig {
        input_documents: vec![fixture_path()],
        output_dir: output_dir.to_path_buf(),
        build_number: "42".to_string(),
        build_project: "shop".to_string(),
        ..ReportConfig::default()
    }
}

/// Collects every file under `dir` as a sorted list of relative paths.
fn file_set(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).expect("Failed to read output directory") {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .expect("Entry outside the output root");
                out.push(relative.to_string_lossy().into_owned());
            }
        }
    }
    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

/// Tests that the fixture document parses into the expected model shape.
#[test]
fn test_fixture_parses_with_folded_background() {
    let results =
        parser::parse_documents(&[fixture_path()]).expect("Failed to parse fixture document");

    assert_eq!(results.feature_count(), 2);
    assert_eq!(results.scenario_count(), 3);

    let login = results
        .features()
        .next()
        .expect("First feature missing");
    assert_eq!(login.name, "Account login");
    // The background step folds into the first real scenario.
    assert_eq!(login.scenarios[0].steps.len(), 3);
    assert_eq!(login.scenarios[0].steps[0].name, "a registered user");
}

/// Tests the suite rollup over the fixture document.
#[test]
fn test_fixture_suite_rollup() {
    let results =
        parser::parse_documents(&[fixture_path()]).expect("Failed to parse fixture document");
    let tags = TagIndex::build(&results);
    let stats = ReportStats::build(&results, &tags, StatusPolicy::default());

    let suite = stats.suite();
    assert_eq!(suite.counts.passed, 4);
    assert_eq!(suite.counts.failed, 1);
    assert_eq!(suite.counts.skipped, 1);
    assert_eq!(suite.counts.pending, 1);
    // The step without a result block counts as undefined.
    assert_eq!(suite.counts.undefined, 1);
    assert_eq!(suite.scenarios_passed, 2);
    assert_eq!(suite.scenarios_failed, 1);

    // Two tags in discovery order, each counted per carrying scenario.
    let tag_names: Vec<&str> = stats.tags().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, ["@smoke", "@auth"]);
    assert_eq!(stats.tag_totals().scenario_count, 4);
}

/// Tests that a full run produces every page and the provisioned assets.
#[test]
fn test_full_run_produces_all_pages() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut builder = ReportBuilder::new(config(dir.path()));

    assert_eq!(builder.build(), BuildPhase::Done);
    // One failing step in the suite.
    assert_eq!(builder.build_status(), BuildStatus::Failed);

    let files = file_set(dir.path());
    for expected in [
        "css/style.css",
        "feature-overview.html",
        "features-account-login-feature.html",
        "features-checkout-feature.html",
        "js/charts.js",
        "auth.html",
        "smoke.html",
        "tag-overview.html",
        "screenshot-overview.html",
    ] {
        assert!(
            files.iter().any(|f| f == expected),
            "Missing output file {expected}, got: {files:?}"
        );
    }

    let overview = fs::read_to_string(dir.path().join("feature-overview.html"))
        .expect("Failed to read overview page");
    assert!(overview.contains("2 features, 3 scenarios (2 passed, 1 failed)"));
    assert!(overview.contains("Account login"));
    assert!(overview.contains("href=\"features-checkout-feature.html\""));
    assert!(overview.contains("build 42"));
}

/// Tests that two runs over the same input produce the same file set.
#[test]
fn test_output_file_set_is_idempotent() {
    let first = tempfile::tempdir().expect("Failed to create temp dir");
    let second = tempfile::tempdir().expect("Failed to create temp dir");

    assert_eq!(ReportBuilder::new(config(first.path())).build(), BuildPhase::Done);
    assert_eq!(ReportBuilder::new(config(second.path())).build(), BuildPhase::Done);
    let baseline = file_set(first.path());
    assert_eq!(baseline, file_set(second.path()));

    // Re-running into an already populated directory leaves the set unchanged.
    assert_eq!(ReportBuilder::new(config(first.path())).build(), BuildPhase::Done);
    assert_eq!(baseline, file_set(first.path()));
}

/// Tests that a malformed document yields only the fallback error page.
#[test]
fn test_malformed_document_yields_fallback_page() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let document = dir.path().join("broken.json");
    fs::write(&document, "[ { \"name\": ").expect("Failed to write fixture");

    let mut builder = ReportBuilder::new(ReportConfig {
        input_documents: vec![document],
        output_dir: dir.path().to_path_buf(),
        ..ReportConfig::default()
    });

    assert_eq!(builder.build(), BuildPhase::Failed);
    assert_eq!(builder.build_status(), BuildStatus::Failed);

    let files = file_set(dir.path());
    assert_eq!(files, ["broken.json", "feature-overview.html"]);

    let page = fs::read_to_string(dir.path().join("feature-overview.html"))
        .expect("Failed to read fallback page");
    assert!(page.contains("Report generation failed"));
    assert!(page.contains("broken.json"));
}

/// Tests that screenshots in the report directory are grouped on the page.
#[test]
fn test_screenshots_appear_on_the_screenshot_page() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("screenLogin__step1.png"), b"png").expect("Failed to write image");
    fs::write(dir.path().join("screenLogin__step2.png"), b"png").expect("Failed to write image");

    let mut builder = ReportBuilder::new(config(dir.path()));
    assert_eq!(builder.build(), BuildPhase::Done);

    let page = fs::read_to_string(dir.path().join("screenshot-overview.html"))
        .expect("Failed to read screenshot page");
    assert!(page.contains("<h2>Login</h2>"));
    assert!(page.contains("screenLogin__step1.png"));
    assert!(page.contains("screenLogin__step2.png"));
}
