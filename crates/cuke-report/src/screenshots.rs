//! Screenshot discovery and scenario correlation.
//!
//! Screenshots are image files that the test run already wrote somewhere
//! under the report output directory. The scan finds them, rewrites each
//! path into its publicly addressable form and groups the rewritten paths by
//! a scenario key derived from the file name. The rewrite rules double as a
//! URL contract consumed by external dashboards, so their order and their
//! literal replacement strings are fixed.

use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use walkdir::WalkDir;

/// Marker substring identifying a screenshot artifact and anchoring the
/// grouping-key split.
const MARKER: &str = "screen";

/// Separator between the scenario key and the rest of the file name.
const KEY_SEPARATOR: &str = "__";

/// Timestamped build-directory segment replaced by the build number.
#[allow(clippy::unwrap_used)]
fn build_dir_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"builds/[\d\-_]+/").unwrap())
}

/// A screenshot path that could not be correlated with a scenario.
///
/// Correlation failures are diagnostics, not errors: the affected path is
/// excluded from the grouping and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationFailure {
    /// The rewritten path that failed to correlate.
    pub path: String,
    /// Why the key could not be derived.
    pub reason: String,
}

/// Result of one scan over the report output directory.
#[derive(Debug, Clone, Default)]
pub struct ScreenshotScan {
    image_paths: Vec<String>,
    groups: IndexMap<String, Vec<String>>,
    failures: Vec<CorrelationFailure>,
}

impl ScreenshotScan {
    /// Scans the output directory tree and builds the grouping.
    ///
    /// Non-image files and images without the `"screen"` marker in their
    /// relative path are ignored silently; a retained path whose rewritten
    /// form no longer yields a grouping key is surfaced as a
    /// [`CorrelationFailure`].
    #[must_use]
    pub fn scan(report_dir: &Path, build_number: &str) -> Self {
        let mut scan = Self::default();

        for entry in WalkDir::new(report_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            if !is_image(entry.path()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(report_dir)
                .unwrap_or_else(|_| entry.path());
            if !relative.to_string_lossy().contains(MARKER) {
                continue;
            }

            let rewritten = rewrite_path(&entry.path().to_string_lossy(), build_number);
            scan.image_paths.push(rewritten.clone());

            match correlation_key(&rewritten) {
                Some(key) => scan.groups.entry(key).or_default().push(rewritten),
                None => {
                    tracing::warn!(path = %rewritten, "screenshot path has no scenario marker");
                    scan.failures.push(CorrelationFailure {
                        path: rewritten,
                        reason: format!("path contains no '{MARKER}' marker after rewriting"),
                    });
                }
            }
        }

        scan
    }

    /// All rewritten screenshot paths in discovery order.
    #[must_use]
    pub fn image_paths(&self) -> &[String] {
        &self.image_paths
    }

    /// Ordered grouping from scenario key to rewritten paths.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Correlation diagnostics collected during the scan.
    #[must_use]
    pub fn failures(&self) -> &[CorrelationFailure] {
        &self.failures
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ext == "png")
}

/// Applies the three path rewrites in their fixed order. Later rules assume
/// earlier ones already ran.
#[must_use]
pub fn rewrite_path(path: &str, build_number: &str) -> String {
    // (a) CI-internal job storage becomes its public-facing segment.
    let path = path.replace("var/lib/jenkins/jobs", "jenkins/job");
    // (b) the timestamped build directory becomes the build-number token;
    //     the whole match, trailing slash included, is replaced verbatim.
    let path = build_dir_pattern()
        .replace(&path, build_number)
        .into_owned();
    // (c) the report subdirectory is forced absolute.
    path.replace("cucumber-html-reports", "/cucumber-html-reports")
}

/// Derives the grouping key: the segment between the first `"screen"`
/// occurrence and the first `"__"` separator after it.
#[must_use]
pub fn correlation_key(path: &str) -> Option<String> {
    let (_, remainder) = path.split_once(MARKER)?;
    remainder
        .split(KEY_SEPARATOR)
        .next()
        .map(std::string::ToString::to_string)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_correlation_key_from_marker_and_separator() {
        assert_eq!(
            correlation_key("/out/screenLogin__step1.png").as_deref(),
            Some("Login")
        );
        assert_eq!(
            correlation_key("/out/screenLogin__step2.png").as_deref(),
            Some("Login")
        );
        assert_eq!(
            correlation_key("/out/screenCheckout__pay.png").as_deref(),
            Some("Checkout")
        );
    }

    #[test]
    fn test_correlation_key_splits_on_first_marker() {
        // A "screenshots" directory ahead of the file name anchors the split.
        assert_eq!(
            correlation_key("/out/screenshots/screenLogin__x.png").as_deref(),
            Some("shots/"),
        );
    }

    #[test]
    fn test_correlation_key_missing_marker_is_none() {
        assert!(correlation_key("/out/capture__step1.png").is_none());
    }

    #[test]
    fn test_rewrite_jenkins_job_segment() {
        let rewritten = rewrite_path("/var/lib/jenkins/jobs/suite/x/screenA__1.png", "42");
        assert!(rewritten.contains("jenkins/job/suite"));
        assert!(!rewritten.contains("var/lib"));
    }

    #[test]
    fn test_rewrite_build_dir_becomes_build_number() {
        let rewritten = rewrite_path("/j/builds/2014-05-01_10-30/out/screenA__1.png", "42");
        assert_eq!(rewritten, "/j/42out/screenA__1.png");
    }

    #[test]
    fn test_rewrite_report_dir_forced_absolute() {
        let rewritten = rewrite_path("x/cucumber-html-reports/screenA__1.png", "42");
        assert!(rewritten.contains("x//cucumber-html-reports"));
    }

    #[test]
    fn test_rewrite_order_applies_all_rules() {
        let raw = "/var/lib/jenkins/jobs/suite/builds/2014-05-01/cucumber-html-reports/screenA__1.png";
        let rewritten = rewrite_path(raw, "7");
        assert_eq!(rewritten, "/jenkins/job/suite/7/cucumber-html-reports/screenA__1.png");
    }

    #[test]
    fn test_scan_groups_and_ignores_non_screenshots() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("screenLogin__step1.png"), b"png").unwrap();
        fs::write(dir.path().join("screenLogin__step2.png"), b"png").unwrap();
        fs::write(dir.path().join("screenCheckout__pay.png"), b"png").unwrap();
        fs::write(dir.path().join("logo.png"), b"png").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let scan = ScreenshotScan::scan(dir.path(), "1");
        assert_eq!(scan.image_paths().len(), 3);
        assert!(scan.failures().is_empty());

        let groups: Vec<(&str, usize)> = scan.groups().map(|(k, v)| (k, v.len())).collect();
        assert_eq!(groups, vec![("Checkout", 1), ("Login", 2)]);
    }

    #[test]
    fn test_scan_preserves_discovery_order_within_group() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("screenLogin__a.png"), b"png").unwrap();
        fs::write(dir.path().join("screenLogin__b.png"), b"png").unwrap();

        let scan = ScreenshotScan::scan(dir.path(), "1");
        let (_, paths) = scan.groups().next().unwrap();
        assert!(paths[0].contains("screenLogin__a.png"));
        assert!(paths[1].contains("screenLogin__b.png"));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let scan = ScreenshotScan::scan(dir.path(), "1");
        assert!(scan.image_paths().is_empty());
        assert_eq!(scan.groups().count(), 0);
    }
}
