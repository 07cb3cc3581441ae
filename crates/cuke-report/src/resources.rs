//! Static resource bundle provisioning.
//!
//! The rendered pages reference theme and chart-engine assets that ship as
//! embedded zip archives. Provisioning extracts them into the report
//! directory and must fully complete, with its temporary archive removed,
//! before any page render that references the assets.

use std::io::Write as _;
use std::path::Path;

use crate::charts::ChartMode;
use crate::{ReportError, Result};

/// Blue theme stylesheet bundle.
const THEME_BLUE: &[u8] = include_bytes!("../assets/theme-blue.zip");
/// Script-driven chart engine bundle (generic and rich modes).
const CHARTS_JS: &[u8] = include_bytes!("../assets/charts-js.zip");
/// Legacy vector-graphic chart engine bundle.
const CHARTS_LEGACY: &[u8] = include_bytes!("../assets/charts-legacy.zip");
/// Artifact viewer bundle, extracted only when artifact embedding is on.
const ARTIFACT_VIEWER: &[u8] = include_bytes!("../assets/artifact-viewer.zip");

/// Extracts all bundles the configured report needs into the report
/// directory: the theme, exactly one of the two chart-engine bundles, and
/// the artifact viewer when artifact embedding is enabled.
pub fn provision(report_dir: &Path, chart_mode: ChartMode, embed_artifacts: bool) -> Result<()> {
    extract_bundle(report_dir, "theme-blue", THEME_BLUE)?;
    match chart_mode {
        ChartMode::Legacy => extract_bundle(report_dir, "charts-legacy", CHARTS_LEGACY)?,
        ChartMode::Generic | ChartMode::Rich => {
            extract_bundle(report_dir, "charts-js", CHARTS_JS)?;
        }
    }
    if embed_artifacts {
        extract_bundle(report_dir, "artifact-viewer", ARTIFACT_VIEWER)?;
    }
    Ok(())
}

/// Extracts one bundle via a temporary archive file, removed before return.
fn extract_bundle(report_dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let err = |message: String| ReportError::provisioning(name, message);

    let mut archive_file = tempfile::NamedTempFile::new()
        .map_err(|e| err(format!("failed to create temporary archive: {e}")))?;
    archive_file
        .write_all(bytes)
        .map_err(|e| err(format!("failed to write temporary archive: {e}")))?;

    let mut archive = zip::ZipArchive::new(
        archive_file
            .reopen()
            .map_err(|e| err(format!("failed to reopen temporary archive: {e}")))?,
    )
    .map_err(|e| err(format!("corrupt bundle archive: {e}")))?;
    archive
        .extract(report_dir)
        .map_err(|e| err(format!("failed to extract into report directory: {e}")))?;

    tracing::debug!(bundle = name, dir = %report_dir.display(), "provisioned resource bundle");
    archive_file
        .close()
        .map_err(|e| err(format!("failed to remove temporary archive: {e}")))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_extracts_theme_and_js_charts() {
        let dir = tempfile::tempdir().unwrap();
        provision(dir.path(), ChartMode::Generic, false).unwrap();

        assert!(dir.path().join("css/style.css").is_file());
        assert!(dir.path().join("js/charts.js").is_file());
        assert!(!dir.path().join("js/legacy-charts.js").exists());
        assert!(!dir.path().join("js/viewer.js").exists());
    }

    #[test]
    fn test_provision_legacy_mode_swaps_chart_bundle() {
        let dir = tempfile::tempdir().unwrap();
        provision(dir.path(), ChartMode::Legacy, false).unwrap();

        assert!(dir.path().join("js/legacy-charts.js").is_file());
        assert!(!dir.path().join("js/charts.js").exists());
    }

    #[test]
    fn test_provision_artifact_viewer_only_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        provision(dir.path(), ChartMode::Rich, true).unwrap();

        assert!(dir.path().join("js/viewer.js").is_file());
        assert!(dir.path().join("css/viewer.css").is_file());
    }

    #[test]
    fn test_provision_into_non_directory_is_provisioning_error() {
        // A plain file where the report directory should be.
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = provision(file.path(), ChartMode::Generic, false).unwrap_err();
        assert!(matches!(err, ReportError::Provisioning { .. }));
    }
}
