//! Report configuration.
//!
//! All settings travel as one explicit [`ReportConfig`] value handed to the
//! builder; there is no process-global configuration. A JSON config file can
//! seed the value, CLI flags override it, and validation runs after both.

use std::path::{Path, PathBuf};

use cuke_report::aggregate::StatusPolicy;
use cuke_report::charts::ChartMode;
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Complete configuration of one report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // mirrors the independent CLI switches
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// Paths to the test-run documents to parse.
    #[serde(default)]
    pub input_documents: Vec<PathBuf>,

    /// Directory all pages and assets are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Opaque CI build number.
    #[serde(default)]
    pub build_number: String,

    /// Opaque CI project name.
    #[serde(default)]
    pub build_project: String,

    /// Base URL path; the empty string is normalized to `/` on access.
    #[serde(default)]
    pub base_url: String,

    /// Whether a skipped step fails its feature/tag.
    #[serde(default)]
    pub skip_failures: bool,

    /// Whether an undefined step fails its feature/tag.
    #[serde(default)]
    pub undefined_failures: bool,

    /// Selects the legacy vector-graphic chart backend.
    #[serde(default)]
    pub use_legacy_charts: bool,

    /// Selects the rich script-driven chart backend.
    #[serde(default)]
    pub use_rich_charts: bool,

    /// Whether to provision the artifact viewer and embed artifacts.
    #[serde(default)]
    pub embed_artifacts: bool,

    /// Whether the report is hosted by a CI server.
    #[serde(default)]
    pub from_ci: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_documents: Vec::new(),
            output_dir: default_output_dir(),
            build_number: String::new(),
            build_project: String::new(),
            base_url: String::new(),
            skip_failures: false,
            undefined_failures: false,
            use_legacy_charts: false,
            use_rich_charts: false,
            embed_artifacts: false,
            from_ci: false,
        }
    }
}

impl ReportConfig {
    /// Loads configuration from a JSON file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file
    /// is an error. Validation is the caller's job once overrides have been
    /// applied.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(BuildError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };
        serde_json::from_str(&contents).map_err(|e| BuildError::config_parse(path, e.to_string()))
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.input_documents.is_empty() {
            return Err(BuildError::config_validation(
                "no input documents configured",
                "pass at least one test-run document path",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(BuildError::config_validation(
                "output directory is empty",
                "set outputDir to the report directory",
            ));
        }
        Ok(())
    }

    /// The base URL path with the empty string normalized to `/`.
    #[must_use]
    pub fn base_url_path(&self) -> &str {
        if self.base_url.is_empty() {
            "/"
        } else {
            &self.base_url
        }
    }

    /// Chart backend derived from the two selection flags; the legacy flag
    /// takes precedence over the rich flag.
    #[must_use]
    pub const fn chart_mode(&self) -> ChartMode {
        if self.use_legacy_charts {
            ChartMode::Legacy
        } else if self.use_rich_charts {
            ChartMode::Rich
        } else {
            ChartMode::Generic
        }
    }

    /// Failure policies handed to the aggregator.
    #[must_use]
    pub const fn status_policy(&self) -> StatusPolicy {
        StatusPolicy {
            skip_failures: self.skip_failures,
            undefined_failures: self.undefined_failures,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let config = ReportConfig::load_from_file(Path::new("/nonexistent/cukereport.json"))
            .unwrap();
        assert!(config.input_documents.is_empty());
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_malformed_config_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ nope").unwrap();
        let err = ReportConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, BuildError::ConfigParse { .. }));
    }

    #[test]
    fn test_config_file_fields_are_camel_case() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"inputDocuments": ["run.json"], "buildNumber": "7", "useRichCharts": true}"#,
        )
        .unwrap();
        let config = ReportConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.input_documents, vec![PathBuf::from("run.json")]);
        assert_eq!(config.build_number, "7");
        assert_eq!(config.chart_mode(), ChartMode::Rich);
    }

    #[test]
    fn test_validate_requires_input_documents() {
        let config = ReportConfig::default();
        assert!(config.validate().is_err());

        let config = ReportConfig {
            input_documents: vec![PathBuf::from("run.json")],
            ..ReportConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_base_url_normalizes_to_slash() {
        let config = ReportConfig::default();
        assert_eq!(config.base_url_path(), "/");

        let config = ReportConfig {
            base_url: "/job/shop/".to_string(),
            ..ReportConfig::default()
        };
        assert_eq!(config.base_url_path(), "/job/shop/");
    }

    #[test]
    fn test_chart_mode_precedence() {
        let mut config = ReportConfig::default();
        assert_eq!(config.chart_mode(), ChartMode::Generic);

        config.use_rich_charts = true;
        assert_eq!(config.chart_mode(), ChartMode::Rich);

        // legacy wins over rich when both are set
        config.use_legacy_charts = true;
        assert_eq!(config.chart_mode(), ChartMode::Legacy);
    }
}
