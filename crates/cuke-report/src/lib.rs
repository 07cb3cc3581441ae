//! Report computation and rendering for cukereport.
//!
//! This crate owns everything between the parsed domain model and the files
//! on disk:
//!
//! - [`aggregate`] - the one-shot statistic rollup over the model
//! - [`charts`] - re-encoding of the rollup for the charting backends
//! - [`screenshots`] - screenshot discovery, path rewriting and grouping
//! - [`views`] - one typed view-model per page kind
//! - [`render`] - the template-engine seam and the built-in HTML engine
//! - [`resources`] - static asset bundle provisioning

pub mod aggregate;
pub mod charts;
pub mod render;
pub mod resources;
pub mod screenshots;
pub mod views;

/// Errors raised while producing report artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A page could not be written to the output directory.
    #[error("failed to write page '{page}': {source}")]
    PageWrite {
        /// Output file name of the page.
        page: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A static resource bundle could not be extracted.
    #[error("failed to provision resource bundle '{bundle}': {message}")]
    Provisioning {
        /// Bundle name.
        bundle: String,
        /// Description of the failure.
        message: String,
    },
}

impl ReportError {
    /// Creates a new `PageWrite` error.
    #[must_use]
    pub fn page_write(page: impl Into<String>, source: std::io::Error) -> Self {
        Self::PageWrite {
            page: page.into(),
            source,
        }
    }

    /// Creates a new `Provisioning` error.
    #[must_use]
    pub fn provisioning(bundle: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provisioning {
            bundle: bundle.into(),
            message: message.into(),
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
