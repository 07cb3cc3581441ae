//! Report generation pipeline for cukereport.
//!
//! Ties the domain model, statistic rollups and page rendering together
//! behind one orchestrator. Typical use:
//!
//! ```no_run
//! use cuke_builder::{ReportBuilder, ReportConfig};
//!
//! let config = ReportConfig {
//!     input_documents: vec!["target/cucumber.json".into()],
//!     output_dir: "target/report".into(),
//!     ..ReportConfig::default()
//! };
//! let mut builder = ReportBuilder::new(config);
//! builder.build();
//! println!("{:?}", builder.build_status());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod phase;

pub use builder::{ReportBuilder, VERSION};
pub use config::ReportConfig;
pub use error::{BuildError, Result};
pub use phase::{BuildPhase, BuildStatus};
