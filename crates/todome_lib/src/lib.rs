//! Find TODO comments in a source tree, pull out who owns them and when they
//! are due, then list them by due date or fail when some have no due date.
//!
//! ```rust,no_run
//! use todome_lib::{config::ScanConfig, report::{ReportMode, VerifyMode}};
//!
//! let mut lines: Vec<String> = vec![];
//! let outcome = ReportMode::Verify(VerifyMode)
//!     .run(std::path::Path::new("src"), &ScanConfig::default(), &mut lines)
//!     .unwrap();
//! for line in lines {
//!     println!("{line}");
//! }
//! assert!(outcome.is_success());
//! ```
use snafu::prelude::*;
use std::path::PathBuf;

pub mod config;
pub mod finder;
pub mod parser;
pub mod report;

pub use parser::{scan_directory, TodoRecord};
pub use report::{ListMode, Outcome, OutputSink, ReportMode, SortDirection, VerifyMode};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Failed to read file {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not walk the source tree: {source}"))]
    Walk { source: walkdir::Error },

    #[snafu(display("Could not read config {}: {source}", path.display()))]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not parse config {}: {source}", path.display()))]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Invalid date format '{format}': {reason}"))]
    DateFormat { format: String, reason: String },

    #[snafu(display("Unknown language '{name}'"))]
    UnknownLanguage { name: String },

    #[snafu(display("The mention symbol must not be empty"))]
    EmptyMentionSymbol,
}

impl From<walkdir::Error> for Error {
    fn from(source: walkdir::Error) -> Self {
        Self::Walk { source }
    }
}

pub(crate) type Result<T, E = Error> = core::result::Result<T, E>;
