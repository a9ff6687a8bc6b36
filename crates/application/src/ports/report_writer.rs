//! Report output port

use std::path::PathBuf;

use async_trait::async_trait;
use probe_domain::RunReport;
use thiserror::Error;

/// Errors from writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialization(String),
}

/// Persists a finished run.
#[async_trait]
pub trait ReportWriter: Send + Sync {
    /// Short format name, e.g. `json`.
    fn format(&self) -> &'static str;

    /// Writes the report and returns the file written.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the report cannot be serialized or stored.
    async fn write(&self, report: &RunReport) -> Result<PathBuf, ReportError>;
}
