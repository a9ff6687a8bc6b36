//! JSON report writer.

use std::path::PathBuf;

use async_trait::async_trait;
use probe_application::ports::{ReportError, ReportWriter};
use probe_domain::RunReport;
use tracing::debug;

use super::{report_file_name, write_report_file};
use crate::serialization::to_json_stable;

/// Writes the run report as deterministic JSON.
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    dir: PathBuf,
}

impl JsonReportWriter {
    /// Creates a writer targeting `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ReportWriter for JsonReportWriter {
    fn format(&self) -> &'static str {
        "json"
    }

    async fn write(&self, report: &RunReport) -> Result<PathBuf, ReportError> {
        let content =
            to_json_stable(report).map_err(|e| ReportError::Serialization(e.to_string()))?;
        let path =
            write_report_file(&self.dir, &report_file_name(&report.id, "json"), &content).await?;
        debug!(path = %path.display(), "json report written");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::report::fixtures;
    use crate::serialization::from_json_bytes;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_writes_report_that_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let writer = JsonReportWriter::new(dir.path().join("reports"));
        let report = fixtures::report();

        let path = writer.write(&report).await.unwrap();

        assert_eq!(path, dir.path().join("reports").join("probe-report-run-42.json"));
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert!(bytes.ends_with(b"}\n"));
        let restored: RunReport = from_json_bytes(&bytes).unwrap();
        assert_eq!(restored, report);
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        tokio::fs::write(&blocker, "not a directory").await.unwrap();

        let writer = JsonReportWriter::new(&blocker);
        let err = writer.write(&fixtures::report()).await.unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn test_format_name() {
        assert_eq!(JsonReportWriter::new("reports").format(), "json");
    }
}
