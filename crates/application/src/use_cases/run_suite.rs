//! Run Suite Use Case
//!
//! Runs the selected groups in order, stamps the run and hands the report
//! to every configured writer.

use std::path::PathBuf;
use std::sync::Arc;

use probe_domain::{CheckGroup, RunReport, generate_id};
use tracing::{info, warn};

use super::RunGroup;
use crate::error::ApplicationResult;
use crate::ports::{Clock, ReportWriter};

/// Input for a suite run.
#[derive(Debug, Clone, Default)]
pub struct RunSuiteInput {
    /// Groups to run, in order.
    pub groups: Vec<CheckGroup>,
    /// Stop after the first group with a failed case.
    pub fail_fast: bool,
}

/// Output of a suite run.
#[derive(Debug, Clone)]
pub struct RunSuiteOutput {
    /// The finished run.
    pub report: RunReport,
    /// Report files written, one per writer.
    pub written: Vec<PathBuf>,
}

/// Use case that runs a suite of check groups.
pub struct RunSuite {
    run_group: RunGroup,
    clock: Arc<dyn Clock>,
    writers: Vec<Arc<dyn ReportWriter>>,
}

impl RunSuite {
    /// Creates the use case with no report writers.
    #[must_use]
    pub fn new(run_group: RunGroup, clock: Arc<dyn Clock>) -> Self {
        Self {
            run_group,
            clock,
            writers: Vec::new(),
        }
    }

    /// Adds a report writer.
    #[must_use]
    pub fn with_writer(mut self, writer: Arc<dyn ReportWriter>) -> Self {
        self.writers.push(writer);
        self
    }

    /// Runs the groups and writes the report.
    ///
    /// Failed checks are part of the report, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if a report writer fails.
    pub async fn execute(&self, input: RunSuiteInput) -> ApplicationResult<RunSuiteOutput> {
        let id = generate_id();
        let started_at = self.clock.now();
        info!(run = %id, groups = input.groups.len(), "starting run");

        let mut reports = Vec::with_capacity(input.groups.len());
        for group in &input.groups {
            let report = self.run_group.execute(group).await;
            let failed = !report.all_passed();
            reports.push(report);
            if failed && input.fail_fast {
                warn!(group = group.number, "stopping after failed group");
                break;
            }
        }

        let report = RunReport::new(id, started_at, self.clock.now(), reports);
        info!(run = %report.id, summary = %report.summary_line(), "run finished");

        let mut written = Vec::with_capacity(self.writers.len());
        for writer in &self.writers {
            let path = writer.write(&report).await?;
            info!(format = writer.format(), path = %path.display(), "report written");
            written.push(path);
        }

        Ok(RunSuiteOutput { report, written })
    }
}
