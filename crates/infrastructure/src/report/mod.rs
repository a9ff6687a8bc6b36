//! Report writers.
//!
//! Each writer stores a finished [`RunReport`](probe_domain::RunReport) in the
//! report directory as `probe-report-<run id>.<format>`.

mod html_report;
mod json_report;

use std::path::{Path, PathBuf};

use probe_application::ports::ReportError;
use tokio::fs;

pub use html_report::{HtmlReportWriter, render_html};
pub use json_report::JsonReportWriter;

/// File name of a report for `run_id`.
#[must_use]
pub fn report_file_name(run_id: &str, extension: &str) -> String {
    format!("probe-report-{run_id}.{extension}")
}

/// Creates `dir` if needed and writes `content` to `dir/file_name`.
async fn write_report_file(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).await.map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file_name);
    fs::write(&path, content)
        .await
        .map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use probe_domain::testing::{Assertion, AssertionResult};
    use probe_domain::{CaseOutcome, GroupReport, LatencyStats, LoadSummary, RunReport, StepOutcome};

    pub fn step(name: &str, passed: bool) -> StepOutcome {
        let result = if passed {
            AssertionResult::pass_with_value(Assertion::status(200), "200")
        } else {
            AssertionResult::fail_with_value(Assertion::status(200), "404", "Expected status = 200, got 404")
        };
        StepOutcome {
            name: name.to_string(),
            method: "GET".to_string(),
            url: "https://jsonplaceholder.typicode.com/posts/1".to_string(),
            status: Some(if passed { 200 } else { 404 }),
            duration_ms: 42,
            results: vec![result],
            error: None,
            load: None,
            passed,
        }
    }

    pub fn report() -> RunReport {
        let mut load_step = step("10 rapid requests", true);
        load_step.load = Some(LoadSummary::new(10, 10, LatencyStats::from_millis(&[40.0, 50.0])));

        let cases = vec![
            CaseOutcome {
                id: "1.1".to_string(),
                name: "List posts".to_string(),
                description: "Returns 100 posts".to_string(),
                passed: true,
                steps: vec![step("GET /posts", true), load_step],
                duration_ms: 90,
            },
            CaseOutcome {
                id: "1.2".to_string(),
                name: "Single post <script>".to_string(),
                description: String::new(),
                passed: false,
                steps: vec![step("GET /posts/1", false)],
                duration_ms: 42,
            },
        ];

        let started = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let finished = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 2).unwrap();
        RunReport::new(
            "run-42",
            started,
            finished,
            vec![GroupReport::new(1, "Basic CRUD Operations", cases, 132)],
        )
    }
}
