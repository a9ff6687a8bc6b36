//! HTML report writer.
//!
//! Produces a single self-contained page: a summary table of groups followed
//! by one section per group listing its cases and the steps that ran.

use std::fmt::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use probe_application::ports::{ReportError, ReportWriter};
use probe_domain::{CaseOutcome, GroupReport, RunReport, StepOutcome};
use tracing::debug;

use super::{report_file_name, write_report_file};

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin-bottom:1.5em}\
td,th{border:1px solid #ccc;padding:4px 8px;text-align:left}\
.pass{color:#1a7f37}.fail{color:#cf222e}\
.step{font-family:monospace;font-size:0.9em}";

/// Writes the run report as an HTML page.
#[derive(Debug, Clone)]
pub struct HtmlReportWriter {
    dir: PathBuf,
}

impl HtmlReportWriter {
    /// Creates a writer targeting `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ReportWriter for HtmlReportWriter {
    fn format(&self) -> &'static str {
        "html"
    }

    async fn write(&self, report: &RunReport) -> Result<PathBuf, ReportError> {
        let content = render_html(report);
        let path =
            write_report_file(&self.dir, &report_file_name(&report.id, "html"), &content).await?;
        debug!(path = %path.display(), "html report written");
        Ok(path)
    }
}

/// Renders `report` as a complete HTML document.
#[must_use]
pub fn render_html(report: &RunReport) -> String {
    let mut html = String::new();
    // Writing to a String cannot fail.
    let _ = write_document(&mut html, report);
    html
}

fn write_document(out: &mut String, report: &RunReport) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Probe report {}</title>", escape(&report.id))?;
    writeln!(out, "<style>{STYLE}</style></head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>Probe report</h1>")?;
    writeln!(
        out,
        "<p>Run <code>{}</code>, started {}, took {} ms.</p>",
        escape(&report.id),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.duration_ms()
    )?;
    writeln!(
        out,
        "<p class=\"{}\"><strong>{}</strong>, {}/{} cases passed</p>",
        status_class(report.all_passed()),
        escape(&report.summary_line()),
        report.totals.cases_passed,
        report.totals.cases
    )?;

    writeln!(out, "<table>")?;
    writeln!(out, "<tr><th>#</th><th>Group</th><th>Passed</th><th>Failed</th><th>Time</th></tr>")?;
    for group in &report.groups {
        writeln!(
            out,
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} ms</td></tr>",
            status_class(group.all_passed()),
            group.number,
            escape(&group.title),
            group.passed,
            group.failed,
            group.duration_ms
        )?;
    }
    writeln!(out, "</table>")?;

    for group in &report.groups {
        write_group(out, group)?;
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_group(out: &mut String, group: &GroupReport) -> std::fmt::Result {
    writeln!(
        out,
        "<h2 class=\"{}\">{}. {}</h2>",
        status_class(group.all_passed()),
        group.number,
        escape(&group.title)
    )?;
    for case in &group.cases {
        write_case(out, case)?;
    }
    Ok(())
}

fn write_case(out: &mut String, case: &CaseOutcome) -> std::fmt::Result {
    writeln!(
        out,
        "<h3 class=\"{}\">{} {} <small>({} ms)</small></h3>",
        status_class(case.passed),
        escape(&case.id),
        escape(&case.name),
        case.duration_ms
    )?;
    if !case.description.is_empty() {
        writeln!(out, "<p>{}</p>", escape(&case.description))?;
    }

    writeln!(out, "<table class=\"step\">")?;
    writeln!(out, "<tr><th>Step</th><th>Status</th><th>Time</th><th>Result</th></tr>")?;
    for step in &case.steps {
        write_step(out, step)?;
    }
    writeln!(out, "</table>")
}

fn write_step(out: &mut String, step: &StepOutcome) -> std::fmt::Result {
    let status = step
        .status
        .map_or_else(|| "-".to_string(), |code| code.to_string());

    let mut result = step
        .failure_reason()
        .unwrap_or_else(|| "ok".to_string());
    if let Some(load) = &step.load {
        let _ = write!(
            result,
            " [{}/{} ok, {:.0}%",
            load.succeeded,
            load.requests,
            load.success_rate * 100.0
        );
        if let Some(latency) = &load.latency {
            let _ = write!(
                result,
                ", mean {:.0} ms, p95 {:.0} ms",
                latency.mean_ms, latency.p95_ms
            );
        }
        result.push(']');
    }

    writeln!(
        out,
        "<tr class=\"{}\"><td>{} {}</td><td>{}</td><td>{} ms</td><td>{}</td></tr>",
        status_class(step.passed),
        escape(&step.method),
        escape(&step.url),
        status,
        step.duration_ms,
        escape(&result)
    )
}

const fn status_class(passed: bool) -> &'static str {
    if passed { "pass" } else { "fail" }
}

/// Escapes text for HTML element content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
