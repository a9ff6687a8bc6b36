//! Console rendering.
//!
//! Every function returns the text instead of printing it so the layout can
//! be tested.

use std::fmt::Write as _;

use probe_application::DebugExchange;
use probe_domain::{CheckGroup, GroupReport, ManifestIssue, RunReport};

use crate::handlers::manifest::ManifestCheck;

const RULE_WIDTH: usize = 60;

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Shortens `text` to `max_chars`, adding "..." when cut.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

/// The catalog listing of `probe list`.
#[must_use]
pub fn render_catalog(groups: &[CheckGroup]) -> String {
    let mut out = String::from("Available check groups:\n");
    for group in groups {
        let _ = writeln!(
            out,
            "{}. {} ({} cases, {} steps, {})",
            group.number,
            group.title,
            group.cases.len(),
            group.step_count(),
            group.target.display_name()
        );
        for case in &group.cases {
            let _ = writeln!(out, "   {:<5} {}", case.id, case.name);
        }
    }
    out
}

/// Detail of one group: a line per case and the reason of each failure.
#[must_use]
pub fn render_group(group: &GroupReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule('='));
    let _ = writeln!(out, "GROUP {}: {}", group.number, group.title);
    let _ = writeln!(out, "{}", rule('='));

    for case in &group.cases {
        let mark = if case.passed { "PASS" } else { "FAIL" };
        let _ = writeln!(
            out,
            "  [{mark}] {} {} ({} ms)",
            case.id, case.name, case.duration_ms
        );
        let failed = case.steps.iter().filter(|s| !s.passed);
        for step in failed {
            let reason = step
                .failure_reason()
                .unwrap_or_else(|| "failed".to_string());
            let _ = writeln!(
                out,
                "         {} {}: {}",
                step.method,
                truncate(&step.url, 80),
                truncate(&reason, 160)
            );
        }
    }

    let verdict = if group.all_passed() { "PASSED" } else { "FAILED" };
    let _ = writeln!(
        out,
        "GROUP {} {verdict}: {}/{} cases passed in {} ms",
        group.number,
        group.passed,
        group.cases.len(),
        group.duration_ms
    );
    out
}

/// Console output of a whole run, ending with the summary block.
#[must_use]
pub fn render_run(report: &RunReport) -> String {
    let mut out = format!(
        "Probe run {} started at {}\n",
        report.id,
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    );

    for group in &report.groups {
        out.push('\n');
        out.push_str(&render_group(group));
    }

    let _ = writeln!(out, "\n{}", rule('='));
    let _ = writeln!(out, "FINAL RESULTS SUMMARY");
    let _ = writeln!(out, "{}", rule('='));
    for group in &report.groups {
        let status = if group.all_passed() { "PASSED" } else { "FAILED" };
        let _ = writeln!(out, "Group {}: {} - {status}", group.number, group.title);
    }
    let _ = writeln!(out, "\nOVERALL RESULT: {}", report.summary_line());
    let _ = writeln!(
        out,
        "Cases: {}/{} passed in {} ms",
        report.totals.cases_passed,
        report.totals.cases,
        report.duration_ms()
    );
    if report.all_passed() {
        let _ = writeln!(out, "All checks passed.");
    } else {
        let _ = writeln!(out, "Some checks failed. See the report files for details.");
    }
    out
}

/// One exchange of the `ReqRes` diagnostic.
#[must_use]
pub fn render_exchange(index: usize, exchange: &DebugExchange) -> String {
    let mut out = String::new();
    let request = &exchange.request;
    let _ = writeln!(
        out,
        "\n{index}. {} ({} {})",
        exchange.label,
        request.method,
        request.full_url()
    );

    match &exchange.result {
        Ok(response) => {
            let _ = writeln!(
                out,
                "   Status: {} {} ({} ms)",
                response.status,
                response.status_text,
                response.duration_ms()
            );
            for header in response.headers.enabled() {
                let _ = writeln!(out, "   {}: {}", header.name, header.value);
            }
            let body = response.json().map_or_else(
                |_| response.body.clone(),
                |json| serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string()),
            );
            let _ = writeln!(out, "   Body:");
            for line in body.lines() {
                let _ = writeln!(out, "     {line}");
            }
        }
        Err(error) => {
            let _ = writeln!(out, "   Exception: {error}");
        }
    }
    out
}

/// Issues of the checked manifests.
#[must_use]
pub fn render_manifest_checks(checks: &[ManifestCheck]) -> String {
    let mut out = String::new();
    for check in checks {
        match &check.manifest {
            Some(manifest) => {
                let _ = writeln!(
                    out,
                    "{}: {} packages in {} sections",
                    check.label,
                    manifest.len(),
                    manifest.sections.len()
                );
            }
            None => {
                let _ = writeln!(out, "{}: could not be parsed", check.label);
            }
        }
        if check.issues.is_empty() {
            let _ = writeln!(out, "  ok");
        }
        for issue in &check.issues {
            let _ = writeln!(out, "  {}: {issue}", issue_kind(issue));
        }
    }
    out
}

const fn issue_kind(issue: &ManifestIssue) -> &'static str {
    match issue {
        ManifestIssue::MalformedLine { .. } => "malformed",
        ManifestIssue::InvalidVersion { .. } => "invalid version",
        ManifestIssue::DuplicatePackage { .. } => "duplicate",
        ManifestIssue::NotInFull { .. } => "not in full",
    }
}
