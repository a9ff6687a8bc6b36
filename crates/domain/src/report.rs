//! Run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::LatencyStats;
use crate::testing::AssertionResult;

/// Aggregate of a load step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadSummary {
    /// Requests sent.
    pub requests: usize,
    /// Requests whose response passed every assertion.
    pub succeeded: usize,
    /// `succeeded / requests`, 0.0 to 1.0.
    pub success_rate: f64,
    /// Latency of the responses that arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyStats>,
    /// Load criteria that were not met.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet: Vec<String>,
    /// Distinct reasons individual requests failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl LoadSummary {
    /// Builds a summary, computing the success rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(requests: usize, succeeded: usize, latency: Option<LatencyStats>) -> Self {
        let success_rate = if requests == 0 {
            0.0
        } else {
            succeeded as f64 / requests as f64
        };
        Self {
            requests,
            succeeded,
            success_rate,
            latency,
            unmet: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when every load criterion was met.
    #[must_use]
    pub fn criteria_met(&self) -> bool {
        self.unmet.is_empty()
    }
}

/// Result of a single step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepOutcome {
    /// Step name.
    pub name: String,
    /// HTTP method sent.
    pub method: String,
    /// Resolved URL.
    pub url: String,
    /// Response status, absent on transport failure and for load steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Wall time of the step.
    pub duration_ms: u64,
    /// Assertion results (step level for load steps).
    #[serde(default)]
    pub results: Vec<AssertionResult>,
    /// Transport or setup error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Load aggregate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadSummary>,
    /// Whether the step passed.
    pub passed: bool,
}

impl StepOutcome {
    /// Failed assertion results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// One line explaining why the step failed, if it did.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        if self.passed {
            return None;
        }
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        if let Some(load) = self.load.as_ref().filter(|l| !l.criteria_met()) {
            return Some(load.unmet.join("; "));
        }
        self.failures().next().map(|r| match (&r.error, &r.actual) {
            (Some(e), _) => format!("{}: {e}", r.description),
            (None, Some(a)) => format!("{} (actual: {a})", r.description),
            (None, None) => r.description.clone(),
        })
    }
}

/// Result of a case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseOutcome {
    /// Case id.
    pub id: String,
    /// Case name.
    pub name: String,
    /// Case description.
    #[serde(default)]
    pub description: String,
    /// Whether every step passed.
    pub passed: bool,
    /// Steps that ran; a case stops at its first failed step.
    pub steps: Vec<StepOutcome>,
    /// Wall time of the case.
    pub duration_ms: u64,
}

/// Result of a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupReport {
    /// Group number.
    pub number: u8,
    /// Group title.
    pub title: String,
    /// Case outcomes in run order.
    pub cases: Vec<CaseOutcome>,
    /// Cases passed.
    pub passed: usize,
    /// Cases failed.
    pub failed: usize,
    /// Wall time of the group.
    pub duration_ms: u64,
}

impl GroupReport {
    /// Builds a group report, counting outcomes.
    #[must_use]
    pub fn new(number: u8, title: impl Into<String>, cases: Vec<CaseOutcome>, duration_ms: u64) -> Self {
        let passed = cases.iter().filter(|c| c.passed).count();
        let failed = cases.len() - passed;
        Self {
            number,
            title: title.into(),
            cases,
            passed,
            failed,
            duration_ms,
        }
    }

    /// A group passes when every case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Totals across a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RunTotals {
    /// Groups run.
    pub groups: usize,
    /// Groups where every case passed.
    pub groups_passed: usize,
    /// Cases run.
    pub cases: usize,
    /// Cases passed.
    pub cases_passed: usize,
}

impl RunTotals {
    /// Computes totals from group reports.
    #[must_use]
    pub fn from_groups(groups: &[GroupReport]) -> Self {
        groups.iter().fold(Self::default(), |acc, g| Self {
            groups: acc.groups + 1,
            groups_passed: acc.groups_passed + usize::from(g.all_passed()),
            cases: acc.cases + g.cases.len(),
            cases_passed: acc.cases_passed + g.passed,
        })
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// Run id.
    pub id: String,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Finish time.
    pub finished_at: DateTime<Utc>,
    /// Group reports in run order.
    pub groups: Vec<GroupReport>,
    /// Totals.
    pub totals: RunTotals,
}

impl RunReport {
    /// Builds a run report and computes totals.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        groups: Vec<GroupReport>,
    ) -> Self {
        let totals = RunTotals::from_groups(&groups);
        Self {
            id: id.into(),
            started_at,
            finished_at,
            groups,
            totals,
        }
    }

    /// True when every group passed. An empty run passes.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.totals.groups_passed == self.totals.groups
    }

    /// E.g. `4/5 groups passed`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} groups passed",
            self.totals.groups_passed, self.totals.groups
        )
    }

    /// Run duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::testing::Assertion;
    use pretty_assertions::assert_eq;

    fn case(passed: bool) -> CaseOutcome {
        CaseOutcome {
            id: "c".to_string(),
            name: "case".to_string(),
            description: String::new(),
            passed,
            steps: Vec::new(),
            duration_ms: 1,
        }
    }

    #[test]
    fn test_group_counts() {
        let group = GroupReport::new(1, "G", vec![case(true), case(false), case(true)], 10);
        assert_eq!(group.passed, 2);
        assert_eq!(group.failed, 1);
        assert!(!group.all_passed());
    }

    #[test]
    fn test_run_summary() {
        let now = Utc::now();
        let groups = vec![
            GroupReport::new(1, "A", vec![case(true)], 1),
            GroupReport::new(2, "B", vec![case(false)], 1),
        ];
        let report = RunReport::new("run", now, now, groups);
        assert_eq!(report.summary_line(), "1/2 groups passed");
        assert!(!report.all_passed());
        assert_eq!(report.totals.cases, 2);
        assert_eq!(report.totals.cases_passed, 1);
    }

    #[test]
    fn test_empty_run_passes() {
        let now = Utc::now();
        let report = RunReport::new("run", now, now, Vec::new());
        assert!(report.all_passed());
        assert_eq!(report.summary_line(), "0/0 groups passed");
    }

    #[test]
    fn test_load_summary_rate() {
        let summary = LoadSummary::new(20, 16, None);
        assert!((summary.success_rate - 0.8).abs() < f64::EPSILON);
        assert!(LoadSummary::new(0, 0, None).success_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_failure_reason() {
        let mut load = LoadSummary::new(10, 5, None);
        load.unmet.push("success rate 50.0% below 80.0%".to_string());
        let step = StepOutcome {
            name: "burst".to_string(),
            method: "GET".to_string(),
            url: "https://x".to_string(),
            status: None,
            duration_ms: 3,
            results: Vec::new(),
            error: None,
            load: Some(load),
            passed: false,
        };
        assert_eq!(
            step.failure_reason().as_deref(),
            Some("success rate 50.0% below 80.0%")
        );
    }

    #[test]
    fn test_failure_reason() {
        let step = StepOutcome {
            name: "s".to_string(),
            method: "GET".to_string(),
            url: "https://x".to_string(),
            status: Some(500),
            duration_ms: 3,
            results: vec![AssertionResult::fail_with_value(
                Assertion::status(200),
                "500",
                "Expected 200",
            )],
            error: None,
            load: None,
            passed: false,
        };
        assert_eq!(
            step.failure_reason().as_deref(),
            Some("Status code = 200: Expected 200")
        );
    }
}
