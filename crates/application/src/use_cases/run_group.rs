//! Run Group Use Case
//!
//! Executes the cases of one check group against its target API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use probe_domain::json_path;
use probe_domain::request::RequestSpec;
use probe_domain::response::ResponseSpec;
use probe_domain::{
    Capture, CaptureMode, CaseOutcome, CheckCase, CheckGroup, GroupReport, LatencyStats,
    LoadProfile, LoadSummary, Step, StepOutcome,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::{ApiSession, Sessions};
use crate::execute_request::{ExecuteRequest, ExecuteRequestError};
use crate::ports::{HttpClient, ResponseVerifier};
use crate::variable_resolver::VariableResolver;

/// Distinct per-request errors kept in a load summary.
const MAX_LOAD_ERRORS: usize = 5;

/// Use case that runs every case of a [`CheckGroup`].
///
/// Cases run in order and independently: each gets a fresh
/// [`VariableResolver`], and a case stops at its first failed step.
pub struct RunGroup {
    executor: ExecuteRequest,
    verifier: Arc<dyn ResponseVerifier>,
    sessions: Sessions,
}

impl RunGroup {
    /// Creates the use case.
    #[must_use]
    pub fn new(
        client: Arc<dyn HttpClient>,
        verifier: Arc<dyn ResponseVerifier>,
        sessions: Sessions,
    ) -> Self {
        Self {
            executor: ExecuteRequest::new(client),
            verifier,
            sessions,
        }
    }

    /// Runs the group and reports every case.
    pub async fn execute(&self, group: &CheckGroup) -> GroupReport {
        let session = self.sessions.for_target(group.target);
        info!(
            group = group.number,
            title = %group.title,
            target = group.target.display_name(),
            cases = group.cases.len(),
            "running group"
        );

        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(group.cases.len());
        for case in &group.cases {
            let outcome = self.run_case(case, session).await;
            if outcome.passed {
                info!(case = %case.id, duration_ms = outcome.duration_ms, "case passed");
            } else {
                let reason = outcome
                    .steps
                    .iter()
                    .find_map(StepOutcome::failure_reason)
                    .unwrap_or_default();
                warn!(case = %case.id, %reason, "case failed");
            }
            outcomes.push(outcome);
        }

        let report = GroupReport::new(group.number, &group.title, outcomes, elapsed_ms(start));
        info!(
            group = group.number,
            passed = report.passed,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "group finished"
        );
        report
    }

    /// Runs one case against `session`.
    pub async fn run_case(&self, case: &CheckCase, session: &ApiSession) -> CaseOutcome {
        let mut resolver = VariableResolver::new();
        let mut steps = Vec::with_capacity(case.steps.len());
        let mut passed = true;
        let start = Instant::now();

        for step in &case.steps {
            let outcome = self.run_step(step, session, &mut resolver).await;
            let step_passed = outcome.passed;
            steps.push(outcome);
            if !step_passed {
                passed = false;
                break;
            }
        }

        CaseOutcome {
            id: case.id.clone(),
            name: case.name.clone(),
            description: case.description.clone(),
            passed,
            steps,
            duration_ms: elapsed_ms(start),
        }
    }

    async fn run_step(
        &self,
        step: &Step,
        session: &ApiSession,
        resolver: &mut VariableResolver,
    ) -> StepOutcome {
        let resolved = match resolver.resolve_step(step) {
            Ok(resolved) => resolved,
            Err(e) => {
                let mut outcome = blank_outcome(&session.prepare(step.request.clone()));
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };

        let request = session.prepare(resolved.request.clone());
        match &resolved.load {
            Some(load) => self.run_load(&resolved, request, load).await,
            None => self.run_single(&resolved, &request, resolver).await,
        }
    }

    async fn run_single(
        &self,
        step: &Step,
        request: &RequestSpec,
        resolver: &mut VariableResolver,
    ) -> StepOutcome {
        let mut outcome = blank_outcome(request);
        let start = Instant::now();
        let result = self.executor.execute(request).await;
        outcome.duration_ms = elapsed_ms(start);

        match result {
            Ok(response) => {
                outcome.status = Some(response.status);
                let results = self.verifier.verify(&step.assertions, &response);
                outcome.passed = results.all_passed();
                outcome.results = results.results;

                if outcome.passed
                    && let Err(error) = apply_captures(&step.captures, &response, resolver)
                {
                    outcome.passed = false;
                    outcome.error = Some(error);
                }
            }
            Err(e) if e.is_tolerated(step.tolerate) => {
                debug!(step = %outcome.name, error = %e, "transport error tolerated");
                outcome.passed = true;
                outcome.error = Some(format!("tolerated: {e}"));
            }
            Err(e) => outcome.error = Some(e.to_string()),
        }

        outcome
    }

    async fn run_load(&self, step: &Step, request: RequestSpec, load: &LoadProfile) -> StepOutcome {
        let mut outcome = blank_outcome(&request);
        let concurrency = load.effective_concurrency();
        debug!(
            url = %outcome.url,
            requests = load.requests,
            concurrency,
            "running load step"
        );

        let start = Instant::now();
        let samples: Vec<Sample> = stream::iter(0..load.requests)
            .map(|_| self.sample(step, &request))
            .buffer_unordered(concurrency)
            .collect()
            .await;
        outcome.duration_ms = elapsed_ms(start);

        let succeeded = samples.iter().filter(|s| s.error.is_none()).count();
        let durations: Vec<Duration> = samples.iter().filter_map(|s| s.latency).collect();
        let mut summary =
            LoadSummary::new(load.requests, succeeded, LatencyStats::from_durations(&durations));

        for error in samples.into_iter().filter_map(|s| s.error) {
            if summary.errors.len() >= MAX_LOAD_ERRORS {
                break;
            }
            if !summary.errors.contains(&error) {
                summary.errors.push(error);
            }
        }
        summary.unmet = unmet_criteria(load, &summary);

        outcome.passed = summary.criteria_met();
        outcome.load = Some(summary);
        outcome
    }

    async fn sample(&self, step: &Step, request: &RequestSpec) -> Sample {
        match self.executor.execute(request).await {
            Ok(response) => {
                let results = self.verifier.verify(&step.assertions, &response);
                let error = results.failures().next().map(|failure| {
                    failure.error.as_ref().map_or_else(
                        || failure.description.clone(),
                        |e| format!("{}: {e}", failure.description),
                    )
                });
                Sample {
                    latency: Some(response.duration),
                    error,
                }
            }
            Err(e) if e.is_tolerated(step.tolerate) => Sample {
                latency: None,
                error: None,
            },
            Err(e) => Sample {
                latency: None,
                error: Some(transport_message(&e)),
            },
        }
    }
}

/// One request of a load step.
struct Sample {
    latency: Option<Duration>,
    error: Option<String>,
}

fn transport_message(error: &ExecuteRequestError) -> String {
    match error {
        ExecuteRequestError::HttpError(e) => e.title().to_string(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn unmet_criteria(load: &LoadProfile, summary: &LoadSummary) -> Vec<String> {
    let mut unmet = Vec::new();

    if summary.success_rate < load.min_success_rate {
        unmet.push(format!(
            "success rate {:.1}% below {:.1}%",
            summary.success_rate * 100.0,
            load.min_success_rate * 100.0
        ));
    }

    let bounds = [
        ("mean", load.max_avg_ms, summary.latency.map(|l| l.mean_ms)),
        ("slowest", load.max_single_ms, summary.latency.map(|l| l.max_ms)),
    ];
    for (label, bound, actual) in bounds {
        let Some(bound) = bound else { continue };
        match actual {
            Some(ms) if ms > bound as f64 => {
                unmet.push(format!("{label} latency {ms:.0}ms exceeds {bound}ms"));
            }
            Some(_) => {}
            None => unmet.push(format!("no responses to measure {label} latency")),
        }
    }

    unmet
}

fn apply_captures(
    captures: &[Capture],
    response: &ResponseSpec,
    resolver: &mut VariableResolver,
) -> Result<(), String> {
    let mut body: Option<Value> = None;

    for capture in captures {
        let value = if capture.mode == CaptureMode::Header {
            response
                .get_header(&capture.path)
                .map(|v| Value::String(v.to_string()))
                .ok_or_else(|| format!("capture '{}': header {} missing", capture.name, capture.path))?
        } else {
            if body.is_none() {
                body = Some(
                    response
                        .json()
                        .map_err(|e| format!("capture '{}': body is not JSON: {e}", capture.name))?,
                );
            }
            let json = body.as_ref().unwrap_or(&Value::Null);
            let found = json_path::query(json, &capture.path)
                .map_err(|e| format!("capture '{}': {e}", capture.name))?
                .ok_or_else(|| format!("capture '{}': {} not found", capture.name, capture.path))?;

            if capture.mode == CaptureMode::Length {
                let len = json_path::length(&found).ok_or_else(|| {
                    format!("capture '{}': {} has no length", capture.name, capture.path)
                })?;
                Value::from(len)
            } else {
                found
            }
        };

        debug!(variable = %capture.name, value = %value, "captured");
        resolver.set(&capture.name, value);
    }

    Ok(())
}

fn blank_outcome(request: &RequestSpec) -> StepOutcome {
    StepOutcome {
        name: request.name.clone(),
        method: request.method.as_str().to_string(),
        url: request.full_url(),
        status: None,
        duration_ms: 0,
        results: Vec::new(),
        error: None,
        load: None,
        passed: false,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_domain::testing::Assertion;
    use probe_domain::{ProbeConfig, Target};
    use serde_json::json;

    use crate::ports::HttpClientError;
    use crate::use_cases::test_support::{RoutedClient, StatusVerifier};

    fn run_group(client: RoutedClient) -> (RunGroup, Arc<RoutedClient>) {
        let client = Arc::new(client);
        let sessions = Sessions::from_config(&ProbeConfig::default());
        let use_case = RunGroup::new(client.clone(), Arc::new(StatusVerifier), sessions);
        (use_case, client)
    }

    fn group(cases: Vec<CheckCase>) -> CheckGroup {
        cases
            .into_iter()
            .fold(CheckGroup::new(3, "Relationships", Target::JsonPlaceholder), CheckGroup::case)
    }

    #[tokio::test]
    async fn test_captured_value_flows_into_next_step() {
        let client = RoutedClient::new()
            .route("/users/1/albums", 200, json!([{"id": 3}, {"id": 4}]))
            .route("/albums/3/photos", 200, json!([{"albumId": 3}]));
        let (use_case, client) = run_group(client);

        let case = CheckCase::new("3.3", "album photos")
            .step(
                Step::new(RequestSpec::get("/users/1/albums"))
                    .expect(Assertion::status(200))
                    .capture(Capture::value("album_id", "$[0].id")),
            )
            .step(
                Step::new(RequestSpec::get("/albums/{{album_id}}/photos"))
                    .expect(Assertion::status(200)),
            );

        let report = use_case.execute(&group(vec![case])).await;

        assert!(report.all_passed());
        assert_eq!(
            client.requested(),
            vec![
                "https://jsonplaceholder.typicode.com/users/1/albums".to_string(),
                "https://jsonplaceholder.typicode.com/albums/3/photos".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_case_stops_at_first_failed_step() {
        let client = RoutedClient::new()
            .route("/posts/1", 404, json!({}))
            .route("/posts/2", 200, json!({}));
        let (use_case, client) = run_group(client);

        let case = CheckCase::new("1.2", "single post")
            .step(Step::new(RequestSpec::get("/posts/1")).expect(Assertion::status(200)))
            .step(Step::new(RequestSpec::get("/posts/2")).expect(Assertion::status(200)));

        let report = use_case.execute(&group(vec![case])).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.cases[0].steps.len(), 1);
        assert_eq!(client.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_cases_are_independent() {
        let client = RoutedClient::new()
            .route("/posts/1", 200, json!({"id": 1}))
            .route("/posts/{{id}}", 200, json!({}));
        let (use_case, _) = run_group(client);

        let first = CheckCase::new("a", "captures").step(
            Step::new(RequestSpec::get("/posts/1"))
                .expect(Assertion::status(200))
                .capture(Capture::value("id", "$.id")),
        );
        let second = CheckCase::new("b", "reuses")
            .step(Step::new(RequestSpec::get("/posts/{{id}}")).expect(Assertion::status(200)));

        let report = use_case.execute(&group(vec![first, second])).await;

        assert!(report.cases[0].passed);
        assert!(!report.cases[1].passed);
        let error = report.cases[1].steps[0].error.clone().unwrap();
        assert_eq!(error, "invalid step: unresolved variables: id");
    }

    #[tokio::test]
    async fn test_header_and_length_captures() {
        let client = RoutedClient::new()
            .route("/posts/1/comments", 200, json!([{}, {}, {}]))
            .with_header("ETag", "W/\"abc\"")
            .route("/comments", 200, json!([{}, {}, {}]));
        let (use_case, client) = run_group(client);

        let case = CheckCase::new("3.5", "counts")
            .step(
                Step::new(RequestSpec::get("/posts/1/comments"))
                    .capture(Capture::length("count", "$"))
                    .capture(Capture::header("etag", "ETag")),
            )
            .step(
                Step::new(
                    RequestSpec::get("/comments")
                        .with_query("n", "{{count}}")
                        .with_header("If-None-Match", "{{etag}}"),
                )
                .expect(Assertion::status(200)),
            );

        let report = use_case.execute(&group(vec![case])).await;

        assert!(report.all_passed());
        assert_eq!(
            client.requested()[1],
            "https://jsonplaceholder.typicode.com/comments?n=3"
        );
        assert_eq!(
            client.last_header("If-None-Match").as_deref(),
            Some("W/\"abc\"")
        );
    }

    #[tokio::test]
    async fn test_missing_capture_fails_step() {
        let client = RoutedClient::new().route("/users/1/albums", 200, json!([]));
        let (use_case, _) = run_group(client);

        let case = CheckCase::new("3.3", "albums").step(
            Step::new(RequestSpec::get("/users/1/albums"))
                .capture(Capture::value("album_id", "$[0].id")),
        );

        let report = use_case.execute(&group(vec![case])).await;
        let step = &report.cases[0].steps[0];

        assert!(!step.passed);
        assert_eq!(
            step.error.as_deref(),
            Some("capture 'album_id': $[0].id not found")
        );
    }

    #[tokio::test]
    async fn test_tolerated_transport_error_passes() {
        let client = RoutedClient::new().failing(HttpClientError::Timeout { timeout_ms: 5000 });
        let (use_case, _) = run_group(client);

        let tolerant = CheckCase::new("2.6", "large payload").step(
            Step::new(RequestSpec::get("/posts"))
                .expect(Assertion::status(200))
                .tolerating_transport_errors(),
        );
        let strict = CheckCase::new("1.1", "posts")
            .step(Step::new(RequestSpec::get("/posts")).expect(Assertion::status(200)));

        let report = use_case.execute(&group(vec![tolerant, strict])).await;

        assert!(report.cases[0].passed);
        assert_eq!(
            report.cases[0].steps[0].error.as_deref(),
            Some("tolerated: request timed out after 5000ms")
        );
        assert!(!report.cases[1].passed);
    }

    #[tokio::test]
    async fn test_timeout_tolerance_rejects_other_failures() {
        let timeout_only = || {
            CheckCase::new("2.4", "injection").step(
                Step::new(RequestSpec::get("/posts"))
                    .expect(Assertion::status(200))
                    .tolerating_timeouts(),
            )
        };

        let (timing_out, _) = run_group(
            RoutedClient::new().failing(HttpClientError::Timeout { timeout_ms: 5000 }),
        );
        let report = timing_out.execute(&group(vec![timeout_only()])).await;
        assert!(report.cases[0].passed);

        let (offline, _) = run_group(
            RoutedClient::new().failing(HttpClientError::ConnectionFailed("reset".to_string())),
        );
        let report = offline.execute(&group(vec![timeout_only()])).await;
        assert!(!report.cases[0].passed);
        assert_eq!(
            report.cases[0].steps[0].error.as_deref(),
            Some("connection failed: reset")
        );
    }

    #[tokio::test]
    async fn test_load_step_summarises_requests() {
        let client = RoutedClient::new().route("/posts/1", 200, json!({"id": 1}));
        let (use_case, client) = run_group(client);

        let case = CheckCase::new("4.6", "rapid").step(
            Step::new(RequestSpec::get("/posts/1"))
                .expect(Assertion::status(200))
                .under_load(LoadProfile::concurrent(10, 4).with_min_success_rate(0.8)),
        );

        let report = use_case.execute(&group(vec![case])).await;
        let load = report.cases[0].steps[0].load.clone().unwrap();

        assert!(report.all_passed());
        assert_eq!(client.requested().len(), 10);
        assert_eq!(load.succeeded, 10);
        assert_eq!(load.latency.unwrap().samples, 10);
        assert!(load.unmet.is_empty());
    }

    #[tokio::test]
    async fn test_load_step_below_success_rate_fails() {
        let client = RoutedClient::new().route("/posts/1", 503, json!({}));
        let (use_case, _) = run_group(client);

        let case = CheckCase::new("2.5", "rate limit").step(
            Step::new(RequestSpec::get("/posts/1"))
                .expect(Assertion::status(200))
                .under_load(
                    LoadProfile::sequential(4)
                        .with_min_success_rate(0.8)
                        .with_max_avg_ms(60_000),
                ),
        );

        let report = use_case.execute(&group(vec![case])).await;
        let step = &report.cases[0].steps[0];
        let load = step.load.clone().unwrap();

        assert!(!step.passed);
        assert_eq!(load.succeeded, 0);
        assert_eq!(load.unmet, vec!["success rate 0.0% below 80.0%".to_string()]);
        assert_eq!(load.errors.len(), 1);
        assert_eq!(
            step.failure_reason().as_deref(),
            Some("success rate 0.0% below 80.0%")
        );
    }

    #[tokio::test]
    async fn test_load_step_without_responses_cannot_meet_latency_bound() {
        let client = RoutedClient::new().failing(HttpClientError::ConnectionFailed("reset".into()));
        let (use_case, _) = run_group(client);

        let case = CheckCase::new("5.2", "concurrency").step(
            Step::new(RequestSpec::get("/posts"))
                .under_load(
                    LoadProfile::concurrent(3, 3)
                        .with_min_success_rate(0.0)
                        .with_max_avg_ms(5000),
                ),
        );

        let report = use_case.execute(&group(vec![case])).await;
        let load = report.cases[0].steps[0].load.clone().unwrap();

        assert_eq!(
            load.unmet,
            vec!["no responses to measure mean latency".to_string()]
        );
        assert_eq!(load.errors, vec!["Connection failed".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_case_passes() {
        let (use_case, _) = run_group(RoutedClient::new());
        let session = ApiSession::new("https://api.example.com");
        let outcome = use_case
            .run_case(&CheckCase::new("x", "empty"), &session)
            .await;
        assert!(outcome.passed);
        assert!(outcome.steps.is_empty());
    }
}
