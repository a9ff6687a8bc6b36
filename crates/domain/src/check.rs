//! Declarative API checks.
//!
//! A [`CheckGroup`] is a numbered set of [`CheckCase`]s. Each case runs its
//! [`Step`]s in order; a step sends one request (or a burst of them when it
//! carries a [`LoadProfile`]) and verifies the response with a [`TestSuite`].

use serde::{Deserialize, Serialize};

use crate::request::RequestSpec;
use crate::testing::{Assertion, TestSuite};

/// The API a group is aimed at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// JSONPlaceholder fake REST API.
    JsonPlaceholder,
    /// `ReqRes` hosted test API.
    ReqRes,
}

impl Target {
    /// Display name of the target.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::JsonPlaceholder => "JSONPlaceholder",
            Self::ReqRes => "ReqRes",
        }
    }
}

/// How a captured value is taken from the response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// The JSON value itself.
    #[default]
    Value,
    /// The length of the array, object or string at the path.
    Length,
    /// A response header; `path` holds the header name.
    Header,
}

/// Stores part of a response in a variable for later steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capture {
    /// Variable name, referenced later as `{{name}}`.
    pub name: String,
    /// JSON path into the response body, or a header name.
    pub path: String,
    /// What to store.
    #[serde(default)]
    pub mode: CaptureMode,
}

impl Capture {
    /// Captures the value at `path`.
    #[must_use]
    pub fn value(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mode: CaptureMode::Value,
        }
    }

    /// Captures a response header as a string.
    #[must_use]
    pub fn header(name: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: header.into(),
            mode: CaptureMode::Header,
        }
    }

    /// Captures the length of the value at `path`.
    #[must_use]
    pub fn length(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mode: CaptureMode::Length,
        }
    }
}

/// Repeats a step and judges it by success rate and latency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadProfile {
    /// Total requests to send.
    pub requests: usize,
    /// Maximum requests in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Minimum fraction of responses (0.0 to 1.0) whose assertions must pass.
    #[serde(default = "default_success_rate")]
    pub min_success_rate: f64,
    /// Upper bound on the mean latency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_avg_ms: Option<u64>,
    /// Upper bound on the slowest single response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_single_ms: Option<u64>,
}

const fn default_concurrency() -> usize {
    1
}

const fn default_success_rate() -> f64 {
    1.0
}

impl LoadProfile {
    /// Sends `requests` requests one after another.
    #[must_use]
    pub const fn sequential(requests: usize) -> Self {
        Self {
            requests,
            concurrency: 1,
            min_success_rate: 1.0,
            max_avg_ms: None,
            max_single_ms: None,
        }
    }

    /// Sends `requests` requests with `concurrency` in flight.
    #[must_use]
    pub const fn concurrent(requests: usize, concurrency: usize) -> Self {
        Self {
            requests,
            concurrency,
            min_success_rate: 1.0,
            max_avg_ms: None,
            max_single_ms: None,
        }
    }

    /// Sets the minimum success rate.
    #[must_use]
    pub const fn with_min_success_rate(mut self, rate: f64) -> Self {
        self.min_success_rate = rate;
        self
    }

    /// Sets the mean latency bound.
    #[must_use]
    pub const fn with_max_avg_ms(mut self, ms: u64) -> Self {
        self.max_avg_ms = Some(ms);
        self
    }

    /// Sets the single response latency bound.
    #[must_use]
    pub const fn with_max_single_ms(mut self, ms: u64) -> Self {
        self.max_single_ms = Some(ms);
        self
    }

    /// Concurrency clamped to `1..=requests`.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, self.requests.max(1))
    }
}

/// Transport failures a step accepts in place of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportTolerance {
    /// Only a timed out request.
    Timeout,
    /// Any failure reaching the server: timeouts, refused or reset
    /// connections, DNS errors.
    Any,
}

/// One request within a case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Request to send. Relative URLs are resolved against the group target.
    pub request: RequestSpec,
    /// Assertions for the response.
    #[serde(default)]
    pub assertions: TestSuite,
    /// Values to store for later steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<Capture>,
    /// Repeat the request under load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadProfile>,
    /// Transport failures that count as a pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerate: Option<TransportTolerance>,
}

impl Step {
    /// Creates a step with no assertions.
    #[must_use]
    pub fn new(request: RequestSpec) -> Self {
        let suite = TestSuite::new(request.name.clone());
        Self {
            request,
            assertions: suite,
            captures: Vec::new(),
            load: None,
            tolerate: None,
        }
    }

    /// Adds an assertion.
    #[must_use]
    pub fn expect(mut self, assertion: Assertion) -> Self {
        self.assertions.add(assertion);
        self
    }

    /// Adds several assertions.
    #[must_use]
    pub fn expect_all(mut self, assertions: impl IntoIterator<Item = Assertion>) -> Self {
        self.assertions.assertions.extend(assertions);
        self
    }

    /// Adds a capture.
    #[must_use]
    pub fn capture(mut self, capture: Capture) -> Self {
        self.captures.push(capture);
        self
    }

    /// Runs the step under load.
    #[must_use]
    pub const fn under_load(mut self, load: LoadProfile) -> Self {
        self.load = Some(load);
        self
    }

    /// Accepts any transport failure.
    #[must_use]
    pub const fn tolerating_transport_errors(mut self) -> Self {
        self.tolerate = Some(TransportTolerance::Any);
        self
    }

    /// Accepts a timeout but no other transport failure.
    #[must_use]
    pub const fn tolerating_timeouts(mut self) -> Self {
        self.tolerate = Some(TransportTolerance::Timeout);
        self
    }

    /// Renames the step.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.assertions.name.clone_from(&name);
        self.request.name = name;
        self
    }
}

/// A named scenario made of ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckCase {
    /// Short identifier, unique within the group (e.g. `get_all_posts`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the case verifies.
    #[serde(default)]
    pub description: String,
    /// Steps run in order.
    pub steps: Vec<Step>,
}

impl CheckCase {
    /// Creates an empty case.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends several steps.
    #[must_use]
    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }
}

/// A numbered collection of cases run together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckGroup {
    /// Group number, starting at 1.
    pub number: u8,
    /// Group title.
    pub title: String,
    /// API the cases talk to.
    pub target: Target,
    /// Cases in run order.
    pub cases: Vec<CheckCase>,
}

impl CheckGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(number: u8, title: impl Into<String>, target: Target) -> Self {
        Self {
            number,
            title: title.into(),
            target,
            cases: Vec::new(),
        }
    }

    /// Appends a case.
    #[must_use]
    pub fn case(mut self, case: CheckCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Total steps across all cases.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.cases.iter().map(|c| c.steps.len()).sum()
    }

    /// Finds a case by id.
    #[must_use]
    pub fn find_case(&self, id: &str) -> Option<&CheckCase> {
        self.cases.iter().find(|c| c.id == id)
    }
}
