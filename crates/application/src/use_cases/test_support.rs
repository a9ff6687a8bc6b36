//! In-memory doubles for use case tests.

use std::sync::Mutex;
use std::time::Duration;

use probe_domain::request::{Headers, RequestSpec};
use probe_domain::response::ResponseSpec;
use probe_domain::testing::{Assertion, AssertionResult, TestResults, TestSuite};
use serde_json::Value;

use crate::ports::{HttpClient, HttpClientError, HttpFuture, ResponseVerifier};

struct Route {
    path: String,
    status: u16,
    body: Value,
    headers: Headers,
}

/// Answers by URL path; unknown paths get a 404.
#[derive(Default)]
pub struct RoutedClient {
    routes: Vec<Route>,
    failure: Option<HttpClientError>,
    requested: Mutex<Vec<String>>,
    last_headers: Mutex<Headers>,
}

impl RoutedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, status: u16, body: Value) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            status,
            body,
            headers: Headers::new(),
        });
        self
    }

    /// Adds a response header to the most recent route.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let Some(route) = self.routes.last_mut() {
            route.headers.set(name, value);
        }
        self
    }

    pub fn failing(mut self, error: HttpClientError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn last_header(&self, name: &str) -> Option<String> {
        self.last_headers.lock().unwrap().get(name).map(ToString::to_string)
    }

    fn respond(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        let url = request.full_url();
        self.requested.lock().unwrap().push(url.clone());
        *self.last_headers.lock().unwrap() = request.headers.clone();

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let path = path_of(&url);
        let (status, body, mut headers) = self
            .routes
            .iter()
            .find(|r| r.path == path)
            .map_or((404, Value::Object(serde_json::Map::new()), Headers::new()), |r| {
                (r.status, r.body.clone(), r.headers.clone())
            });
        headers.set("Content-Type", "application/json; charset=utf-8");

        Ok(ResponseSpec::new(
            status,
            headers,
            body.to_string().into_bytes(),
            Duration::from_millis(12),
        )
        .with_url(url))
    }
}

impl HttpClient for RoutedClient {
    fn execute(&self, request: &RequestSpec) -> HttpFuture<'_> {
        let result = self.respond(request);
        Box::pin(async move { result })
    }
}

fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("/", |i| &without_scheme[i..]);
    path.split_once('?').map_or(path, |(p, _)| p)
}

/// Checks status assertions and passes everything else.
pub struct StatusVerifier;

impl ResponseVerifier for StatusVerifier {
    fn verify(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let results = suite
            .assertions
            .iter()
            .map(|assertion| match assertion {
                Assertion::StatusCode { expected } if !expected.matches(response.status) => {
                    AssertionResult::fail_with_value(
                        assertion.clone(),
                        response.status.to_string(),
                        "unexpected status",
                    )
                }
                _ => AssertionResult::pass(assertion.clone()),
            })
            .collect();
        TestResults::new(&suite.name, results, 0)
    }
}
