//! Test runner implementation.
//!
//! Evaluates assertions against HTTP responses and produces test results.

use std::time::Instant;

use probe_application::ports::ResponseVerifier;
use probe_domain::json_path;
use probe_domain::response::ResponseSpec;
use probe_domain::testing::{
    Assertion, AssertionResult, ComparisonOperator, FieldRule, JsonKind, StatusExpectation,
    TestResults, TestSuite,
};
use regex::Regex;
use serde_json::Value;

const PREVIEW_CHARS: usize = 100;

/// Test runner that evaluates assertions against responses.
///
/// Every assertion of a suite is evaluated, so a report shows all the ways
/// a response missed its expectations.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a test suite against a response.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::unused_self)]
    pub fn run(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let start = Instant::now();
        let results: Vec<_> = suite
            .assertions
            .iter()
            .map(|assertion| Self::run_assertion(assertion, response))
            .collect();

        let duration_ms = start.elapsed().as_millis() as u64;
        TestResults::new(&suite.name, results, duration_ms)
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => {
                Self::check_status_code(assertion, response, expected)
            }
            Assertion::ResponseTime { max_ms } => {
                Self::check_response_time(assertion, response, *max_ms)
            }
            Assertion::HeaderExists { name, value } => {
                Self::check_header_exists(assertion, response, name, value.as_deref())
            }
            Assertion::HeaderMatches { name, pattern } => {
                Self::check_header_matches(assertion, response, name, pattern)
            }
            Assertion::HeaderPrefix { prefix } => {
                Self::check_header_prefix(assertion, response, prefix)
            }
            Assertion::AnyHeader { names } => Self::check_any_header(assertion, response, names),
            Assertion::BodyContains { text, ignore_case } => {
                Self::check_body_contains(assertion, response, text, *ignore_case)
            }
            Assertion::BodyNotContains { terms, ignore_case } => {
                Self::check_body_not_contains(assertion, response, terms, *ignore_case)
            }
            Assertion::BodyMatches { pattern } => {
                Self::check_body_matches(assertion, response, pattern)
            }
            Assertion::JsonPath { path, expected } => {
                Self::check_json_path(assertion, response, path, expected.as_ref())
            }
            Assertion::JsonPathMatches {
                path,
                operator,
                value,
            } => Self::check_json_path_matches(assertion, response, path, *operator, value),
            Assertion::JsonLength {
                path,
                operator,
                length,
            } => Self::check_json_length(assertion, response, path, *operator, length),
            Assertion::JsonFields { path, fields, each } => {
                Self::check_json_fields(assertion, response, path, fields, *each)
            }
            Assertion::JsonType { path, kind } => {
                Self::check_json_type(assertion, response, path, *kind)
            }
            Assertion::JsonEach {
                path,
                field,
                operator,
                value,
            } => Self::check_json_each(assertion, response, path, field, *operator, value),
            Assertion::BodyEquals { expected } => {
                Self::check_body_equals(assertion, response, expected)
            }
            Assertion::IsJson => Self::check_is_json(assertion, response),
            Assertion::IsXml => Self::check_is_xml(assertion, response),
            Assertion::ContentType { expected } => {
                Self::check_content_type(assertion, response, expected)
            }
            Assertion::BodyLength { operator, length } => {
                Self::check_body_length(assertion, response, *operator, *length)
            }
            Assertion::UrlScheme { scheme } => Self::check_url_scheme(assertion, response, scheme),
        }
    }

    fn check_status_code(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: &StatusExpectation,
    ) -> AssertionResult {
        let actual = response.status;
        if expected.matches(actual) {
            AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("Expected status {}, got {actual}", expected.description()),
            )
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn check_response_time(
        assertion: &Assertion,
        response: &ResponseSpec,
        max_ms: u64,
    ) -> AssertionResult {
        let actual_ms = response.duration.as_millis() as u64;
        if actual_ms < max_ms {
            AssertionResult::pass_with_value(assertion.clone(), format!("{actual_ms}ms"))
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                format!("{actual_ms}ms"),
                format!("Response took {actual_ms}ms, expected < {max_ms}ms"),
            )
        }
    }

    fn check_header_exists(
        assertion: &Assertion,
        response: &ResponseSpec,
        name: &str,
        expected_value: Option<&str>,
    ) -> AssertionResult {
        match (response.get_header(name), expected_value) {
            (None, _) => AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found")),
            (Some(actual), Some(expected)) if actual != expected => AssertionResult::fail_with_value(
                assertion.clone(),
                actual,
                format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
            ),
            (Some(actual), _) => AssertionResult::pass_with_value(assertion.clone(), actual),
        }
    }

    fn check_header_matches(
        assertion: &Assertion,
        response: &ResponseSpec,
        name: &str,
        pattern: &str,
    ) -> AssertionResult {
        let Some(actual) = response.get_header(name) else {
            return AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found"));
        };

        match Regex::new(pattern) {
            Ok(regex) if regex.is_match(actual) => {
                AssertionResult::pass_with_value(assertion.clone(), actual)
            }
            Ok(_) => AssertionResult::fail_with_value(
                assertion.clone(),
                actual,
                format!("Header '{name}' value '{actual}' does not match pattern '{pattern}'"),
            ),
            Err(e) => AssertionResult::fail(
                assertion.clone(),
                format!("Invalid regex pattern '{pattern}': {e}"),
            ),
        }
    }

    fn check_header_prefix(
        assertion: &Assertion,
        response: &ResponseSpec,
        prefix: &str,
    ) -> AssertionResult {
        let prefix = prefix.to_lowercase();
        let names = response.header_names();
        match names.iter().find(|name| name.starts_with(&prefix)) {
            Some(found) => AssertionResult::pass_with_value(assertion.clone(), found.clone()),
            None => AssertionResult::fail_with_value(
                assertion.clone(),
                names.join(", "),
                format!("No header starts with '{prefix}'"),
            ),
        }
    }

    fn check_any_header(
        assertion: &Assertion,
        response: &ResponseSpec,
        names: &[String],
    ) -> AssertionResult {
        match names.iter().find(|name| response.get_header(name).is_some()) {
            Some(found) => AssertionResult::pass_with_value(assertion.clone(), found.clone()),
            None => AssertionResult::fail(
                assertion.clone(),
                format!("None of the headers [{}] found", names.join(", ")),
            ),
        }
    }

    fn check_body_contains(
        assertion: &Assertion,
        response: &ResponseSpec,
        text: &str,
        ignore_case: bool,
    ) -> AssertionResult {
        if contains(&response.body, text, ignore_case) {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&response.body),
                format!("Body does not contain '{text}'"),
            )
        }
    }

    fn check_body_not_contains(
        assertion: &Assertion,
        response: &ResponseSpec,
        terms: &[String],
        ignore_case: bool,
    ) -> AssertionResult {
        let found: Vec<&str> = terms
            .iter()
            .filter(|term| contains(&response.body, term, ignore_case))
            .map(String::as_str)
            .collect();

        if found.is_empty() {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&response.body),
                format!("Body contains forbidden terms: {}", found.join(", ")),
            )
        }
    }

    fn check_body_matches(
        assertion: &Assertion,
        response: &ResponseSpec,
        pattern: &str,
    ) -> AssertionResult {
        match Regex::new(pattern) {
            Ok(regex) if regex.is_match(&response.body) => AssertionResult::pass(assertion.clone()),
            Ok(_) => AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&response.body),
                format!("Body does not match pattern '{pattern}'"),
            ),
            Err(e) => AssertionResult::fail(
                assertion.clone(),
                format!("Invalid regex pattern '{pattern}': {e}"),
            ),
        }
    }

    fn check_json_path(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        expected: Option<&Value>,
    ) -> AssertionResult {
        let value = match lookup(response, path) {
            Ok(value) => value,
            Err(error) => return AssertionResult::fail(assertion.clone(), error),
        };

        match expected {
            Some(expected) if !json_equals(&value, expected) => AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' value mismatch: expected {expected}, got {value}"),
            ),
            _ => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
        }
    }

    fn check_json_path_matches(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        operator: ComparisonOperator,
        expected: &Value,
    ) -> AssertionResult {
        let value = match lookup(response, path) {
            Ok(value) => value,
            Err(error) => return AssertionResult::fail(assertion.clone(), error),
        };

        if compare_json_values(&value, operator, expected) {
            AssertionResult::pass_with_value(assertion.clone(), value.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!(
                    "JSON path '{path}' comparison failed: {value} {} {expected}",
                    operator.symbol()
                ),
            )
        }
    }

    fn check_json_length(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        operator: ComparisonOperator,
        expected: &Value,
    ) -> AssertionResult {
        let Some(expected_length) = expected.as_u64().and_then(|n| usize::try_from(n).ok()) else {
            return AssertionResult::fail(
                assertion.clone(),
                format!("Expected length {expected} is not a non-negative integer"),
            );
        };

        let value = match lookup(response, path) {
            Ok(value) => value,
            Err(error) => return AssertionResult::fail(assertion.clone(), error),
        };

        let Some(actual_length) = json_path::length(&value) else {
            return AssertionResult::fail_with_value(
                assertion.clone(),
                value.to_string(),
                format!("JSON path '{path}' has no length"),
            );
        };

        if operator.compare_len(actual_length, expected_length) {
            AssertionResult::pass_with_value(assertion.clone(), actual_length.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual_length.to_string(),
                format!(
                    "JSON path '{path}' length {actual_length} does not {} {expected_length}",
                    operator.symbol()
                ),
            )
        }
    }

    fn check_json_fields(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        fields: &[FieldRule],
        each: bool,
    ) -> AssertionResult {
        let value = match lookup(response, path) {
            Ok(value) => value,
            Err(error) => return AssertionResult::fail(assertion.clone(), error),
        };

        let problems: Vec<String> = if each {
            let Some(items) = value.as_array() else {
                return AssertionResult::fail(
                    assertion.clone(),
                    format!("JSON path '{path}' is not an array"),
                );
            };
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    field_problem(item, fields).map(|problem| format!("item {index}: {problem}"))
                })
                .collect()
        } else {
            field_problem(&value, fields).into_iter().collect()
        };

        match problems.first() {
            None => AssertionResult::pass(assertion.clone()),
            Some(first) => AssertionResult::fail(
                assertion.clone(),
                if problems.len() > 1 {
                    format!("{first} (and {} more)", problems.len() - 1)
                } else {
                    first.clone()
                },
            ),
        }
    }

    fn check_json_type(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        kind: JsonKind,
    ) -> AssertionResult {
        let value = match lookup(response, path) {
            Ok(value) => value,
            Err(error) => return AssertionResult::fail(assertion.clone(), error),
        };

        if kind.matches(&value) {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&value.to_string()),
                format!("JSON path '{path}' is not {}", kind.name()),
            )
        }
    }

    fn check_json_each(
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        field: &str,
        operator: ComparisonOperator,
        expected: &Value,
    ) -> AssertionResult {
        let value = match lookup(response, path) {
            Ok(value) => value,
            Err(error) => return AssertionResult::fail(assertion.clone(), error),
        };

        let Some(items) = value.as_array() else {
            return AssertionResult::fail(
                assertion.clone(),
                format!("JSON path '{path}' is not an array"),
            );
        };

        let offender = items.iter().enumerate().find(|(_, item)| {
            item.get(field)
                .is_none_or(|actual| !compare_json_values(actual, operator, expected))
        });

        match offender {
            None => AssertionResult::pass_with_value(assertion.clone(), format!("{} items", items.len())),
            Some((index, item)) => {
                let actual = item.get(field).map_or_else(|| "missing".to_string(), Value::to_string);
                AssertionResult::fail_with_value(
                    assertion.clone(),
                    actual.clone(),
                    format!(
                        "Item {index}: {field} = {actual}, expected {} {expected}",
                        operator.symbol()
                    ),
                )
            }
        }
    }

    fn check_body_equals(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: &str,
    ) -> AssertionResult {
        if response.body == expected {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                preview(&response.body),
                "Body does not match expected value",
            )
        }
    }

    fn check_is_json(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match response.json() {
            Ok(_) => AssertionResult::pass(assertion.clone()),
            Err(e) => AssertionResult::fail(assertion.clone(), format!("Body is not valid JSON: {e}")),
        }
    }

    fn check_is_xml(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        // Loose check: starts and ends with a tag and the brackets balance.
        let body = response.body.trim();
        if body.starts_with('<')
            && body.ends_with('>')
            && body.matches('<').count() == body.matches('>').count()
        {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail(assertion.clone(), "Body does not appear to be valid XML")
        }
    }

    fn check_content_type(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: &str,
    ) -> AssertionResult {
        match &response.content_type {
            Some(actual) if contains(actual, expected, true) => {
                AssertionResult::pass_with_value(assertion.clone(), actual.clone())
            }
            Some(actual) => AssertionResult::fail_with_value(
                assertion.clone(),
                actual.clone(),
                format!("Content-Type '{actual}' does not contain '{expected}'"),
            ),
            None => AssertionResult::fail(assertion.clone(), "No Content-Type header present"),
        }
    }

    fn check_body_length(
        assertion: &Assertion,
        response: &ResponseSpec,
        operator: ComparisonOperator,
        expected_length: usize,
    ) -> AssertionResult {
        let actual_length = response.body.len();
        if operator.compare_len(actual_length, expected_length) {
            AssertionResult::pass_with_value(assertion.clone(), actual_length.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual_length.to_string(),
                format!(
                    "Body length {actual_length} does not {} {expected_length}",
                    operator.symbol()
                ),
            )
        }
    }

    fn check_url_scheme(
        assertion: &Assertion,
        response: &ResponseSpec,
        scheme: &str,
    ) -> AssertionResult {
        let prefix = format!("{}://", scheme.to_lowercase());
        if response.url.to_lowercase().starts_with(&prefix) {
            AssertionResult::pass_with_value(assertion.clone(), response.url.clone())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                response.url.clone(),
                format!("URL '{}' does not use {prefix}", response.url),
            )
        }
    }
}

impl ResponseVerifier for TestRunner {
    fn verify(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        self.run(suite, response)
    }
}

/// Parses the body and resolves `path`, describing any failure.
fn lookup(response: &ResponseSpec, path: &str) -> Result<Value, String> {
    let json = response
        .json()
        .map_err(|e| format!("Failed to parse body as JSON: {e}"))?;

    match json_path::query(&json, path) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(format!("JSON path '{path}' not found")),
        Err(e) => Err(format!("Invalid JSON path '{path}': {e}")),
    }
}

/// First rule the object breaks, if any.
fn field_problem(item: &Value, fields: &[FieldRule]) -> Option<String> {
    let Some(object) = item.as_object() else {
        return Some("not an object".to_string());
    };

    fields.iter().find_map(|rule| match (object.get(&rule.name), rule.kind) {
        (None, _) => Some(format!("missing field '{}'", rule.name)),
        (Some(value), Some(kind)) if !kind.matches(value) => {
            Some(format!("field '{}' is not {}", rule.name, kind.name()))
        }
        _ => None,
    })
}

fn contains(haystack: &str, needle: &str, ignore_case: bool) -> bool {
    if ignore_case {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(needle)
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

/// Compare two JSON values using the given operator.
fn compare_json_values(actual: &Value, operator: ComparisonOperator, expected: &Value) -> bool {
    match operator {
        ComparisonOperator::Equals => json_equals(actual, expected),
        ComparisonOperator::NotEquals => !json_equals(actual, expected),
        ComparisonOperator::GreaterThan => compare_numeric(actual, expected, |a, b| a > b),
        ComparisonOperator::GreaterThanOrEqual => compare_numeric(actual, expected, |a, b| a >= b),
        ComparisonOperator::LessThan => compare_numeric(actual, expected, |a, b| a < b),
        ComparisonOperator::LessThanOrEqual => compare_numeric(actual, expected, |a, b| a <= b),
        ComparisonOperator::Contains => match (actual, expected) {
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            (Value::Array(items), _) => items.contains(expected),
            _ => false,
        },
        ComparisonOperator::StartsWith => match (actual, expected) {
            (Value::String(s), Value::String(prefix)) => s.starts_with(prefix.as_str()),
            _ => false,
        },
        ComparisonOperator::Matches => match (actual, expected) {
            (Value::String(s), Value::String(pattern)) => {
                Regex::new(pattern).is_ok_and(|re| re.is_match(s))
            }
            _ => false,
        },
    }
}

/// Equality that treats `1` and `1.0` as the same number, at any depth.
fn json_equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(_), Value::Number(_)) => match (actual.as_f64(), expected.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => actual == expected,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| json_equals(x, y)))
        }
        _ => actual == expected,
    }
}

/// Compare numeric values.
fn compare_numeric<F>(actual: &Value, expected: &Value, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}
