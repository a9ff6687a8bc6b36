//! Response testing and assertions.
//!
//! This module provides types for defining assertions on HTTP responses and
//! collecting their results. Evaluation lives in the infrastructure layer.

use serde::{Deserialize, Serialize};

/// A test assertion to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check response time.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
    /// Check header exists and optionally its value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        #[serde(default)]
        value: Option<String>,
    },
    /// Check header value matches pattern.
    HeaderMatches {
        /// Header name.
        name: String,
        /// Regex pattern to match.
        pattern: String,
    },
    /// Check that at least one header name starts with a prefix.
    HeaderPrefix {
        /// Lowercase prefix, e.g. `access-control`.
        prefix: String,
    },
    /// Check that at least one of the named headers is present.
    AnyHeader {
        /// Candidate header names.
        names: Vec<String>,
    },
    /// Check body contains text.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        #[serde(default)]
        ignore_case: bool,
    },
    /// Check body contains none of the given terms.
    BodyNotContains {
        /// Forbidden terms.
        terms: Vec<String>,
        /// Case-insensitive search.
        #[serde(default)]
        ignore_case: bool,
    },
    /// Check body matches regex pattern.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
    /// Check JSON path exists and optionally its value.
    JsonPath {
        /// JSONPath expression (e.g., "$.data.id").
        path: String,
        /// Expected value (as JSON).
        #[serde(default)]
        expected: Option<serde_json::Value>,
    },
    /// Check JSON path value matches condition.
    JsonPathMatches {
        /// JSONPath expression.
        path: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Value to compare against.
        value: serde_json::Value,
    },
    /// Check the length of the array, object or string at a JSON path.
    JsonLength {
        /// JSONPath expression.
        path: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Length to compare against (a number, or a captured variable).
        length: serde_json::Value,
    },
    /// Check required fields (and optionally their kinds) at a JSON path.
    JsonFields {
        /// JSONPath expression of the object, or of an array when `each` is set.
        path: String,
        /// Required fields.
        fields: Vec<FieldRule>,
        /// Apply the rules to every element of the array at `path`.
        #[serde(default)]
        each: bool,
    },
    /// Check the kind of the value at a JSON path.
    JsonType {
        /// JSONPath expression.
        path: String,
        /// Required kind.
        kind: JsonKind,
    },
    /// Check that a field of every array element satisfies a comparison.
    JsonEach {
        /// JSONPath expression of the array.
        path: String,
        /// Field name inside each element.
        field: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Value to compare against.
        value: serde_json::Value,
    },
    /// Check body equals expected value.
    BodyEquals {
        /// Expected body content.
        expected: String,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check body is valid XML.
    IsXml,
    /// Check content type.
    ContentType {
        /// Expected content type (partial match, case-insensitive).
        expected: String,
    },
    /// Check body length.
    BodyLength {
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Length to compare against.
        length: usize,
    },
    /// Check the scheme of the final response URL.
    UrlScheme {
        /// Expected scheme, e.g. `https`.
        scheme: String,
    },
}

impl Assertion {
    /// Shorthand for an exact status code assertion.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Shorthand for a status code that must be one of the given codes.
    #[must_use]
    pub fn status_in(codes: &[u16]) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::OneOf(codes.to_vec()),
        }
    }

    /// Shorthand for a JSON path equality assertion.
    #[must_use]
    pub fn json_eq(path: impl Into<String>, expected: serde_json::Value) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(expected),
        }
    }

    /// Shorthand for an exact JSON length assertion.
    #[must_use]
    pub fn json_len(path: impl Into<String>, length: usize) -> Self {
        Self::JsonLength {
            path: path.into(),
            operator: ComparisonOperator::Equals,
            length: serde_json::Value::from(length),
        }
    }

    /// Shorthand for required fields on every element of an array.
    #[must_use]
    pub fn each_has_fields(path: impl Into<String>, names: &[&str]) -> Self {
        Self::JsonFields {
            path: path.into(),
            fields: names.iter().map(|n| FieldRule::required(*n)).collect(),
            each: true,
        }
    }

    /// Shorthand for required fields on a single object.
    #[must_use]
    pub fn has_fields(path: impl Into<String>, names: &[&str]) -> Self {
        Self::JsonFields {
            path: path.into(),
            fields: names.iter().map(|n| FieldRule::required(*n)).collect(),
            each: false,
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::ResponseTime { max_ms } => format!("Response time < {max_ms}ms"),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("Header '{name}' exists"),
            Self::HeaderMatches { name, pattern } => {
                format!("Header '{name}' matches /{pattern}/")
            }
            Self::HeaderPrefix { prefix } => format!("A header starts with '{prefix}'"),
            Self::AnyHeader { names } => format!("One of headers [{}] exists", names.join(", ")),
            Self::BodyContains { text, .. } => format!("Body contains '{text}'"),
            Self::BodyNotContains { terms, .. } => {
                format!("Body contains none of [{}]", terms.join(", "))
            }
            Self::BodyMatches { pattern } => format!("Body matches /{pattern}/"),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::JsonPathMatches {
                path,
                operator,
                value,
            } => format!("JSON {path} {} {value}", operator.symbol()),
            Self::JsonLength {
                path,
                operator,
                length,
            } => format!("JSON {path} length {} {length}", operator.symbol()),
            Self::JsonFields { path, fields, each } => {
                let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
                let scope = if *each { "every item of " } else { "" };
                format!("{scope}JSON {path} has fields [{}]", names.join(", "))
            }
            Self::JsonType { path, kind } => format!("JSON {path} is {}", kind.name()),
            Self::JsonEach {
                path,
                field,
                operator,
                value,
            } => format!("every item of JSON {path} has {field} {} {value}", operator.symbol()),
            Self::BodyEquals { .. } => "Body equals expected".to_string(),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::IsXml => "Body is valid XML".to_string(),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
            Self::BodyLength { operator, length } => {
                format!("Body length {} {length}", operator.symbol())
            }
            Self::UrlScheme { scheme } => format!("URL uses {scheme}://"),
        }
    }
}

/// A required JSON field, optionally with the kind of value it must hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name.
    pub name: String,
    /// Required kind of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<JsonKind>,
}

impl FieldRule {
    /// A field that only needs to be present.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    /// A field that must be present with the given kind.
    #[must_use]
    pub fn typed(name: impl Into<String>, kind: JsonKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
        }
    }
}

/// Kind of JSON value a field must hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    /// Any string.
    String,
    /// A string with at least one non-whitespace character.
    NonEmptyString,
    /// Any number.
    Number,
    /// An integral number.
    Integer,
    /// `true` or `false`.
    Boolean,
    /// An array.
    Array,
    /// An object.
    Object,
    /// `null`.
    Null,
}

impl JsonKind {
    /// Returns true if the value is of this kind.
    #[must_use]
    pub fn matches(self, value: &serde_json::Value) -> bool {
        use serde_json::Value;

        match self {
            Self::String => value.is_string(),
            Self::NonEmptyString => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Null => matches!(value, Value::Null),
        }
    }

    /// Returns the kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::NonEmptyString => "non-empty string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Comparison operators for value assertions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal to.
    Equals,
    /// Not equal to.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal to.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal to.
    LessThanOrEqual,
    /// Contains (for strings/arrays).
    Contains,
    /// Matches regex pattern.
    Matches,
    /// Starts with (for strings).
    StartsWith,
}

impl ComparisonOperator {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Contains => "contains",
            Self::Matches => "matches",
            Self::StartsWith => "starts with",
        }
    }

    /// Compares two lengths. String operators never match.
    #[must_use]
    pub const fn compare_len(self, actual: usize, expected: usize) -> bool {
        match self {
            Self::Equals => actual == expected,
            Self::NotEquals => actual != expected,
            Self::GreaterThan => actual > expected,
            Self::GreaterThanOrEqual => actual >= expected,
            Self::LessThan => actual < expected,
            Self::LessThanOrEqual => actual <= expected,
            Self::Contains | Self::Matches | Self::StartsWith => false,
        }
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Human-readable description of the assertion.
    pub description: String,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Error message if failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssertionResult {
    fn build(
        assertion: Assertion,
        passed: bool,
        actual: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            description: assertion.description(),
            assertion,
            passed,
            actual,
            error,
        }
    }

    /// Create a passed result.
    #[must_use]
    pub fn pass(assertion: Assertion) -> Self {
        Self::build(assertion, true, None, None)
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self::build(assertion, true, Some(actual.into()), None)
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self::build(assertion, false, None, Some(error.into()))
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::build(assertion, false, Some(actual.into()), Some(error.into()))
    }
}

/// A test suite containing multiple assertions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSuite {
    /// Test suite name.
    #[serde(default)]
    pub name: String,
    /// Assertions to run.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
        }
    }

    /// Add an assertion to the suite.
    pub fn add(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        results: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Check if all tests passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Returns the failed assertion results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::Exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 201, 400, 413]);
        assert!(exp.matches(413));
        assert!(!exp.matches(500));
    }

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(200).description(), "Status code = 200");
        assert_eq!(
            Assertion::status_in(&[200, 404]).description(),
            "Status code in [200, 404]"
        );
        assert_eq!(
            Assertion::json_len("$", 100).description(),
            "JSON $ length == 100"
        );
        assert_eq!(
            Assertion::each_has_fields("$", &["id", "title"]).description(),
            "every item of JSON $ has fields [id, title]"
        );
    }

    #[test]
    fn test_assertion_serde_tagging() {
        let assertion = Assertion::JsonEach {
            path: "$".to_string(),
            field: "userId".to_string(),
            operator: ComparisonOperator::Equals,
            value: json!(1),
        };
        let value = serde_json::to_value(&assertion).unwrap();
        assert_eq!(value["type"], "json_each");
        assert_eq!(value["operator"], "equals");
    }

    #[test]
    fn test_json_kind_matches() {
        assert!(JsonKind::Integer.matches(&json!(3)));
        assert!(!JsonKind::Integer.matches(&json!(3.5)));
        assert!(JsonKind::NonEmptyString.matches(&json!("x")));
        assert!(!JsonKind::NonEmptyString.matches(&json!("  ")));
        assert!(JsonKind::Null.matches(&json!(null)));
    }

    #[test]
    fn test_compare_len() {
        assert!(ComparisonOperator::GreaterThan.compare_len(5, 0));
        assert!(!ComparisonOperator::Contains.compare_len(5, 5));
    }

    #[test]
    fn test_test_suite_builder() {
        let suite = TestSuite::new("API Tests")
            .with_assertion(Assertion::status(200))
            .with_assertion(Assertion::IsJson);

        assert_eq!(suite.name, "API Tests");
        assert_eq!(suite.len(), 2);
    }

    #[test]
    fn test_test_results() {
        let results = vec![
            AssertionResult::pass(Assertion::status(200)),
            AssertionResult::fail(Assertion::IsJson, "Invalid JSON"),
        ];

        let test_results = TestResults::new("Suite", results, 100);
        assert_eq!(test_results.total, 2);
        assert_eq!(test_results.passed, 1);
        assert_eq!(test_results.failed, 1);
        assert!(!test_results.all_passed());
        assert_eq!(test_results.failures().count(), 1);
    }
}
