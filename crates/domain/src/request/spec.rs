//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{Headers, HttpMethod, QueryParams, RequestBody};

/// Complete specification for an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Unique identifier for this request
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,
    /// Target URL, absolute or relative to the group target (may contain `{{variables}}`)
    pub url: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Query parameters appended to the URL
    #[serde(default)]
    pub query: QueryParams,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Per-request timeout; the client default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a new request specification with default values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            method: HttpMethod::default(),
            url: String::new(),
            headers: Headers::new(),
            query: QueryParams::new(),
            body: RequestBody::none(),
            timeout_ms: None,
        }
    }

    /// Creates a request with the given method and URL, named after both.
    #[must_use]
    pub fn with_method(method: HttpMethod, url: impl Into<String>) -> Self {
        let url = url.into();
        let mut spec = Self::new(format!("{method} {url}"));
        spec.method = method;
        spec.url = url;
        spec
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::with_method(HttpMethod::Get, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::with_method(HttpMethod::Post, url)
    }

    /// Sets a header, replacing one of the same name (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push(key, value);
        self
    }

    /// Sets a JSON body from a value (builder pattern).
    #[must_use]
    pub fn with_json(mut self, value: &serde_json::Value) -> Self {
        self.body = RequestBody::json_value(value);
        self
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets the request timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Returns true if the URL is absolute (has an http or https scheme).
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }

    /// Returns the URL with the query parameters appended and encoded.
    ///
    /// A URL that cannot be parsed gets the pairs appended verbatim so that
    /// validation downstream reports the original problem.
    #[must_use]
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        match Url::parse(&self.url) {
            Ok(mut url) => {
                url.query_pairs_mut().extend_pairs(self.query.pairs());
                url.to_string()
            }
            Err(_) => {
                let joined: Vec<String> = self
                    .query
                    .pairs()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                let separator = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}{}", self.url, separator, joined.join("&"))
            }
        }
    }

    /// Returns true if the URL contains variable placeholders.
    #[must_use]
    pub fn has_variables(&self) -> bool {
        self.url.contains("{{") && self.url.contains("}}")
    }
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::new("New Request")
    }
}
