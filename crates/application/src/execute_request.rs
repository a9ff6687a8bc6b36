//! Execute Request Use Case
//!
//! Validates a request and sends it through the `HttpClient` port.

use std::sync::Arc;

use probe_domain::TransportTolerance;
use probe_domain::request::RequestSpec;
use probe_domain::response::ResponseSpec;
use thiserror::Error;
use tracing::debug;

use crate::ports::{HttpClient, HttpClientError};

/// Result type for request execution.
pub type ExecuteResult = Result<ResponseSpec, ExecuteRequestError>;

/// Error type for the execute request use case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecuteRequestError {
    /// URL is empty.
    #[error("URL is required")]
    EmptyUrl,

    /// URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed.
    #[error("{0}")]
    HttpError(#[from] HttpClientError),
}

impl ExecuteRequestError {
    /// True when the request reached the network and failed there.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_transport(),
            Self::EmptyUrl | Self::InvalidUrl(_) => false,
        }
    }

    /// True when the request timed out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::HttpError(e) if e.is_timeout())
    }

    /// Whether `tolerance` accepts this failure as a pass.
    #[must_use]
    pub const fn is_tolerated(&self, tolerance: Option<TransportTolerance>) -> bool {
        match tolerance {
            Some(TransportTolerance::Any) => self.is_transport(),
            Some(TransportTolerance::Timeout) => self.is_timeout(),
            None => false,
        }
    }
}

/// Use case for executing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let use_case = ExecuteRequest::new(Arc::new(ReqwestHttpClient::new()?));
/// let response = use_case.execute(&RequestSpec::get("https://reqres.in/api/users")).await?;
/// ```
pub struct ExecuteRequest {
    client: Arc<dyn HttpClient>,
}

impl ExecuteRequest {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Executes the request and returns the result.
    ///
    /// # Validation
    ///
    /// - URL must not be empty
    /// - URL must start with http:// or https://
    ///
    /// # Errors
    ///
    /// Returns `ExecuteRequestError` on validation or HTTP failures.
    pub async fn execute(&self, request: &RequestSpec) -> ExecuteResult {
        Self::validate(request)?;

        debug!(method = %request.method, url = %request.full_url(), "sending request");
        let response = self.client.execute(request).await?;
        debug!(
            status = response.status,
            duration_ms = response.duration_ms(),
            "received response"
        );

        Ok(response)
    }

    fn validate(request: &RequestSpec) -> Result<(), ExecuteRequestError> {
        if request.url.trim().is_empty() {
            return Err(ExecuteRequestError::EmptyUrl);
        }

        if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
            return Err(ExecuteRequestError::InvalidUrl(format!(
                "URL must start with http:// or https://: {}",
                request.url
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;

    use probe_domain::request::Headers;

    use crate::ports::HttpFuture;

    /// Mock HTTP client for testing.
    struct MockHttpClient {
        response: Result<ResponseSpec, HttpClientError>,
    }

    impl MockHttpClient {
        fn success() -> Self {
            Self {
                response: Ok(ResponseSpec::new(
                    200u16,
                    Headers::new(),
                    b"OK".to_vec(),
                    Duration::from_millis(50),
                )),
            }
        }

        fn error(err: HttpClientError) -> Self {
            Self { response: Err(err) }
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(&self, _request: &RequestSpec) -> HttpFuture<'_> {
            let result = self.response.clone();
            Box::pin(async move { result })
        }
    }

    #[tokio::test]
    async fn test_execute_success() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::success()));

        let request = RequestSpec::get("https://api.example.com/test");
        let response = use_case.execute(&request).await.expect("should be ok");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "OK");
    }

    #[tokio::test]
    async fn test_execute_empty_url() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::success()));

        let mut request = RequestSpec::new("Test");
        request.url = String::new();
        let result = use_case.execute(&request).await;

        assert_eq!(result, Err(ExecuteRequestError::EmptyUrl));
    }

    #[tokio::test]
    async fn test_execute_relative_url_is_invalid() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::success()));

        let result = use_case.execute(&RequestSpec::get("/posts/1")).await;

        assert!(matches!(result, Err(ExecuteRequestError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_execute_http_error() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::error(
            HttpClientError::Timeout { timeout_ms: 5000 },
        )));

        let result = use_case
            .execute(&RequestSpec::get("https://api.example.com/test"))
            .await;

        let err = result.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(
            err,
            ExecuteRequestError::HttpError(HttpClientError::Timeout { timeout_ms: 5000 })
        );
    }
}
