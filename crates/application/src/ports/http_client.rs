//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use probe_domain::request::RequestSpec;
use probe_domain::response::ResponseSpec;
use thiserror::Error;

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + 'a>>;

/// Port for executing HTTP requests.
///
/// The future is boxed so the port stays object safe; use cases hold it as
/// `Arc<dyn HttpClient>`.
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response.
    ///
    /// Any status code, including 4xx and 5xx, is a successful execution.
    ///
    /// # Errors
    ///
    /// Returns an error when no response was received.
    fn execute(&self, request: &RequestSpec) -> HttpFuture<'_>;
}

/// Transport-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No response within the timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host name did not resolve.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host name.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Host name.
        host: String,
        /// Port.
        port: u16,
    },

    /// Any other connection failure (TLS, reset).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was reached.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The response body could not be read.
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// The request was cancelled before completion.
    #[error("request cancelled")]
    Cancelled,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// True for failures caused by the network or the remote server, as
    /// opposed to an unusable request.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_) | Self::Cancelled)
    }

    /// True when the request timed out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Short category name for logs and reports.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "Invalid URL",
            Self::Timeout { .. } => "Timeout",
            Self::DnsError { .. } => "DNS error",
            Self::ConnectionRefused { .. } => "Connection refused",
            Self::ConnectionFailed(_) => "Connection failed",
            Self::TooManyRedirects { .. } => "Too many redirects",
            Self::InvalidBody(_) => "Invalid body",
            Self::Cancelled => "Cancelled",
            Self::Other(_) => "Request failed",
        }
    }
}
