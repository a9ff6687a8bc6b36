//! Application error types

use probe_domain::DomainError;
use thiserror::Error;

use crate::ports::{HttpClientError, ReportError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// A report could not be written.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// A step could not be prepared for sending.
    #[error("invalid step: {0}")]
    InvalidStep(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
