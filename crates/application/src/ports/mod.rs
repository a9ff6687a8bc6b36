//! Ports (interfaces) for external dependencies.
//!
//! These traits define the boundaries between the application layer
//! and infrastructure adapters.

mod clock;
mod http_client;
mod report_writer;
mod verifier;

pub use clock::Clock;
pub use http_client::{HttpClient, HttpClientError, HttpFuture};
pub use report_writer::{ReportError, ReportWriter};
pub use verifier::ResponseVerifier;
