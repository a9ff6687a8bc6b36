//! Response verification port

use probe_domain::response::ResponseSpec;
use probe_domain::testing::{TestResults, TestSuite};

/// Evaluates assertions against a response.
pub trait ResponseVerifier: Send + Sync {
    /// Runs every assertion of `suite` against `response`.
    fn verify(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults;
}
