//! Application use cases (business logic orchestration).

mod debug_reqres;
mod run_group;
mod run_suite;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]
pub(crate) mod test_support;

pub use debug_reqres::{DebugExchange, DebugReqRes};
pub use run_group::RunGroup;
pub use run_suite::{RunSuite, RunSuiteInput, RunSuiteOutput};
