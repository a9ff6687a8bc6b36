//! Probe Application - Use cases and ports
//!
//! This crate orchestrates check runs. It defines the ports implemented by
//! the infrastructure layer, the typed API clients, variable resolution and
//! the built-in check catalog.

pub mod catalog;
pub mod clients;
pub mod error;
pub mod execute_request;
pub mod ports;
pub mod use_cases;
pub mod variable_resolver;

pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{ExecuteRequest, ExecuteRequestError, ExecuteResult};
pub use use_cases::{DebugExchange, DebugReqRes, RunGroup, RunSuite, RunSuiteInput, RunSuiteOutput};
