//! Response testing infrastructure.
//!
//! The runner evaluates assertions against HTTP responses and serves as the
//! application's `ResponseVerifier`.

mod runner;

pub use runner::TestRunner;
