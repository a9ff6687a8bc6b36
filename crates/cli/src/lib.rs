//! Probe CLI - the `probe` binary's library half.
//!
//! Argument parsing, wiring of adapters into use cases, command handlers and
//! console rendering. `main.rs` only initialises logging and dispatches.

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod presentation;

pub use commands::{Cli, Commands, DebugCommand, OutputFormat, RunArgs};
