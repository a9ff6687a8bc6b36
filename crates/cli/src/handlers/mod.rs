//! Command handlers.
//!
//! Each handler takes already-loaded configuration, does its work through
//! the application use cases and prints to stdout.

pub mod debug;
pub mod list;
pub mod manifest;
pub mod run;
