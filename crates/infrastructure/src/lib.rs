//! Probe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading.

pub mod adapters;
pub mod config;
pub mod report;
pub mod serialization;
pub mod testing;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ConfigError, DEFAULT_CONFIG_FILE, load_config, parse_config};
pub use report::{HtmlReportWriter, JsonReportWriter, render_html};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable};
pub use testing::TestRunner;
