//! Deterministic JSON output for report files.
//!
//! Object keys are sorted, indentation is two spaces and every document
//! ends with a newline, so two reports of the same run diff cleanly.

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_stable};
