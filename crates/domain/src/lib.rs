//! Probe Domain - Core business types
//!
//! This crate defines the domain model for the Probe API conformance suite.
//! All types here are pure Rust with no I/O dependencies.

pub mod check;
pub mod error;
pub mod id;
pub mod json_path;
pub mod manifest;
pub mod report;
pub mod request;
pub mod response;
pub mod settings;
pub mod stats;
pub mod testing;

pub use check::{
    Capture, CaptureMode, CheckCase, CheckGroup, LoadProfile, Step, Target, TransportTolerance,
};
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use manifest::{Manifest, ManifestError, ManifestIssue, ManifestReport, Requirement};
pub use report::{CaseOutcome, GroupReport, LoadSummary, RunReport, RunTotals, StepOutcome};
pub use settings::{Fixtures, ProbeConfig, Targets};
pub use stats::LatencyStats;
pub use testing::{
    Assertion, AssertionResult, ComparisonOperator, FieldRule, JsonKind, StatusExpectation,
    TestResults, TestSuite,
};
