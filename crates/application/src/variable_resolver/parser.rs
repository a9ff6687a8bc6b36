//! Variable parser for {{variable}} syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;

/// A parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without {{ }}).
    pub name: String,

    /// Whether this is a built-in variable (starts with $).
    pub is_builtin: bool,

    /// Byte range in the original string where this reference appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        let name = name.into();
        let is_builtin = name.starts_with('$');
        Self {
            name,
            is_builtin,
            span,
        }
    }
}

/// Extracts all `{{name}}` references from `input`.
///
/// Whitespace inside the braces is trimmed and empty references are skipped.
/// An unterminated `{{` ends the scan.
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut offset = 0;

    while let Some(open) = input[offset..].find("{{") {
        let start = offset + open;
        let name_start = start + 2;
        let Some(close) = input[name_start..].find("}}") else {
            break;
        };
        let end = name_start + close + 2;

        let name = input[name_start..name_start + close].trim();
        if !name.is_empty() {
            references.push(VariableReference::new(name, start..end));
        }
        offset = end;
    }

    references
}

/// Returns the name when the whole (trimmed) input is a single reference,
/// as in `"{{post_id}}"`.
#[must_use]
pub fn whole_reference(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let refs = parse_variables(trimmed);
    match refs.as_slice() {
        [only] if only.span == (0..trimmed.len()) => Some(only.name.clone()),
        _ => None,
    }
}

/// Returns true if the input string contains any variable references.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    !parse_variables(input).is_empty()
}
