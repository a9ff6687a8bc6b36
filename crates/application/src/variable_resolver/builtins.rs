//! Built-in dynamic variables
//!
//! These variables are prefixed with `$` and generate a new value each time
//! a case starts. Numeric and boolean generators produce typed JSON values.

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use uuid::Uuid;

/// Information about a built-in variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinInfo {
    /// Variable name (including $ prefix)
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

/// Generates values for built-in dynamic variables.
pub struct BuiltinVariables;

impl BuiltinVariables {
    /// Resolves a built-in variable name to a fresh value.
    /// Returns None if the name is not a recognized built-in.
    #[must_use]
    pub fn resolve(name: &str) -> Option<Value> {
        let value = match name {
            "$uuid" => Value::from(Uuid::new_v4().to_string()),
            "$timestamp" => Value::from(Utc::now().timestamp()),
            "$isoTimestamp" => Value::from(Utc::now().to_rfc3339()),
            "$randomInt" => Value::from(rand::rng().random_range(0..=1000)),
            "$randomString" => Value::from(Self::random_alphanumeric(16)),
            "$randomEmail" => Value::from(format!(
                "{}@example.com",
                Self::random_alphanumeric(8).to_lowercase()
            )),
            "$randomBoolean" => Value::from(rand::rng().random_bool(0.5)),
            _ => return None,
        };
        Some(value)
    }

    /// Returns whether the name is a known built-in.
    #[must_use]
    pub fn is_builtin(name: &str) -> bool {
        Self::available().iter().any(|b| b.name == name)
    }

    /// All built-ins with descriptions.
    #[must_use]
    pub const fn available() -> &'static [BuiltinInfo] {
        &[
            BuiltinInfo {
                name: "$uuid",
                description: "Random UUID v4",
            },
            BuiltinInfo {
                name: "$timestamp",
                description: "Unix timestamp in seconds (number)",
            },
            BuiltinInfo {
                name: "$isoTimestamp",
                description: "ISO 8601 timestamp (UTC)",
            },
            BuiltinInfo {
                name: "$randomInt",
                description: "Random integer 0-1000 (number)",
            },
            BuiltinInfo {
                name: "$randomString",
                description: "Random alphanumeric string (16 chars)",
            },
            BuiltinInfo {
                name: "$randomEmail",
                description: "Random address at example.com",
            },
            BuiltinInfo {
                name: "$randomBoolean",
                description: "Random boolean",
            },
        ]
    }

    fn random_alphanumeric(len: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::rng();
        (0..len)
            .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_builtin_resolves() {
        for info in BuiltinVariables::available() {
            assert!(
                BuiltinVariables::resolve(info.name).is_some(),
                "{} should resolve",
                info.name
            );
        }
    }

    #[test]
    fn test_typed_values() {
        assert!(BuiltinVariables::resolve("$timestamp").unwrap().is_i64());
        let n = BuiltinVariables::resolve("$randomInt").unwrap().as_i64().unwrap();
        assert!((0..=1000).contains(&n));
        assert!(BuiltinVariables::resolve("$randomBoolean").unwrap().is_boolean());
    }

    #[test]
    fn test_random_email_shape() {
        let email = BuiltinVariables::resolve("$randomEmail").unwrap();
        let email = email.as_str().unwrap();
        assert!(email.ends_with("@example.com"));
        assert_eq!(email.len(), 8 + "@example.com".len());
    }

    #[test]
    fn test_unknown() {
        assert!(BuiltinVariables::resolve("$nope").is_none());
        assert!(!BuiltinVariables::is_builtin("$nope"));
        assert!(BuiltinVariables::is_builtin("$uuid"));
    }
}
