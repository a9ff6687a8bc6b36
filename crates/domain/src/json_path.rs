//! A small JSONPath subset.
//!
//! Supported forms: `$`, `$.field`, `$.field.nested`, `$.array[0]`,
//! `$[0].field`, `$.array[*]` and `$.array[*].field`. A wildcard maps the
//! rest of the path over every element and yields an array of the matches.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Key(String),
    Index(usize),
    Wildcard,
}

/// Evaluates `path` against `json`.
///
/// Returns `Ok(None)` when the path is well-formed but does not match.
///
/// # Errors
///
/// Returns [`DomainError::InvalidJsonPath`] when the path does not start with
/// `$` or contains an unterminated or non-numeric bracket.
pub fn query(json: &Value, path: &str) -> DomainResult<Option<Value>> {
    let tokens = tokenize(path)?;
    Ok(evaluate(json, &tokens))
}

/// Length of an array, object or string (in characters).
#[must_use]
pub fn length(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        Value::String(s) => Some(s.chars().count()),
        _ => None,
    }
}

fn evaluate(value: &Value, tokens: &[Token]) -> Option<Value> {
    let Some((first, rest)) = tokens.split_first() else {
        return Some(value.clone());
    };

    match first {
        Token::Key(key) => evaluate(value.get(key)?, rest),
        Token::Index(index) => evaluate(value.get(*index)?, rest),
        Token::Wildcard => {
            let items = value.as_array()?;
            Some(Value::Array(
                items.iter().filter_map(|item| evaluate(item, rest)).collect(),
            ))
        }
    }
}

fn tokenize(path: &str) -> DomainResult<Vec<Token>> {
    let path = path.trim();
    let Some(rest) = path.strip_prefix('$') else {
        return Err(DomainError::InvalidJsonPath(format!(
            "'{path}' must start with '$'"
        )));
    };

    let mut tokens = Vec::new();
    let mut chars = rest.chars().peekable();
    let mut key = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !key.is_empty() {
                    tokens.push(Token::Key(std::mem::take(&mut key)));
                }
            }
            '[' => {
                if !key.is_empty() {
                    tokens.push(Token::Key(std::mem::take(&mut key)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err(DomainError::InvalidJsonPath(format!(
                        "unterminated '[' in '{path}'"
                    )));
                }
                tokens.push(bracket_token(inner.trim(), path)?);
            }
            _ => key.push(ch),
        }
    }
    if !key.is_empty() {
        tokens.push(Token::Key(key));
    }

    Ok(tokens)
}

fn bracket_token(inner: &str, path: &str) -> DomainResult<Token> {
    if inner == "*" {
        return Ok(Token::Wildcard);
    }
    let quoted = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
    if let Some(key) = quoted {
        return Ok(Token::Key(key.to_string()));
    }
    inner.parse().map(Token::Index).map_err(|_| {
        DomainError::InvalidJsonPath(format!("invalid array index '{inner}' in '{path}'"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "page": 1,
            "data": [
                {"id": 7, "email": "a@x.io", "tags": ["x", "y"]},
                {"id": 8, "email": "b@x.io", "tags": []}
            ],
            "support": {"url": "https://reqres.in"}
        })
    }

    #[test]
    fn test_root() {
        assert_eq!(query(&sample(), "$").unwrap(), Some(sample()));
    }

    #[test]
    fn test_nested_fields() {
        assert_eq!(
            query(&sample(), "$.support.url").unwrap(),
            Some(json!("https://reqres.in"))
        );
        assert_eq!(query(&sample(), "$.missing").unwrap(), None);
    }

    #[test]
    fn test_array_index() {
        assert_eq!(query(&sample(), "$.data[1].id").unwrap(), Some(json!(8)));
        assert_eq!(query(&sample(), "$.data[5]").unwrap(), None);
        assert_eq!(query(&json!([{"id": 1}]), "$[0].id").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_wildcard_maps_rest() {
        assert_eq!(
            query(&sample(), "$.data[*].id").unwrap(),
            Some(json!([7, 8]))
        );
        assert_eq!(
            query(&sample(), "$.data[*]").unwrap(),
            query(&sample(), "$.data").unwrap()
        );
    }

    #[test]
    fn test_quoted_key() {
        assert_eq!(query(&sample(), "$['page']").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(matches!(
            query(&sample(), "data.id"),
            Err(DomainError::InvalidJsonPath(_))
        ));
        assert!(query(&sample(), "$.data[").is_err());
        assert!(query(&sample(), "$.data[x]").is_err());
    }

    #[test]
    fn test_length() {
        assert_eq!(length(&json!([1, 2, 3])), Some(3));
        assert_eq!(length(&json!({"a": 1})), Some(1));
        assert_eq!(length(&json!("héllo")), Some(5));
        assert_eq!(length(&json!(5)), None);
    }
}
