//! Built-in check groups.
//!
//! Five groups exercise JSONPlaceholder: CRUD, security and input handling,
//! data relationships, error handling and performance. Requests are built
//! through [`JsonPlaceholderApi`] so they carry the session defaults, and
//! payloads come from the configured fixtures.

mod crud;
mod errors;
mod performance;
mod relationships;
mod security;

use probe_domain::testing::{Assertion, ComparisonOperator};
use probe_domain::{CheckGroup, DomainError, DomainResult, ProbeConfig};
use serde_json::Value;

use crate::clients::{ApiSession, JsonPlaceholderApi};

/// Every built-in group, numbered 1 to 5.
#[must_use]
pub fn builtin(config: &ProbeConfig) -> Vec<CheckGroup> {
    let api = JsonPlaceholderApi::new(ApiSession::jsonplaceholder(config));
    vec![
        crud::group(&api, config),
        security::group(&api, config),
        relationships::group(&api),
        errors::group(&api),
        performance::group(&api),
    ]
}

/// Picks groups by number.
///
/// An empty selection or `all` keeps every group. Numbers keep the order
/// given; repeats are ignored.
///
/// # Errors
///
/// Returns [`DomainError::UnknownGroup`] for a selector that is not `all`
/// or the number of a group.
pub fn select(groups: Vec<CheckGroup>, selectors: &[String]) -> DomainResult<Vec<CheckGroup>> {
    if selectors.is_empty() || selectors.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        return Ok(groups);
    }

    let mut numbers: Vec<u8> = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let number = selector
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|n| groups.iter().any(|g| g.number == *n))
            .ok_or_else(|| DomainError::UnknownGroup(selector.clone()))?;
        if !numbers.contains(&number) {
            numbers.push(number);
        }
    }

    Ok(numbers
        .into_iter()
        .filter_map(|n| groups.iter().find(|g| g.number == n).cloned())
        .collect())
}

fn within(max_ms: u64) -> Assertion {
    Assertion::ResponseTime { max_ms }
}

fn non_empty(path: &str) -> Assertion {
    Assertion::JsonLength {
        path: path.to_string(),
        operator: ComparisonOperator::GreaterThan,
        length: Value::from(0),
    }
}

fn each(path: &str, field: &str, operator: ComparisonOperator, value: Value) -> Assertion {
    Assertion::JsonEach {
        path: path.to_string(),
        field: field.to_string(),
        operator,
        value,
    }
}

fn each_eq(path: &str, field: &str, value: Value) -> Assertion {
    each(path, field, ComparisonOperator::Equals, value)
}

fn json_content() -> Assertion {
    Assertion::ContentType {
        expected: "application/json".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn groups() -> Vec<CheckGroup> {
        builtin(&ProbeConfig::default())
    }

    fn selectors(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_builtin_case_counts() {
        let counts: Vec<(u8, usize)> = groups()
            .iter()
            .map(|g| (g.number, g.cases.len()))
            .collect();
        assert_eq!(counts, vec![(1, 8), (2, 8), (3, 7), (4, 6), (5, 6)]);
    }

    #[test]
    fn test_case_ids_are_unique_and_numbered() {
        for group in groups() {
            for (i, case) in group.cases.iter().enumerate() {
                assert_eq!(case.id, format!("{}.{}", group.number, i + 1));
                assert!(!case.steps.is_empty(), "{} has no steps", case.id);
            }
        }
    }

    #[test]
    fn test_every_request_is_absolute() {
        for group in groups() {
            for case in &group.cases {
                for step in &case.steps {
                    assert!(
                        step.request.url.starts_with("https://jsonplaceholder.typicode.com"),
                        "{}: {}",
                        case.id,
                        step.request.url
                    );
                }
            }
        }
    }

    #[test]
    fn test_select_all() {
        assert_eq!(select(groups(), &[]).unwrap().len(), 5);
        assert_eq!(select(groups(), &selectors(&["ALL"])).unwrap().len(), 5);
    }

    #[test]
    fn test_select_numbers_keeps_order() {
        let picked = select(groups(), &selectors(&["3", "1", "3"])).unwrap();
        let numbers: Vec<u8> = picked.iter().map(|g| g.number).collect();
        assert_eq!(numbers, vec![3, 1]);
    }

    #[test]
    fn test_select_unknown_group() {
        assert_eq!(
            select(groups(), &selectors(&["1", "6"])).unwrap_err(),
            DomainError::UnknownGroup("6".to_string())
        );
        assert!(select(groups(), &selectors(&["crud"])).is_err());
    }

    #[test]
    fn test_fixture_flows_into_create_case() {
        let mut config = ProbeConfig::default();
        config.fixtures.post.title = "Configured".to_string();

        let groups = builtin(&config);
        let create = groups[0].find_case("1.3").unwrap();
        assert!(create.steps[0].request.body.content.contains("Configured"));
    }
}
