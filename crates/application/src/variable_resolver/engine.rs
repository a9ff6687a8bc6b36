//! Variable resolution engine

use std::collections::{BTreeSet, HashMap};

use probe_domain::Step;
use probe_domain::request::RequestSpec;
use serde_json::Value;

use super::builtins::BuiltinVariables;
use super::parser::{parse_variables, whole_reference};
use crate::error::{ApplicationError, ApplicationResult};

/// Result of resolving a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The string with every resolvable reference substituted.
    pub resolved: String,

    /// Names that could not be resolved; their `{{name}}` text is kept.
    pub unresolved: Vec<String>,
}

/// Holds the variables of one case and substitutes them.
///
/// Built-ins are generated once per resolver so that, for example, every
/// `{{$uuid}}` within a case yields the same value.
#[derive(Debug, Default)]
pub struct VariableResolver {
    variables: HashMap<String, Value>,
    builtin_cache: HashMap<String, Value>,
}

impl VariableResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Looks up a stored variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Number of stored variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no variable is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn lookup(&mut self, name: &str) -> Option<Value> {
        if name.starts_with('$') {
            if let Some(cached) = self.builtin_cache.get(name) {
                return Some(cached.clone());
            }
            let generated = BuiltinVariables::resolve(name)?;
            self.builtin_cache
                .insert(name.to_string(), generated.clone());
            return Some(generated);
        }
        self.variables.get(name).cloned()
    }

    /// Substitutes references inside a string. Strings are inserted verbatim,
    /// other values as their JSON text.
    pub fn resolve(&mut self, input: &str) -> ResolutionResult {
        let references = parse_variables(input);
        let mut unresolved = Vec::new();
        let mut resolved = String::with_capacity(input.len());
        let mut last_end = 0;

        for reference in references {
            resolved.push_str(&input[last_end..reference.span.start]);
            match self.lookup(&reference.name) {
                Some(Value::String(s)) => resolved.push_str(&s),
                Some(value) => resolved.push_str(&value.to_string()),
                None => {
                    resolved.push_str(&input[reference.span.clone()]);
                    unresolved.push(reference.name);
                }
            }
            last_end = reference.span.end;
        }
        resolved.push_str(&input[last_end..]);

        ResolutionResult {
            resolved,
            unresolved,
        }
    }

    /// Substitutes references throughout a JSON value.
    ///
    /// A string that is exactly one reference is replaced by the variable's
    /// value with its JSON type, so `"{{count}}"` can become the number `10`.
    /// Returns the new value and the names that did not resolve.
    pub fn resolve_value(&mut self, value: &Value) -> (Value, Vec<String>) {
        let mut unresolved = Vec::new();
        let resolved = self.resolve_value_into(value, &mut unresolved);
        (resolved, unresolved)
    }

    fn resolve_value_into(&mut self, value: &Value, unresolved: &mut Vec<String>) -> Value {
        match value {
            Value::String(s) => {
                if let Some(name) = whole_reference(s)
                    && let Some(found) = self.lookup(&name)
                {
                    return found;
                }
                let result = self.resolve(s);
                unresolved.extend(result.unresolved);
                Value::String(result.resolved)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value_into(item, unresolved))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_value_into(v, unresolved)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Substitutes references in the string fields of a request.
    ///
    /// A JSON object or array body is resolved like any other JSON value, so
    /// a whole-reference string there keeps its type. Other bodies are text.
    fn resolve_request(&mut self, request: &mut RequestSpec, unresolved: &mut Vec<String>) {
        let mut splice = |text: &mut String| {
            let result = self.resolve(text);
            unresolved.extend(result.unresolved);
            *text = result.resolved;
        };

        splice(&mut request.url);
        for header in request.headers.all_mut() {
            splice(&mut header.value);
        }
        for param in request.query.all_mut() {
            splice(&mut param.key);
            splice(&mut param.value);
        }

        let body = &mut request.body.content;
        if !body.contains("{{") {
            return;
        }
        match serde_json::from_str::<Value>(body) {
            Ok(json @ (Value::Object(_) | Value::Array(_))) => {
                *body = self.resolve_value_into(&json, unresolved).to_string();
            }
            _ => {
                let result = self.resolve(body);
                unresolved.extend(result.unresolved);
                *body = result.resolved;
            }
        }
    }

    /// Returns a copy of `step` with every reference substituted.
    ///
    /// URL, header and query values are text, so variables are spliced in
    /// as text there. Assertion values keep the variable's JSON type.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::InvalidStep`] naming the unresolved
    /// variables, or when a substituted value no longer fits an assertion
    /// (for example a string captured into a numeric field).
    pub fn resolve_step(&mut self, step: &Step) -> ApplicationResult<Step> {
        let mut unresolved = Vec::new();

        let mut request = step.request.clone();
        self.resolve_request(&mut request, &mut unresolved);

        let raw = serde_json::to_value(&step.assertions)
            .map_err(|e| ApplicationError::Internal(format!("assertion serialization: {e}")))?;
        let assertions = self.resolve_value_into(&raw, &mut unresolved);

        if !unresolved.is_empty() {
            let names: BTreeSet<_> = unresolved.into_iter().collect();
            let names: Vec<_> = names.into_iter().collect();
            return Err(ApplicationError::InvalidStep(format!(
                "unresolved variables: {}",
                names.join(", ")
            )));
        }

        let assertions = serde_json::from_value(assertions)
            .map_err(|e| ApplicationError::InvalidStep(format!("resolved step is invalid: {e}")))?;

        Ok(Step {
            request,
            assertions,
            ..step.clone()
        })
    }
}
