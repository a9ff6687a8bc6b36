//! Variable resolution
//!
//! Steps may reference `{{name}}` anywhere in their URL, headers, body or
//! assertion values. Names resolve to values captured by earlier steps of
//! the same case, or to `$`-prefixed built-in generators.
//!
//! ```
//! use probe_application::variable_resolver::VariableResolver;
//! use serde_json::json;
//!
//! let mut resolver = VariableResolver::new();
//! resolver.set("post_id", json!(7));
//!
//! assert_eq!(resolver.resolve("/posts/{{post_id}}").resolved, "/posts/7");
//! assert_eq!(resolver.resolve_value(&json!("{{post_id}}")).0, json!(7));
//! ```

pub mod builtins;
pub mod engine;
pub mod parser;

pub use builtins::{BuiltinInfo, BuiltinVariables};
pub use engine::{ResolutionResult, VariableResolver};
pub use parser::{VariableReference, has_variables, parse_variables, whole_reference};
