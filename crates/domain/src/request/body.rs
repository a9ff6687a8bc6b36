//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// The kind of request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBodyKind {
    /// No body
    #[default]
    None,
    /// Raw body sent as-is.
    ///
    /// `content_type: None` sends the bytes without a `Content-Type` header,
    /// which the malformed-request checks rely on.
    Raw {
        /// The content type (e.g., "application/json", "text/plain")
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
}

/// HTTP request body with content and type information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestBody {
    /// The kind of body
    pub kind: RequestBodyKind,
    /// The body content as a string
    #[serde(default)]
    pub content: String,
}

impl RequestBody {
    /// Creates an empty body.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: RequestBodyKind::None,
            content: String::new(),
        }
    }

    /// Creates a JSON body from already serialized text.
    #[must_use]
    pub fn json(content: impl Into<String>) -> Self {
        Self::raw(content, Some("application/json"))
    }

    /// Creates a JSON body by serializing a value.
    #[must_use]
    pub fn json_value(value: &serde_json::Value) -> Self {
        Self::json(value.to_string())
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::raw(content, Some("text/plain"))
    }

    /// Creates a raw body with an explicit (or absent) content type.
    #[must_use]
    pub fn raw(content: impl Into<String>, content_type: Option<&str>) -> Self {
        Self {
            kind: RequestBodyKind::Raw {
                content_type: content_type.map(ToString::to_string),
            },
            content: content.into(),
        }
    }

    /// Returns whether the body is empty or none.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // String::is_empty is not const
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, RequestBodyKind::None) || self.content.is_empty()
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match &self.kind {
            RequestBodyKind::None => None,
            RequestBodyKind::Raw { content_type } => content_type.as_deref(),
        }
    }

    /// Returns true if the body declares a JSON content type.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        let body = RequestBody::json(r#"{"key": "value"}"#);
        assert_eq!(body.content_type(), Some("application/json"));
        assert!(body.is_json());
        assert!(!body.is_empty());
    }

    #[test]
    fn test_empty_body() {
        let body = RequestBody::none();
        assert!(body.is_empty());
        assert_eq!(body.content_type(), None);
    }

    #[test]
    fn test_raw_body_without_content_type() {
        let body = RequestBody::raw(r#"{"title": "test"}"#, None);
        assert_eq!(body.content_type(), None);
        assert!(!body.is_json());
        assert!(!body.is_empty());
    }

    #[test]
    fn test_json_value_body() {
        let body = RequestBody::json_value(&serde_json::json!({"userId": 1}));
        assert_eq!(body.content, r#"{"userId":1}"#);
    }
}
