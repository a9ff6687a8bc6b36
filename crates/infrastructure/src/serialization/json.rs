//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// The serializer produced invalid UTF-8.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value to deterministic JSON.
///
/// The value passes through [`serde_json::Value`] first, whose maps are
/// ordered, so struct fields and map keys come out alphabetically whatever
/// their declaration order.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let sorted = serde_json::to_value(value).map_err(SerializationError::Serialize)?;

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    sorted
        .serialize(&mut serializer)
        .map_err(SerializationError::Serialize)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from bytes, pretty-printed or minified.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_domain::{GroupReport, LatencyStats, LoadSummary};

    #[derive(Serialize)]
    struct Unordered {
        zebra: u8,
        apple: u8,
        mango: u8,
    }

    #[test]
    fn test_struct_fields_are_sorted() {
        let json = to_json_stable(&Unordered {
            zebra: 1,
            apple: 2,
            mango: 3,
        })
        .unwrap();

        assert_eq!(json, "{\n  \"apple\": 2,\n  \"mango\": 3,\n  \"zebra\": 1\n}\n");
    }

    #[test]
    fn test_output_is_stable_across_calls() {
        let group = GroupReport::new(1, "Basic CRUD Operations", Vec::new(), 12);
        assert_eq!(to_json_stable(&group).unwrap(), to_json_stable(&group).unwrap());
    }

    #[test]
    fn test_reads_back_domain_types() {
        let summary = LoadSummary::new(10, 9, LatencyStats::from_millis(&[10.0, 20.0, 30.0]));
        let json = to_json_stable(&summary).unwrap();
        let restored: LoadSummary = from_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(restored, summary);
    }

    #[test]
    fn test_from_json_bytes_rejects_garbage() {
        let result: Result<LoadSummary, _> = from_json_bytes(br#"{"requests": }"#);
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
