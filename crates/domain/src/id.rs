//! ID generation utilities.

use uuid::Uuid;

/// Generates a new sortable UUID v7 as a string.
///
/// Run reports and check cases are keyed with this format.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}
