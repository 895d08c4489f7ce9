//! Best-effort explanation of a hash mismatch.

use crate::dto::REQUIRED_FIELDS;
use hakoniwa_core::world::{CURRENT_SCHEMA_VERSION, is_compatible_schema};
use serde_json::Value;

/// Describes what the content of a file with a bad digest looks like.
///
/// Purely advisory: the failure stays an integrity error whatever this says.
pub fn diagnose_mismatch(bytes: &[u8]) -> String {
    let value: Value = match std::str::from_utf8(bytes)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(text).map_err(|e| e.to_string()))
    {
        Ok(value) => value,
        Err(e) => return format!("JSON parse failed ({})", e),
    };

    match value
        .pointer("/manifest/schema_version")
        .and_then(Value::as_str)
    {
        None => return "Missing schema_version".to_string(),
        Some(version) if !is_compatible_schema(version, CURRENT_SCHEMA_VERSION) => {
            return format!(
                "schema_version '{}' not supported (expected {})",
                version, CURRENT_SCHEMA_VERSION
            );
        }
        Some(_) => {}
    }

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| value.get(field).is_none())
        .collect();
    if !missing.is_empty() {
        return format!("Missing required fields: {}", missing.join(", "));
    }

    "File content was modified after save".to_string()
}
