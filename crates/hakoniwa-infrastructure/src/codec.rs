//! Canonical text encoding and content hashing.
//!
//! The canonical form is JSON with object keys in sorted order, two-space
//! indentation, non-ASCII characters written verbatim and a trailing newline.
//! Identical logical content always yields identical bytes, which is what the
//! `.sha256` side-file relies on.

use hakoniwa_core::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

/// Renders a value in canonical form.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    // Going through `Value` sorts every object's keys.
    let tree = serde_json::to_value(value)?;
    let mut text = serde_json::to_string_pretty(&tree)?;
    text.push('\n');
    Ok(text)
}

/// Parses canonical text back into a typed value.
///
/// Unknown or missing fields are rejected by the target type's serde rules.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}

/// Lowercase hex SHA-256 of the given bytes.
pub fn compute_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
