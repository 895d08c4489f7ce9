//! Manifest: metadata about a saved world state.

use crate::error::{HakoniwaError, Result};
use chrono::{DateTime, Utc};
use semver::Version;
use uuid::Uuid;

/// Current schema version. Bump the major component on breaking changes.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0";

/// Returns true when `file_version` shares its major component with `current_version`.
///
/// Minor and patch drift is accepted without further inspection. Anything that
/// does not parse as a semantic version is incompatible.
pub fn is_compatible_schema(file_version: &str, current_version: &str) -> bool {
    match (Version::parse(file_version), Version::parse(current_version)) {
        (Ok(file), Ok(current)) => file.major == current.major,
        _ => false,
    }
}

/// Generates a session id of the form `hakoniwa_YYYYMMDD_HHMMSS_xxxxxxxx`.
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let unique = Uuid::new_v4().simple().to_string();
    format!("hakoniwa_{}_{}", now.format("%Y%m%d_%H%M%S"), &unique[..8])
}

/// Metadata for world state persistence.
///
/// The schema version is fixed at creation; a different version can only come
/// from decoding a file that carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    schema_version: String,
    session_id: String,
    created_at: DateTime<Utc>,
    modified_at: Option<DateTime<Utc>>,
    description: String,
}

impl Manifest {
    /// Creates a manifest for a brand-new session at the current schema version.
    pub fn new(description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            session_id: generate_session_id(now),
            created_at: now,
            modified_at: None,
            description: description.into(),
        }
    }

    /// Rebuilds a manifest from stored fields, enforcing its invariants.
    pub fn from_parts(
        schema_version: impl Into<String>,
        session_id: impl Into<String>,
        created_at: DateTime<Utc>,
        modified_at: Option<DateTime<Utc>>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let schema_version = schema_version.into();
        let session_id = session_id.into();

        Version::parse(&schema_version)?;

        if session_id.trim().is_empty() {
            return Err(HakoniwaError::validation("session_id must not be empty"));
        }
        if let Some(modified) = modified_at {
            check_modified_after_created(created_at, modified)?;
        }

        Ok(Self {
            schema_version,
            session_id,
            created_at,
            modified_at,
            description: description.into(),
        })
    }

    /// Returns a copy stamped with a last-modified time.
    pub fn with_modified_at(mut self, modified_at: DateTime<Utc>) -> Result<Self> {
        check_modified_after_created(self.created_at, modified_at)?;
        self.modified_at = Some(modified_at);
        Ok(self)
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn check_modified_after_created(created: DateTime<Utc>, modified: DateTime<Utc>) -> Result<()> {
    if modified < created {
        return Err(HakoniwaError::validation(format!(
            "modified_at ({}) precedes created_at ({})",
            modified.to_rfc3339(),
            created.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_manifest_uses_current_version() {
        let manifest = Manifest::new("first save");
        assert_eq!(manifest.schema_version(), CURRENT_SCHEMA_VERSION);
        assert!(manifest.session_id().starts_with("hakoniwa_"));
        assert!(manifest.modified_at().is_none());
    }

    #[test]
    fn test_session_id_format() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let id = generate_session_id(now);
        assert!(id.starts_with("hakoniwa_20260102_030405_"));
        assert_eq!(id.len(), "hakoniwa_20260102_030405_".len() + 8);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let now = Utc::now();
        assert_ne!(generate_session_id(now), generate_session_id(now));
    }

    #[test]
    fn test_from_parts_rejects_bad_version() {
        let result = Manifest::from_parts("one", "s1", Utc::now(), None, "");
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_from_parts_rejects_empty_session_id() {
        let result = Manifest::from_parts("1.0.0", "  ", Utc::now(), None, "");
        assert!(result.is_err());
    }

    #[test]
    fn test_modified_before_created_rejected() {
        let manifest = Manifest::new("");
        let earlier = manifest.created_at() - Duration::seconds(1);
        assert!(manifest.with_modified_at(earlier).is_err());
    }

    #[test]
    fn test_compatible_schema_major_only() {
        assert!(is_compatible_schema("1.0.0", "1.0.0"));
        assert!(is_compatible_schema("1.4.2", "1.0.0"));
        assert!(!is_compatible_schema("2.0.0", "1.0.0"));
        assert!(!is_compatible_schema("unknown", "1.0.0"));
        assert!(!is_compatible_schema("1.0", "1.0.0"));
    }
}
