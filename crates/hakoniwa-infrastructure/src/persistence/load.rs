use super::diagnose::diagnose_mismatch;
use super::save::hash_path;
use crate::codec;
use crate::dto::WorldStateDTO;
use hakoniwa_core::error::{HakoniwaError, Result, ValidationErrorKind, ValidationIssue};
use hakoniwa_core::world::{CURRENT_SCHEMA_VERSION, WorldState, is_compatible_schema};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Result of a dry-run validation.
///
/// Issues all belong to the first failing stage:
/// file → hash file → integrity → schema version → structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DryRunReport {
    errors: Vec<ValidationIssue>,
}

impl DryRunReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// The failing stage, if any.
    pub fn kind(&self) -> Option<ValidationErrorKind> {
        self.errors.first().map(|issue| issue.kind)
    }
}

/// Validates a saved world state without loading it. Never fails.
pub fn load_dry_run(path: &Path) -> DryRunReport {
    match inspect(path) {
        Ok(_) => DryRunReport::default(),
        Err(errors) => {
            report_failure(path, &errors);
            DryRunReport { errors }
        }
    }
}

/// Loads a saved world state after full validation.
///
/// Fails with `HakoniwaError::InvalidState` carrying the same issues a dry
/// run would report.
pub fn load_world_state(path: &Path) -> Result<WorldState> {
    match inspect(path) {
        Ok(state) => {
            tracing::debug!(
                "Loaded world state {} from {:?}",
                state.manifest().session_id(),
                path
            );
            Ok(state)
        }
        Err(errors) => {
            report_failure(path, &errors);
            Err(HakoniwaError::invalid_state(errors))
        }
    }
}

fn report_failure(path: &Path, errors: &[ValidationIssue]) {
    for issue in errors {
        tracing::warn!("World state {:?} failed validation: {}", path, issue);
    }
}

// ============================================================================
// Validation stages
// ============================================================================

type StageResult<T> = std::result::Result<T, Vec<ValidationIssue>>;

fn issue(kind: ValidationErrorKind, message: impl Into<String>) -> Vec<ValidationIssue> {
    vec![ValidationIssue::new(kind, message)]
}

fn inspect(path: &Path) -> StageResult<WorldState> {
    let bytes = read_state_file(path)?;
    check_integrity(path, &bytes)?;
    let value = check_schema(&bytes)?;
    check_structure(value)
}

fn read_state_file(path: &Path) -> StageResult<Vec<u8>> {
    if !path.exists() {
        return Err(issue(
            ValidationErrorKind::FileNotFound,
            format!("File not found: {}", path.display()),
        ));
    }
    let hash_file = hash_path(path);
    if !hash_file.exists() {
        return Err(issue(
            ValidationErrorKind::HashFileMissing,
            format!("Hash file not found: {}", hash_file.display()),
        ));
    }

    fs::read(path).map_err(|e| {
        issue(
            ValidationErrorKind::FileNotFound,
            format!("Failed to read {}: {}", path.display(), e),
        )
    })
}

fn check_integrity(path: &Path, bytes: &[u8]) -> StageResult<()> {
    let hash_file = hash_path(path);
    let stored = fs::read(&hash_file).map_err(|e| {
        issue(
            ValidationErrorKind::HashFileMissing,
            format!("Failed to read hash file {}: {}", hash_file.display(), e),
        )
    })?;
    let stored = String::from_utf8(stored).map_err(|_| {
        issue(
            ValidationErrorKind::IntegrityError,
            format!("Hash file {} is not a hex digest", hash_file.display()),
        )
    })?;
    let expected = stored.trim();
    let actual = codec::compute_hash(bytes);

    if expected == actual {
        return Ok(());
    }

    Err(vec![
        ValidationIssue::new(
            ValidationErrorKind::IntegrityError,
            format!(
                "Hash mismatch: expected {}..., got {}...",
                prefix(expected, 16),
                prefix(&actual, 16)
            ),
        ),
        ValidationIssue::new(
            ValidationErrorKind::IntegrityError,
            format!("Detail: {}", diagnose_mismatch(bytes)),
        ),
    ])
}

fn check_schema(bytes: &[u8]) -> StageResult<Value> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        issue(
            ValidationErrorKind::StructuralValidationError,
            format!("File is not valid UTF-8: {}", e),
        )
    })?;
    let value: Value = serde_json::from_str(text).map_err(|e| {
        issue(
            ValidationErrorKind::StructuralValidationError,
            format!("Invalid JSON: {}", e),
        )
    })?;

    match value
        .pointer("/manifest/schema_version")
        .and_then(Value::as_str)
    {
        None => Err(issue(
            ValidationErrorKind::SchemaVersionError,
            "Missing manifest.schema_version",
        )),
        Some(version) if !is_compatible_schema(version, CURRENT_SCHEMA_VERSION) => Err(issue(
            ValidationErrorKind::SchemaVersionError,
            format!(
                "Schema version {} is not supported (expected major version of {})",
                version, CURRENT_SCHEMA_VERSION
            ),
        )),
        Some(_) => Ok(value),
    }
}

fn check_structure(value: Value) -> StageResult<WorldState> {
    let dto: WorldStateDTO = serde_json::from_value(value).map_err(|e| {
        issue(
            ValidationErrorKind::StructuralValidationError,
            format!("Structure validation failed: {}", e),
        )
    })?;
    WorldState::try_from(dto).map_err(|e| {
        issue(
            ValidationErrorKind::StructuralValidationError,
            format!("Structure validation failed: {}", e),
        )
    })
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
