//! Error types for HAKONIWA.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Persisted-state validation issues
// ============================================================================

/// The stage at which a persisted state file was found to be invalid.
///
/// Stages are checked in declaration order and validation stops at the first
/// failing one, so a report never mixes kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// The state file itself does not exist.
    FileNotFound,
    /// The `.sha256` side-file does not exist.
    HashFileMissing,
    /// The stored digest does not match the digest of the state file bytes.
    IntegrityError,
    /// The manifest's major schema version is not supported.
    SchemaVersionError,
    /// Well-hashed, well-versioned content that does not decode into a world state.
    StructuralValidationError,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileNotFound => "FileNotFound",
            Self::HashFileMissing => "HashFileMissing",
            Self::IntegrityError => "IntegrityError",
            Self::SchemaVersionError => "SchemaVersionError",
            Self::StructuralValidationError => "StructuralValidationError",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem discovered while validating a state file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Application error
// ============================================================================

/// A shared error type for the HAKONIWA crates.
///
/// Matching never produces one of these: every matcher outcome, including
/// "nothing matched", is an ordinary `MatchResult`.
#[derive(Error, Debug, Clone)]
pub enum HakoniwaError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", ...
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A domain invariant was violated while constructing a value
    #[error("Validation error: {0}")]
    Validation(String),

    /// A persisted state file failed dry-run validation and cannot be loaded
    #[error("Invalid world state file ({kind}): {}", join_issues(.issues))]
    InvalidState {
        kind: ValidationErrorKind,
        issues: Vec<ValidationIssue>,
    },
}

impl HakoniwaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wraps a non-empty list of dry-run issues.
    ///
    /// The error kind is taken from the first issue; an empty list is
    /// reported as a structural failure.
    pub fn invalid_state(issues: Vec<ValidationIssue>) -> Self {
        let kind = issues
            .first()
            .map(|issue| issue.kind)
            .unwrap_or(ValidationErrorKind::StructuralValidationError);
        Self::InvalidState { kind, issues }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a domain validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the validation stage for `InvalidState` errors.
    pub fn validation_kind(&self) -> Option<ValidationErrorKind> {
        match self {
            Self::InvalidState { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the wrapped issue list for `InvalidState` errors, empty otherwise.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::InvalidState { issues, .. } => issues,
            _ => &[],
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HakoniwaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HakoniwaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HakoniwaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HakoniwaError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<semver::Error> for HakoniwaError {
    fn from(err: semver::Error) -> Self {
        Self::Validation(format!("invalid schema version: {}", err))
    }
}

/// A type alias for `Result<T, HakoniwaError>`.
pub type Result<T> = std::result::Result<T, HakoniwaError>;
