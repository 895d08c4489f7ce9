//! ArtifactReference: a portable pointer to a per-turn artifact file.

use crate::error::{HakoniwaError, Result};
use std::path::{Component, Path, PathBuf};

/// Reference to an artifact file.
///
/// Paths are stored relative to the directory containing the state file so
/// a save directory can be moved or exported as a unit:
///
/// ```text
/// results/session/state.json      # state file
/// results/session/turn_0.log      # artifact, relative_path = "turn_0.log"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactReference {
    turn_index: u32,
    artifact_type: String,
    relative_path: String,
}

impl ArtifactReference {
    /// Creates a reference, rejecting absolute or escaping paths.
    pub fn new(
        turn_index: u32,
        artifact_type: impl Into<String>,
        relative_path: impl Into<String>,
    ) -> Result<Self> {
        let artifact_type = artifact_type.into();
        let relative_path = relative_path.into();

        if artifact_type.trim().is_empty() {
            return Err(HakoniwaError::validation(format!(
                "artifact for turn {}: artifact_type must not be empty",
                turn_index
            )));
        }
        validate_relative_path(&relative_path)?;

        Ok(Self {
            turn_index,
            artifact_type,
            relative_path,
        })
    }

    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Resolves the artifact against the state file it was saved with.
    pub fn resolve(&self, state_file: &Path) -> PathBuf {
        let base = state_file.parent().unwrap_or_else(|| Path::new(""));
        base.join(&self.relative_path)
    }
}

fn validate_relative_path(relative_path: &str) -> Result<()> {
    if relative_path.trim().is_empty() {
        return Err(HakoniwaError::validation("artifact relative_path must not be empty"));
    }

    // Windows-style roots are rejected on every platform.
    let looks_rooted = relative_path.starts_with('/')
        || relative_path.starts_with('\\')
        || relative_path.chars().nth(1) == Some(':');

    let path = Path::new(relative_path);
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

    if looks_rooted || path.is_absolute() || escapes {
        return Err(HakoniwaError::validation(format!(
            "artifact relative_path must stay inside the save directory: {}",
            relative_path
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_to_state_dir() {
        let artifact = ArtifactReference::new(0, "raw_response", "turn_0.log").unwrap();
        let resolved = artifact.resolve(Path::new("results/session/state.json"));
        assert_eq!(resolved, PathBuf::from("results/session/turn_0.log"));
    }

    #[test]
    fn test_resolve_nested_path() {
        let artifact = ArtifactReference::new(2, "evaluation", "eval/turn_2.json").unwrap();
        let resolved = artifact.resolve(Path::new("/tmp/save/state.json"));
        assert_eq!(resolved, PathBuf::from("/tmp/save/eval/turn_2.json"));
    }

    #[test]
    fn test_absolute_path_rejected() {
        assert!(ArtifactReference::new(0, "raw_response", "/etc/passwd").is_err());
        assert!(ArtifactReference::new(0, "raw_response", "C:\\logs\\a.log").is_err());
    }

    #[test]
    fn test_parent_escape_rejected() {
        assert!(ArtifactReference::new(0, "raw_response", "../other/turn.log").is_err());
    }

    #[test]
    fn test_empty_type_rejected() {
        assert!(ArtifactReference::new(0, " ", "turn_0.log").is_err());
    }
}
