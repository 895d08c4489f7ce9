//! WorldState: the aggregate root that gets persisted.

use super::artifact::ArtifactReference;
use super::manifest::Manifest;
use super::runtime::RuntimeState;
use super::turn::TurnRecord;
use crate::config::HakoniwaConfig;
use crate::error::{HakoniwaError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Canonical in-memory representation of a session's world state.
///
/// Sections:
/// - manifest: metadata about this save (version, session id, timestamps)
/// - scenario_id: which scenario this is for
/// - history: confirmed turns, append-only
/// - artifacts: references to artifact files, unique
/// - runtime: cursor for resume
/// - config: config snapshot at save time
///
/// Every constructor and mutator re-checks the cross-field invariants, so an
/// inconsistent aggregate cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    manifest: Manifest,
    scenario_id: String,
    history: Vec<TurnRecord>,
    artifacts: Vec<ArtifactReference>,
    runtime: RuntimeState,
    config: HakoniwaConfig,
}

impl WorldState {
    /// Starts an empty session for a scenario.
    pub fn new(
        manifest: Manifest,
        scenario_id: impl Into<String>,
        config: HakoniwaConfig,
    ) -> Result<Self> {
        Self::from_parts(
            manifest,
            scenario_id,
            Vec::new(),
            Vec::new(),
            RuntimeState::new(),
            config,
        )
    }

    /// Assembles a world state from its sections, validating all of them together.
    pub fn from_parts(
        manifest: Manifest,
        scenario_id: impl Into<String>,
        history: Vec<TurnRecord>,
        artifacts: Vec<ArtifactReference>,
        runtime: RuntimeState,
        config: HakoniwaConfig,
    ) -> Result<Self> {
        let scenario_id = scenario_id.into();
        if scenario_id.trim().is_empty() {
            return Err(HakoniwaError::validation("scenario_id must not be empty"));
        }

        config.validate()?;
        check_history_order(&history)?;
        check_artifacts_unique(&artifacts)?;
        check_runtime_cursor(&history, &runtime)?;

        Ok(Self {
            manifest,
            scenario_id,
            history,
            artifacts,
            runtime,
            config,
        })
    }

    // ============================================================================
    // Mutators (append-only for history)
    // ============================================================================

    /// Appends a confirmed turn and moves the runtime cursor past it.
    pub fn append_turn(&mut self, turn: TurnRecord) -> Result<()> {
        if let Some(last) = self.history.last() {
            if turn.turn_index() <= last.turn_index() {
                return Err(HakoniwaError::validation(format!(
                    "turn {} cannot follow turn {} in history",
                    turn.turn_index(),
                    last.turn_index()
                )));
            }
        }

        let next = turn.turn_index().checked_add(1).ok_or_else(|| {
            HakoniwaError::validation(format!("turn index {} overflows", turn.turn_index()))
        })?;
        if self.runtime.turn_index() < next {
            self.runtime.advance(next, turn.speaker());
        }
        self.history.push(turn);
        Ok(())
    }

    /// Registers an artifact; an identical reference may only be added once.
    pub fn add_artifact(&mut self, artifact: ArtifactReference) -> Result<()> {
        if self.artifacts.contains(&artifact) {
            return Err(HakoniwaError::validation(format!(
                "duplicate artifact reference: {}",
                artifact.relative_path()
            )));
        }
        self.artifacts.push(artifact);
        Ok(())
    }

    /// Replaces the runtime cursor.
    pub fn set_runtime(&mut self, runtime: RuntimeState) -> Result<()> {
        check_runtime_cursor(&self.history, &runtime)?;
        self.runtime = runtime;
        Ok(())
    }

    /// Stamps the manifest with a last-modified time.
    pub fn touch(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.manifest = self.manifest.clone().with_modified_at(now)?;
        Ok(())
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn artifacts(&self) -> &[ArtifactReference] {
        &self.artifacts
    }

    pub fn runtime(&self) -> &RuntimeState {
        &self.runtime
    }

    pub fn config(&self) -> &HakoniwaConfig {
        &self.config
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }
}

fn check_history_order(history: &[TurnRecord]) -> Result<()> {
    for pair in history.windows(2) {
        if pair[1].turn_index() <= pair[0].turn_index() {
            return Err(HakoniwaError::validation(format!(
                "history turn indices must strictly increase: {} follows {}",
                pair[1].turn_index(),
                pair[0].turn_index()
            )));
        }
    }
    Ok(())
}

fn check_artifacts_unique(artifacts: &[ArtifactReference]) -> Result<()> {
    let mut seen = HashSet::new();
    for artifact in artifacts {
        if !seen.insert(artifact) {
            return Err(HakoniwaError::validation(format!(
                "duplicate artifact reference: {}",
                artifact.relative_path()
            )));
        }
    }
    Ok(())
}

fn check_runtime_cursor(history: &[TurnRecord], runtime: &RuntimeState) -> Result<()> {
    if let Some(last) = history.last() {
        if runtime.turn_index() <= last.turn_index() {
            return Err(HakoniwaError::validation(format!(
                "runtime turn_index {} must be past the last recorded turn {}",
                runtime.turn_index(),
                last.turn_index()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> WorldState {
        WorldState::new(
            Manifest::new("test"),
            "mystery_mansion",
            HakoniwaConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_append_turn_advances_runtime() {
        let mut state = sample_state();
        state
            .append_turn(TurnRecord::new(0, "やな", "おはよう").unwrap())
            .unwrap();
        state
            .append_turn(TurnRecord::new(1, "あゆ", "おはようございます").unwrap())
            .unwrap();

        assert_eq!(state.turn_count(), 2);
        assert_eq!(state.runtime().turn_index(), 2);
        assert_eq!(state.runtime().last_actor(), Some("あゆ"));
    }

    #[test]
    fn test_append_out_of_order_rejected() {
        let mut state = sample_state();
        state
            .append_turn(TurnRecord::new(3, "やな", "a").unwrap())
            .unwrap();
        let err = state
            .append_turn(TurnRecord::new(3, "あゆ", "b").unwrap())
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(state.turn_count(), 1);
    }

    #[test]
    fn test_from_parts_rejects_duplicate_turns() {
        let history = vec![
            TurnRecord::new(0, "やな", "a").unwrap(),
            TurnRecord::new(0, "あゆ", "b").unwrap(),
        ];
        let runtime = RuntimeState::from_parts(1, None, None, false, None).unwrap();
        let result = WorldState::from_parts(
            Manifest::new(""),
            "s",
            history,
            Vec::new(),
            runtime,
            HakoniwaConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_parts_rejects_stale_cursor() {
        let history = vec![TurnRecord::new(0, "やな", "a").unwrap()];
        let result = WorldState::from_parts(
            Manifest::new(""),
            "s",
            history,
            Vec::new(),
            RuntimeState::new(),
            HakoniwaConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_scenario_rejected() {
        let result = WorldState::new(Manifest::new(""), "", HakoniwaConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_snapshot_rejected() {
        let config = HakoniwaConfig {
            max_turns: 0,
            ..Default::default()
        };
        assert!(WorldState::new(Manifest::new(""), "s", config).is_err());
    }

    #[test]
    fn test_duplicate_artifact_rejected() {
        let mut state = sample_state();
        let artifact = ArtifactReference::new(0, "raw_response", "turn_0.log").unwrap();
        state.add_artifact(artifact.clone()).unwrap();
        assert!(state.add_artifact(artifact).is_err());
        assert_eq!(state.artifacts().len(), 1);
    }

    #[test]
    fn test_set_runtime_checks_cursor() {
        let mut state = sample_state();
        state
            .append_turn(TurnRecord::new(0, "やな", "a").unwrap())
            .unwrap();
        assert!(state.set_runtime(RuntimeState::new()).is_err());

        let mut runtime = state.runtime().clone();
        runtime.complete("done");
        state.set_runtime(runtime).unwrap();
        assert!(state.runtime().is_complete());
    }

    #[test]
    fn test_touch_sets_modified_at() {
        let mut state = sample_state();
        let now = state.manifest().created_at() + chrono::Duration::seconds(5);
        state.touch(now).unwrap();
        assert_eq!(state.manifest().modified_at(), Some(now));
    }
}
