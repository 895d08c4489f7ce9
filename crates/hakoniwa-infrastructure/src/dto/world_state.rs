//! World state DTOs and conversions to the domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hakoniwa_core::config::HakoniwaConfig;
use hakoniwa_core::error::{HakoniwaError, Result};
use hakoniwa_core::world::{ArtifactReference, Manifest, RuntimeState, TurnRecord, WorldState};

/// Top-level keys every saved world state carries.
pub const REQUIRED_FIELDS: &[&str] = &[
    "manifest",
    "scenario_id",
    "history",
    "artifacts",
    "runtime",
    "config",
];

/// The current world state schema.
pub type WorldStateDTO = WorldStateV1_0_0;

// ============================================================================
// Timestamp encoding
// ============================================================================

/// RFC 3339 in UTC with a `Z` suffix and as many fractional digits as needed.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => super::serialize(ts, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| Some(dt.with_timezone(&Utc)))
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

// ============================================================================
// V1.0.0
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestV1_0_0 {
    pub schema_version: String,
    pub session_id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub modified_at: Option<DateTime<Utc>>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurnRecordV1_0_0 {
    pub turn_index: u32,
    pub speaker: String,
    pub response: String,
    pub thought: Option<String>,
    pub retry_count: u32,
    pub give_up: bool,
    pub evaluation_score: Option<f64>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeStateV1_0_0 {
    pub turn_index: u32,
    pub last_actor: Option<String>,
    pub pending_action: Option<String>,
    pub is_complete: bool,
    pub completion_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactReferenceV1_0_0 {
    pub turn_index: u32,
    pub artifact_type: String,
    pub relative_path: String,
}

/// Config as captured at save time. Every key is required here, unlike in
/// config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSnapshotV1_0_0 {
    pub llm_backend: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub max_turns: u32,
    pub max_retries: u32,
    pub results_dir: String,
}

/// V1.0.0: Initial world state schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldStateV1_0_0 {
    pub manifest: ManifestV1_0_0,
    pub scenario_id: String,
    pub history: Vec<TurnRecordV1_0_0>,
    pub artifacts: Vec<ArtifactReferenceV1_0_0>,
    pub runtime: RuntimeStateV1_0_0,
    pub config: ConfigSnapshotV1_0_0,
}

// ============================================================================
// Domain -> DTO
// ============================================================================

impl From<&Manifest> for ManifestV1_0_0 {
    fn from(manifest: &Manifest) -> Self {
        Self {
            schema_version: manifest.schema_version().to_string(),
            session_id: manifest.session_id().to_string(),
            created_at: manifest.created_at(),
            modified_at: manifest.modified_at(),
            description: manifest.description().to_string(),
        }
    }
}

impl From<&TurnRecord> for TurnRecordV1_0_0 {
    fn from(turn: &TurnRecord) -> Self {
        Self {
            turn_index: turn.turn_index(),
            speaker: turn.speaker().to_string(),
            response: turn.response().to_string(),
            thought: turn.thought().map(str::to_string),
            retry_count: turn.retry_count(),
            give_up: turn.give_up(),
            evaluation_score: turn.evaluation_score(),
            created_at: turn.created_at(),
        }
    }
}

impl From<&RuntimeState> for RuntimeStateV1_0_0 {
    fn from(runtime: &RuntimeState) -> Self {
        Self {
            turn_index: runtime.turn_index(),
            last_actor: runtime.last_actor().map(str::to_string),
            pending_action: runtime.pending_action().map(str::to_string),
            is_complete: runtime.is_complete(),
            completion_reason: runtime.completion_reason().map(str::to_string),
        }
    }
}

impl From<&ArtifactReference> for ArtifactReferenceV1_0_0 {
    fn from(artifact: &ArtifactReference) -> Self {
        Self {
            turn_index: artifact.turn_index(),
            artifact_type: artifact.artifact_type().to_string(),
            relative_path: artifact.relative_path().to_string(),
        }
    }
}

impl From<&HakoniwaConfig> for ConfigSnapshotV1_0_0 {
    fn from(config: &HakoniwaConfig) -> Self {
        Self {
            llm_backend: config.llm_backend.clone(),
            llm_model: config.llm_model.clone(),
            llm_base_url: config.llm_base_url.clone(),
            max_turns: config.max_turns,
            max_retries: config.max_retries,
            results_dir: config.results_dir.clone(),
        }
    }
}

impl From<&WorldState> for WorldStateV1_0_0 {
    fn from(state: &WorldState) -> Self {
        Self {
            manifest: state.manifest().into(),
            scenario_id: state.scenario_id().to_string(),
            history: state.history().iter().map(Into::into).collect(),
            artifacts: state.artifacts().iter().map(Into::into).collect(),
            runtime: state.runtime().into(),
            config: state.config().into(),
        }
    }
}

// ============================================================================
// DTO -> Domain (validated)
// ============================================================================

impl TryFrom<ManifestV1_0_0> for Manifest {
    type Error = HakoniwaError;

    fn try_from(dto: ManifestV1_0_0) -> Result<Self> {
        Manifest::from_parts(
            dto.schema_version,
            dto.session_id,
            dto.created_at,
            dto.modified_at,
            dto.description,
        )
    }
}

impl TryFrom<TurnRecordV1_0_0> for TurnRecord {
    type Error = HakoniwaError;

    fn try_from(dto: TurnRecordV1_0_0) -> Result<Self> {
        let mut turn = TurnRecord::new(dto.turn_index, dto.speaker, dto.response)?
            .with_retry_count(dto.retry_count)
            .with_give_up(dto.give_up)
            .with_created_at(dto.created_at);
        if let Some(thought) = dto.thought {
            turn = turn.with_thought(thought);
        }
        if let Some(score) = dto.evaluation_score {
            turn = turn.with_evaluation_score(score)?;
        }
        Ok(turn)
    }
}

impl TryFrom<RuntimeStateV1_0_0> for RuntimeState {
    type Error = HakoniwaError;

    fn try_from(dto: RuntimeStateV1_0_0) -> Result<Self> {
        RuntimeState::from_parts(
            dto.turn_index,
            dto.last_actor,
            dto.pending_action,
            dto.is_complete,
            dto.completion_reason,
        )
    }
}

impl TryFrom<ArtifactReferenceV1_0_0> for ArtifactReference {
    type Error = HakoniwaError;

    fn try_from(dto: ArtifactReferenceV1_0_0) -> Result<Self> {
        ArtifactReference::new(dto.turn_index, dto.artifact_type, dto.relative_path)
    }
}

impl From<ConfigSnapshotV1_0_0> for HakoniwaConfig {
    fn from(dto: ConfigSnapshotV1_0_0) -> Self {
        HakoniwaConfig {
            llm_backend: dto.llm_backend,
            llm_model: dto.llm_model,
            llm_base_url: dto.llm_base_url,
            max_turns: dto.max_turns,
            max_retries: dto.max_retries,
            results_dir: dto.results_dir,
        }
    }
}

impl TryFrom<WorldStateV1_0_0> for WorldState {
    type Error = HakoniwaError;

    fn try_from(dto: WorldStateV1_0_0) -> Result<Self> {
        let history = dto
            .history
            .into_iter()
            .map(TurnRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        let artifacts = dto
            .artifacts
            .into_iter()
            .map(ArtifactReference::try_from)
            .collect::<Result<Vec<_>>>()?;

        WorldState::from_parts(
            dto.manifest.try_into()?,
            dto.scenario_id,
            history,
            artifacts,
            dto.runtime.try_into()?,
            dto.config.into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_dto() -> WorldStateV1_0_0 {
        let created = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        WorldStateV1_0_0 {
            manifest: ManifestV1_0_0 {
                schema_version: "1.0.0".to_string(),
                session_id: "hakoniwa_20250102_030405_abcdef01".to_string(),
                created_at: created,
                modified_at: None,
                description: String::new(),
            },
            scenario_id: "mystery_mansion".to_string(),
            history: vec![TurnRecordV1_0_0 {
                turn_index: 0,
                speaker: "やな".to_string(),
                response: "冷蔵庫を開けよう".to_string(),
                thought: None,
                retry_count: 0,
                give_up: false,
                evaluation_score: Some(0.5),
                created_at: created,
            }],
            artifacts: Vec::new(),
            runtime: RuntimeStateV1_0_0 {
                turn_index: 1,
                last_actor: Some("やな".to_string()),
                pending_action: None,
                is_complete: false,
                completion_reason: None,
            },
            config: (&HakoniwaConfig::default()).into(),
        }
    }

    #[test]
    fn test_dto_to_domain_and_back() {
        let dto = sample_dto();
        let state = WorldState::try_from(dto.clone()).unwrap();
        assert_eq!(WorldStateV1_0_0::from(&state), dto);
    }

    #[test]
    fn test_timestamp_format() {
        let json = serde_json::to_value(sample_dto()).unwrap();
        assert_eq!(json["manifest"]["created_at"], "2025-01-02T03:04:05Z");
        assert!(json["manifest"]["modified_at"].is_null());
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let mut dto = sample_dto();
        dto.history[0].evaluation_score = Some(1.5);
        assert!(WorldState::try_from(dto).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut json = serde_json::to_value(sample_dto()).unwrap();
        json["runtime"]["extra"] = serde_json::json!(true);
        assert!(serde_json::from_value::<WorldStateV1_0_0>(json).is_err());
    }

    #[test]
    fn test_negative_index_rejected() {
        let mut json = serde_json::to_value(sample_dto()).unwrap();
        json["history"][0]["turn_index"] = serde_json::json!(-1);
        assert!(serde_json::from_value::<WorldStateV1_0_0>(json).is_err());
    }
}
