//! Value types produced by the semantic matcher.

use crate::error::{HakoniwaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matching method used to produce a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Fuzzy,
    Embedding,
    Exact,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fuzzy => "fuzzy",
            Self::Embedding => "embedding",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the adoption policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
    /// Accepted as the resolved name without confirmation.
    AutoAdopted,
    /// Surfaced to the caller as advice only.
    Suggested,
    /// Nothing usable.
    Rejected,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoAdopted => "auto_adopted",
            Self::Suggested => "suggested",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a result was not adopted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    EmptyWorldObjects,
    NoCandidatesAboveThreshold,
    GenericNounNoAutoAdopt,
    BelowSuggestThreshold,
}

impl MatchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyWorldObjects => "empty_world_objects",
            Self::NoCandidatesAboveThreshold => "no_candidates_above_threshold",
            Self::GenericNounNoAutoAdopt => "generic_noun_no_auto_adopt",
            Self::BelowSuggestThreshold => "below_suggest_threshold",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate match for a query.
///
/// The name always comes from the world-object set supplied with the query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    name: String,
    score: f64,
    method: MatchMethod,
}

impl MatchCandidate {
    /// Creates a candidate; the score must lie in [0, 1].
    pub fn new(name: impl Into<String>, score: f64, method: MatchMethod) -> Result<Self> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(HakoniwaError::validation(format!(
                "Score must be between 0.0 and 1.0, got {}",
                score
            )));
        }
        Ok(Self {
            name: name.into(),
            score,
            method,
        })
    }

    /// A literal hit: score 1.0, method `exact`.
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 1.0,
            method: MatchMethod::Exact,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn method(&self) -> MatchMethod {
        self.method
    }
}

/// Result of a matching operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The original query string
    pub query: String,
    /// Candidates sorted by score, best first
    pub candidates: Vec<MatchCandidate>,
    /// The adopted candidate, only set for `AutoAdopted`
    pub adopted: Option<MatchCandidate>,
    pub status: AdoptionStatus,
    pub rejection_reason: Option<MatchReason>,
}

impl MatchResult {
    pub(crate) fn rejected(query: &str, reason: MatchReason) -> Self {
        Self {
            query: query.to_string(),
            candidates: Vec::new(),
            adopted: None,
            status: AdoptionStatus::Rejected,
            rejection_reason: Some(reason),
        }
    }

    /// Highest-scoring candidate, if any.
    pub fn top(&self) -> Option<&MatchCandidate> {
        self.candidates.first()
    }

    pub fn is_auto_adopted(&self) -> bool {
        self.status == AdoptionStatus::AutoAdopted
    }
}

/// Nouns too common to disambiguate anything; never auto-adopted.
pub const GENERIC_NOUNS: &[&str] = &[
    "床", "壁", "天井", "空気", "部屋", "場所", "floor", "wall", "ceiling", "air", "room", "place",
];

pub fn is_generic_noun(name: &str) -> bool {
    GENERIC_NOUNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_score_range() {
        assert!(MatchCandidate::new("test", 0.8, MatchMethod::Fuzzy).is_ok());
        assert!(MatchCandidate::new("test", -0.1, MatchMethod::Fuzzy).is_err());
        assert!(MatchCandidate::new("test", 1.1, MatchMethod::Fuzzy).is_err());
    }

    #[test]
    fn test_exact_candidate() {
        let candidate = MatchCandidate::exact("冷蔵庫");
        assert_eq!(candidate.score(), 1.0);
        assert_eq!(candidate.method(), MatchMethod::Exact);
    }

    #[test]
    fn test_generic_nouns() {
        assert!(is_generic_noun("床"));
        assert!(is_generic_noun("room"));
        assert!(!is_generic_noun("冷蔵庫"));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AdoptionStatus::AutoAdopted).unwrap();
        assert_eq!(json, "\"auto_adopted\"");
        let json = serde_json::to_string(&MatchReason::GenericNounNoAutoAdopt).unwrap();
        assert_eq!(json, "\"generic_noun_no_auto_adopt\"");
    }
}
