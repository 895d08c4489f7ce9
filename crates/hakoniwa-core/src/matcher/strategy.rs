//! Matcher trait and the adoption policy shared by every strategy.

use super::audit::{AuditLogEntry, AuditSink};
use super::types::{AdoptionStatus, MatchCandidate, MatchReason, MatchResult, is_generic_noun};
use crate::error::{HakoniwaError, Result};
use std::collections::BTreeSet;

/// Maximum number of candidates a strategy is asked for.
pub const MAX_CANDIDATES: usize = 5;

/// Thresholds and the auto-adopt switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherSettings {
    auto_adopt_threshold: f64,
    suggest_threshold: f64,
    allow_auto_adopt: bool,
}

impl MatcherSettings {
    pub const DEFAULT_AUTO_ADOPT_THRESHOLD: f64 = 0.9;
    pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.7;

    /// # Arguments
    ///
    /// * `auto_adopt_threshold` - Minimum score for auto-adoption
    /// * `suggest_threshold` - Minimum score for a suggestion
    /// * `allow_auto_adopt` - Whether fuzzy hits may be adopted at all
    ///
    /// # Returns
    ///
    /// An error unless both thresholds lie in [0, 1] and
    /// `suggest_threshold <= auto_adopt_threshold`.
    pub fn new(
        auto_adopt_threshold: f64,
        suggest_threshold: f64,
        allow_auto_adopt: bool,
    ) -> Result<Self> {
        for (name, value) in [
            ("auto_adopt_threshold", auto_adopt_threshold),
            ("suggest_threshold", suggest_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(HakoniwaError::validation(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        if suggest_threshold > auto_adopt_threshold {
            return Err(HakoniwaError::validation(format!(
                "suggest_threshold ({}) must not exceed auto_adopt_threshold ({})",
                suggest_threshold, auto_adopt_threshold
            )));
        }

        Ok(Self {
            auto_adopt_threshold,
            suggest_threshold,
            allow_auto_adopt,
        })
    }

    pub fn auto_adopt_threshold(&self) -> f64 {
        self.auto_adopt_threshold
    }

    pub fn suggest_threshold(&self) -> f64 {
        self.suggest_threshold
    }

    pub fn allow_auto_adopt(&self) -> bool {
        self.allow_auto_adopt
    }
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            auto_adopt_threshold: Self::DEFAULT_AUTO_ADOPT_THRESHOLD,
            suggest_threshold: Self::DEFAULT_SUGGEST_THRESHOLD,
            allow_auto_adopt: false,
        }
    }
}

/// A candidate-generation strategy.
///
/// Implementations only score names. Guards, adoption and auditing are applied
/// by [`MatcherExt::match_query`], which every matcher gets for free and none
/// can replace.
pub trait Matcher: Send + Sync {
    fn settings(&self) -> &MatcherSettings;

    /// Returns up to `limit` candidates drawn from `world_objects`, best first.
    fn find_candidates(
        &self,
        query: &str,
        world_objects: &BTreeSet<String>,
        limit: usize,
    ) -> Vec<MatchCandidate>;

    fn audit_sink(&self) -> Option<&dyn AuditSink> {
        None
    }
}

/// Matching entry points layered over any [`Matcher`].
pub trait MatcherExt: Matcher {
    /// Resolves `query` against the world-object set.
    ///
    /// Order of evaluation:
    /// 1. empty world set: rejected
    /// 2. exact membership: auto-adopted with score 1.0, scoring skipped
    /// 3. no candidates from the strategy: rejected
    /// 4. adoption policy on the top candidate: generic noun (suggested at any
    ///    score), then below the suggest threshold (rejected), then auto-adopt
    ///    when enabled, otherwise suggested
    ///
    /// One audit entry is emitted per call when a sink is attached.
    fn match_query(&self, query: &str, world_objects: &BTreeSet<String>) -> MatchResult {
        let result = resolve(self, query, world_objects);

        if let Some(sink) = self.audit_sink() {
            let entry = AuditLogEntry::from_match_result(&result, world_objects);
            if let Err(e) = sink.append(&entry) {
                tracing::warn!("Failed to write match audit entry for '{}': {}", query, e);
            }
        }

        result
    }

    /// Whether the candidate would be auto-adopted under the current settings.
    fn should_auto_adopt(&self, candidate: &MatchCandidate) -> bool {
        let settings = self.settings();
        settings.allow_auto_adopt()
            && !is_generic_noun(candidate.name())
            && candidate.score() >= settings.auto_adopt_threshold()
    }
}

impl<M: Matcher + ?Sized> MatcherExt for M {}

fn resolve<M: Matcher + ?Sized>(
    matcher: &M,
    query: &str,
    world_objects: &BTreeSet<String>,
) -> MatchResult {
    if world_objects.is_empty() {
        return MatchResult::rejected(query, MatchReason::EmptyWorldObjects);
    }

    if world_objects.contains(query) {
        let exact = MatchCandidate::exact(query);
        return MatchResult {
            query: query.to_string(),
            candidates: vec![exact.clone()],
            adopted: Some(exact),
            status: AdoptionStatus::AutoAdopted,
            rejection_reason: None,
        };
    }

    let settings = *matcher.settings();
    let mut candidates = matcher.find_candidates(query, world_objects, MAX_CANDIDATES);

    let before = candidates.len();
    candidates.retain(|c| world_objects.contains(c.name()));
    if candidates.len() != before {
        tracing::warn!(
            "Dropped {} candidates outside the world set for '{}'",
            before - candidates.len(),
            query
        );
    }
    candidates.sort_by(|a, b| b.score().total_cmp(&a.score()));

    let Some(top) = candidates.first().cloned() else {
        return MatchResult::rejected(query, MatchReason::NoCandidatesAboveThreshold);
    };

    let (status, adopted, reason) = if is_generic_noun(top.name()) {
        (
            AdoptionStatus::Suggested,
            None,
            Some(MatchReason::GenericNounNoAutoAdopt),
        )
    } else if top.score() < settings.suggest_threshold() {
        (
            AdoptionStatus::Rejected,
            None,
            Some(MatchReason::BelowSuggestThreshold),
        )
    } else if settings.allow_auto_adopt() && top.score() >= settings.auto_adopt_threshold() {
        (AdoptionStatus::AutoAdopted, Some(top), None)
    } else {
        (AdoptionStatus::Suggested, None, None)
    };

    MatchResult {
        query: query.to_string(),
        candidates,
        adopted,
        status,
        rejection_reason: reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::types::MatchMethod;

    /// Returns fixed scores for every world object.
    struct FixedMatcher {
        settings: MatcherSettings,
        scores: Vec<(&'static str, f64)>,
    }

    impl Matcher for FixedMatcher {
        fn settings(&self) -> &MatcherSettings {
            &self.settings
        }

        fn find_candidates(
            &self,
            _query: &str,
            _world_objects: &BTreeSet<String>,
            limit: usize,
        ) -> Vec<MatchCandidate> {
            self.scores
                .iter()
                .take(limit)
                .map(|(name, score)| MatchCandidate::new(*name, *score, MatchMethod::Fuzzy).unwrap())
                .collect()
        }
    }

    fn world(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_settings_validation() {
        assert!(MatcherSettings::new(0.9, 0.7, false).is_ok());
        assert!(MatcherSettings::new(0.5, 0.7, false).is_err());
        assert!(MatcherSettings::new(1.5, 0.7, false).is_err());
        assert!(MatcherSettings::new(0.9, f64::NAN, false).is_err());
    }

    #[test]
    fn test_default_settings_disable_auto_adopt() {
        let settings = MatcherSettings::default();
        assert!(!settings.allow_auto_adopt());
        assert_eq!(settings.auto_adopt_threshold(), 0.9);
        assert_eq!(settings.suggest_threshold(), 0.7);
    }

    #[test]
    fn test_high_score_only_suggested_by_default() {
        let matcher = FixedMatcher {
            settings: MatcherSettings::default(),
            scores: vec![("冷蔵庫", 0.95)],
        };
        let result = matcher.match_query("れいぞうこ", &world(&["冷蔵庫"]));

        assert_eq!(result.status, AdoptionStatus::Suggested);
        assert!(result.adopted.is_none());
    }

    #[test]
    fn test_auto_adopt_when_enabled() {
        let matcher = FixedMatcher {
            settings: MatcherSettings::new(0.9, 0.7, true).unwrap(),
            scores: vec![("冷蔵庫", 0.95)],
        };
        let result = matcher.match_query("れいぞうこ", &world(&["冷蔵庫"]));

        assert_eq!(result.status, AdoptionStatus::AutoAdopted);
        assert_eq!(result.adopted.unwrap().name(), "冷蔵庫");
    }

    #[test]
    fn test_generic_noun_beats_auto_adopt() {
        let matcher = FixedMatcher {
            settings: MatcherSettings::new(0.9, 0.7, true).unwrap(),
            scores: vec![("floor", 0.99)],
        };
        let result = matcher.match_query("flor", &world(&["floor"]));

        assert_eq!(result.status, AdoptionStatus::Suggested);
        assert_eq!(result.rejection_reason, Some(MatchReason::GenericNounNoAutoAdopt));
        assert!(!matcher.should_auto_adopt(&result.candidates[0]));
    }

    #[test]
    fn test_low_scores_rejected() {
        let matcher = FixedMatcher {
            settings: MatcherSettings::default(),
            scores: vec![("冷蔵庫", 0.5)],
        };
        let result = matcher.match_query("x", &world(&["冷蔵庫"]));

        assert_eq!(result.status, AdoptionStatus::Rejected);
        assert_eq!(result.rejection_reason, Some(MatchReason::BelowSuggestThreshold));
        assert_eq!(result.candidates.len(), 1);
        assert!(result.adopted.is_none());
    }

    #[test]
    fn test_low_scoring_generic_noun_still_suggested() {
        let matcher = FixedMatcher {
            settings: MatcherSettings::default(),
            scores: vec![("floor", 0.5)],
        };
        let result = matcher.match_query("flooring", &world(&["floor"]));

        assert_eq!(result.status, AdoptionStatus::Suggested);
        assert_eq!(result.rejection_reason, Some(MatchReason::GenericNounNoAutoAdopt));
        assert!(result.adopted.is_none());
    }

    #[test]
    fn test_no_candidates_rejected() {
        let matcher = FixedMatcher {
            settings: MatcherSettings::default(),
            scores: vec![],
        };
        let result = matcher.match_query("x", &world(&["冷蔵庫"]));

        assert_eq!(result.status, AdoptionStatus::Rejected);
        assert_eq!(
            result.rejection_reason,
            Some(MatchReason::NoCandidatesAboveThreshold)
        );
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_foreign_candidates_dropped() {
        let matcher = FixedMatcher {
            settings: MatcherSettings::default(),
            scores: vec![("幽霊", 0.99), ("冷蔵庫", 0.8)],
        };
        let result = matcher.match_query("x", &world(&["冷蔵庫"]));

        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.top().unwrap().name(), "冷蔵庫");
    }
}
