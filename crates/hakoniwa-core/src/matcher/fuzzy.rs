//! String-similarity matcher.

use super::audit::AuditSink;
use super::strategy::{Matcher, MatcherSettings};
use super::types::{MatchCandidate, MatchMethod};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Similarity in [0, 1] based on normalized Levenshtein distance.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Scores every world object against the query by edit distance.
///
/// Only names from the supplied world set are ever scored, so a candidate can
/// never name an object the world doesn't contain.
#[derive(Default)]
pub struct FuzzyMatcher {
    settings: MatcherSettings,
    sink: Option<Arc<dyn AuditSink>>,
}

impl FuzzyMatcher {
    pub fn new(settings: MatcherSettings) -> Self {
        Self {
            settings,
            sink: None,
        }
    }

    /// Attaches a sink that receives one entry per `match_query` call.
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyMatcher")
            .field("settings", &self.settings)
            .field("audited", &self.sink.is_some())
            .finish()
    }
}

impl Matcher for FuzzyMatcher {
    fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    fn find_candidates(
        &self,
        query: &str,
        world_objects: &BTreeSet<String>,
        limit: usize,
    ) -> Vec<MatchCandidate> {
        if query.is_empty() || world_objects.is_empty() || limit == 0 {
            return Vec::new();
        }

        let threshold = self.settings.suggest_threshold();
        let mut scored: Vec<(&String, f64)> = world_objects
            .iter()
            .map(|name| (name, similarity(query, name)))
            .filter(|(_, score)| *score >= threshold)
            .collect();

        // Ties keep name order, which the BTreeSet already provides.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);

        scored
            .into_iter()
            .filter_map(|(name, score)| {
                MatchCandidate::new(name.as_str(), score, MatchMethod::Fuzzy).ok()
            })
            .collect()
    }

    fn audit_sink(&self) -> Option<&dyn AuditSink> {
        self.sink.as_deref()
    }
}
