//! Suggestion-only entry point used by the session loop.

use super::audit::AuditSink;
use super::fuzzy::FuzzyMatcher;
use super::preprocess::expand_queries;
use super::strategy::{MatcherExt, MatcherSettings};
use super::types::{AdoptionStatus, MatchCandidate};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Best resolution found for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// The query (original or expanded) that produced the hit
    pub query: String,
    pub candidate: MatchCandidate,
    /// `AutoAdopted` only when the caller's query is itself a world object
    pub status: AdoptionStatus,
}

impl Suggestion {
    pub fn name(&self) -> &str {
        self.candidate.name()
    }

    pub fn score(&self) -> f64 {
        self.candidate.score()
    }
}

/// Suggests a world object for `query` without ever auto-adopting a fuzzy hit.
///
/// # Arguments
///
/// * `query` - Raw reference taken from narrative text
/// * `world_objects` - Names of the objects that exist
/// * `threshold` - Minimum score for a suggestion
/// * `use_expansion` - Also try expanded queries such as the container of
///   「XのY」, keeping only those that name a world object
/// * `sink` - Receives one audit entry per query tried
///
/// # Returns
///
/// The highest-scoring hit at or above `threshold`, or `None`.
pub fn suggest_match(
    query: &str,
    world_objects: &BTreeSet<String>,
    threshold: f64,
    use_expansion: bool,
    sink: Option<Arc<dyn AuditSink>>,
) -> Option<Suggestion> {
    let auto_adopt = MatcherSettings::DEFAULT_AUTO_ADOPT_THRESHOLD.max(threshold);
    let settings = match MatcherSettings::new(auto_adopt, threshold, false) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Invalid suggestion threshold {}: {}", threshold, e);
            return None;
        }
    };

    let mut matcher = FuzzyMatcher::new(settings);
    if let Some(sink) = sink {
        matcher = matcher.with_audit_sink(sink);
    }

    let mut queries = vec![query.to_string()];
    if use_expansion {
        for expanded in expand_queries(query, Some(world_objects)) {
            if !queries.contains(&expanded) {
                queries.push(expanded);
            }
        }
    }

    let mut best: Option<(String, MatchCandidate)> = None;
    for q in &queries {
        let result = matcher.match_query(q, world_objects);
        let Some(top) = result.top() else {
            continue;
        };
        if top.score() < threshold {
            continue;
        }
        let better = best
            .as_ref()
            .is_none_or(|(_, current)| top.score() > current.score());
        if better {
            best = Some((q.clone(), top.clone()));
        }
    }

    best.map(|(q, candidate)| {
        let status = if world_objects.contains(query) {
            AdoptionStatus::AutoAdopted
        } else {
            AdoptionStatus::Suggested
        };
        tracing::debug!(
            "Suggested '{}' for '{}' via '{}' ({:.2})",
            candidate.name(),
            query,
            q,
            candidate.score()
        );
        Suggestion {
            query: q,
            candidate,
            status,
        }
    })
}
