//! Semantic matcher: resolves free-text object references against the set of
//! objects that exist in the world.
//!
//! Guarantees:
//! - every candidate names a member of the supplied world set
//! - an exact name always wins with score 1.0
//! - generic nouns are never auto-adopted
//! - auto-adoption is off unless explicitly enabled

mod audit;
mod fuzzy;
mod preprocess;
mod strategy;
mod suggest;
mod types;

pub use audit::{AuditCandidate, AuditLogEntry, AuditSink, InMemoryAuditSink};
pub use fuzzy::{FuzzyMatcher, similarity};
pub use preprocess::{
    ACTION_PARTICLES, MAX_QUERY_LENGTH, expand_queries, extract_action_object, normalize_query,
    split_container_item,
};
pub use strategy::{MAX_CANDIDATES, Matcher, MatcherExt, MatcherSettings};
pub use suggest::{Suggestion, suggest_match};
pub use types::{
    AdoptionStatus, GENERIC_NOUNS, MatchCandidate, MatchMethod, MatchReason, MatchResult,
    is_generic_noun,
};
