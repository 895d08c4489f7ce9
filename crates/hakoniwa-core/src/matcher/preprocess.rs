//! Query preprocessing: normalization and deterministic expansion.
//!
//! Narrative text refers to objects with phrases like 「冷蔵庫の牛乳」 or
//! "refrigerator's milk". Expansion turns such a phrase into short candidate
//! names that can be resolved one by one against the world set.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Longest query, in characters, considered as a candidate object name.
pub const MAX_QUERY_LENGTH: usize = 20;

/// Particles that end a noun phrase in an action sentence.
pub const ACTION_PARTICLES: &[&str] = &["に", "へ", "を", "で", "から", "まで"];

static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[「」『』【】"'“”‘’()（）\[\]]"#).expect("valid quote regex")
});

static TRAILING_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[。、,.！？!?]+$").expect("valid punctuation regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x{3000}]+").expect("valid whitespace regex"));

// Shortest container first: 「AのBのC」 splits into A and 「BのC」.
static CONTAINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)(?:の|['’]s\s+)(.+)$").expect("valid container regex")
});

/// Normalizes a raw query.
///
/// Trims, removes quotation and bracket marks, drops trailing punctuation and
/// collapses runs of whitespace (full-width included) into one space.
pub fn normalize_query(query: &str) -> String {
    let unquoted = QUOTE_RE.replace_all(query.trim(), "");
    let trimmed = TRAILING_PUNCT_RE.replace(unquoted.trim(), "");
    WHITESPACE_RE
        .replace_all(trimmed.trim(), " ")
        .trim()
        .to_string()
}

/// Splits `XのY` / `X's Y` into `(X, Y)`.
///
/// The possessive apostrophe must survive until this split, so the query is
/// expected to be trimmed but not normalized.
pub fn split_container_item(query: &str) -> Option<(String, String)> {
    let captures = CONTAINER_RE.captures(query.trim())?;
    let container = captures.get(1)?.as_str().trim();
    let item = captures.get(2)?.as_str().trim();
    if container.is_empty() || item.is_empty() {
        return None;
    }
    Some((container.to_string(), item.to_string()))
}

/// Extracts the object of an action sentence such as 「冷蔵庫を開ける」.
///
/// The earliest particle with a non-empty prefix wins; the prefix is kept only
/// when it is short enough to be an object name.
pub fn extract_action_object(query: &str) -> Option<String> {
    let query = query.trim();
    let cut = ACTION_PARTICLES
        .iter()
        .flat_map(|particle| query.match_indices(particle).map(|(pos, _)| pos))
        .filter(|pos| *pos > 0)
        .min()?;

    let object = query[..cut].trim();
    if object.is_empty() || char_len(object) > MAX_QUERY_LENGTH {
        return None;
    }
    Some(object.to_string())
}

/// Expands a query into candidate object names, in priority order.
///
/// 1. container `X` of `XのY`
/// 2. item `Y`, when short
/// 3. the same two steps applied to `Y`, recursively
/// 4. the object of an action sentence
/// 5. the normalized original, when short
///
/// Every candidate is normalized and deduplicated. When `world_objects` is
/// given, candidates not in it are dropped.
pub fn expand_queries(query: &str, world_objects: Option<&BTreeSet<String>>) -> Vec<String> {
    let mut expansion = Expansion {
        seen: BTreeSet::new(),
        out: Vec::new(),
        world_objects,
    };

    let query = query.trim();
    if query.is_empty() {
        return expansion.out;
    }

    let mut rest = query.to_string();
    while let Some((container, item)) = split_container_item(&rest) {
        expansion.push(&container);
        if char_len(&item) <= MAX_QUERY_LENGTH {
            expansion.push(&item);
        }
        rest = item;
    }

    if let Some(object) = extract_action_object(query) {
        expansion.push(&object);
    }

    let normalized = normalize_query(query);
    if char_len(&normalized) <= MAX_QUERY_LENGTH {
        expansion.push(&normalized);
    }

    expansion.out
}

struct Expansion<'a> {
    seen: BTreeSet<String>,
    out: Vec<String>,
    world_objects: Option<&'a BTreeSet<String>>,
}

impl Expansion<'_> {
    fn push(&mut self, candidate: &str) {
        let normalized = normalize_query(candidate);
        if normalized.is_empty() || self.seen.contains(&normalized) {
            return;
        }
        if let Some(world) = self.world_objects {
            if !world.contains(&normalized) {
                return;
            }
        }
        self.seen.insert(normalized.clone());
        self.out.push(normalized);
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
