//! Audit trail for matching operations.
//!
//! Every call to `match_query` yields exactly one entry, whatever the outcome.

use super::types::{AdoptionStatus, MatchMethod, MatchReason, MatchResult};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Mutex;

/// A candidate as recorded in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditCandidate {
    pub name: String,
    pub score: f64,
    pub method: MatchMethod,
}

/// Immutable record of one matching call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    timestamp: DateTime<Utc>,
    input_query: String,
    world_objects: Vec<String>,
    candidates: Vec<AuditCandidate>,
    adopted: Option<String>,
    status: AdoptionStatus,
    rejection_reason: Option<MatchReason>,
}

impl AuditLogEntry {
    /// Captures a result together with the world set it was computed against.
    pub fn from_match_result(result: &MatchResult, world_objects: &BTreeSet<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            input_query: result.query.clone(),
            world_objects: world_objects.iter().cloned().collect(),
            candidates: result
                .candidates
                .iter()
                .map(|c| AuditCandidate {
                    name: c.name().to_string(),
                    score: c.score(),
                    method: c.method(),
                })
                .collect(),
            adopted: result.adopted.as_ref().map(|c| c.name().to_string()),
            status: result.status,
            rejection_reason: result.rejection_reason,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn input_query(&self) -> &str {
        &self.input_query
    }

    /// World objects in sorted order.
    pub fn world_objects(&self) -> &[String] {
        &self.world_objects
    }

    pub fn candidates(&self) -> &[AuditCandidate] {
        &self.candidates
    }

    pub fn adopted(&self) -> Option<&str> {
        self.adopted.as_deref()
    }

    pub fn status(&self) -> AdoptionStatus {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<MatchReason> {
        self.rejection_reason
    }
}

/// Append-only destination for audit entries.
///
/// Implementations serialize concurrent appends themselves.
pub trait AuditSink: Send + Sync {
    fn append(&self, entry: &AuditLogEntry) -> Result<()>;
}

/// Keeps entries in memory. Used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries recorded so far.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Renders all entries as JSON Lines.
    pub fn to_jsonl(&self) -> Result<String> {
        let lines = self
            .lock()
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AuditLogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AuditSink for InMemoryAuditSink {
    fn append(&self, entry: &AuditLogEntry) -> Result<()> {
        self.lock().push(entry.clone());
        Ok(())
    }
}
