//! Per-session retry bookkeeping for turns that reference missing objects.
//!
//! The ledger is an ordinary value owned by whoever drives a session. Two
//! sessions sharing a process never see each other's counts.

use std::collections::HashMap;

/// Default number of retries granted before giving up on a turn.
pub const DEFAULT_RETRY_BUDGET: u32 = 2;

/// What the caller should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Regenerate the turn. `attempt` is 1-based.
    Retry { attempt: u32 },
    /// The budget is exhausted.
    GiveUp,
}

/// Counts retry attempts per `(session_id, turn_index)`.
#[derive(Debug, Clone)]
pub struct RetryLedger {
    budget: u32,
    attempts: HashMap<(String, u32), u32>,
}

impl RetryLedger {
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            attempts: HashMap::new(),
        }
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Records one failed attempt and decides whether another is allowed.
    pub fn record_attempt(&mut self, session_id: &str, turn_index: u32) -> RetryDecision {
        let count = self
            .attempts
            .entry((session_id.to_string(), turn_index))
            .or_insert(0);
        *count += 1;

        if *count <= self.budget {
            RetryDecision::Retry { attempt: *count }
        } else {
            tracing::debug!(
                "Retry budget exhausted for session {} turn {} after {} attempts",
                session_id,
                turn_index,
                count
            );
            RetryDecision::GiveUp
        }
    }

    /// Attempts recorded so far for a turn.
    pub fn attempts(&self, session_id: &str, turn_index: u32) -> u32 {
        self.attempts
            .get(&(session_id.to_string(), turn_index))
            .copied()
            .unwrap_or(0)
    }

    /// Forgets every count belonging to one session.
    pub fn reset(&mut self, session_id: &str) {
        self.attempts.retain(|(session, _), _| session != session_id);
    }
}

impl Default for RetryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_BUDGET)
    }
}
