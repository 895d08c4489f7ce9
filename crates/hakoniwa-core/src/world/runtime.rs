//! RuntimeState: the resumable cursor of a session.

use crate::error::{HakoniwaError, Result};

/// Tracks where a session should resume.
///
/// Unlike history this is mutable, but `completion_reason` can only be set
/// together with the completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeState {
    turn_index: u32,
    last_actor: Option<String>,
    pending_action: Option<String>,
    is_complete: bool,
    completion_reason: Option<String>,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cursor from stored fields.
    pub fn from_parts(
        turn_index: u32,
        last_actor: Option<String>,
        pending_action: Option<String>,
        is_complete: bool,
        completion_reason: Option<String>,
    ) -> Result<Self> {
        if completion_reason.is_some() && !is_complete {
            return Err(HakoniwaError::validation(
                "runtime: completion_reason set on an incomplete session",
            ));
        }
        Ok(Self {
            turn_index,
            last_actor,
            pending_action,
            is_complete,
            completion_reason,
        })
    }

    /// Moves the cursor past a generated turn.
    pub fn advance(&mut self, next_turn_index: u32, last_actor: impl Into<String>) {
        self.turn_index = next_turn_index;
        self.last_actor = Some(last_actor.into());
        self.pending_action = None;
    }

    pub fn set_pending_action(&mut self, action: Option<String>) {
        self.pending_action = action;
    }

    /// Marks the session complete.
    pub fn complete(&mut self, reason: impl Into<String>) {
        self.is_complete = true;
        self.completion_reason = Some(reason.into());
        self.pending_action = None;
    }

    /// Next turn index to generate.
    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    pub fn last_actor(&self) -> Option<&str> {
        self.last_actor.as_deref()
    }

    pub fn pending_action(&self) -> Option<&str> {
        self.pending_action.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn completion_reason(&self) -> Option<&str> {
        self.completion_reason.as_deref()
    }
}
