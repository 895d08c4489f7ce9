//! TurnRecord: one confirmed turn of the conversation.

use crate::error::{HakoniwaError, Result};
use chrono::{DateTime, Utc};

/// Record of a single turn in the conversation.
///
/// This is the confirmed past. A `WorldState` only ever appends these and
/// exposes them read-only, so a record is never rewritten once in history.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    turn_index: u32,
    speaker: String,
    response: String,
    thought: Option<String>,
    retry_count: u32,
    give_up: bool,
    evaluation_score: Option<f64>,
    created_at: DateTime<Utc>,
}

impl TurnRecord {
    /// Creates a turn stamped with the current time.
    pub fn new(
        turn_index: u32,
        speaker: impl Into<String>,
        response: impl Into<String>,
    ) -> Result<Self> {
        let speaker = speaker.into();
        if speaker.trim().is_empty() {
            return Err(HakoniwaError::validation(format!(
                "turn {}: speaker must not be empty",
                turn_index
            )));
        }

        Ok(Self {
            turn_index,
            speaker,
            response: response.into(),
            thought: None,
            retry_count: 0,
            give_up: false,
            evaluation_score: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = Some(thought.into());
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_give_up(mut self, give_up: bool) -> Self {
        self.give_up = give_up;
        self
    }

    /// Attaches an evaluation score, which must lie in [0, 1].
    pub fn with_evaluation_score(mut self, score: f64) -> Result<Self> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(HakoniwaError::validation(format!(
                "turn {}: evaluation_score must be within [0, 1], got {}",
                self.turn_index, score
            )));
        }
        self.evaluation_score = Some(score);
        Ok(self)
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn thought(&self) -> Option<&str> {
        self.thought.as_deref()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn give_up(&self) -> bool {
        self.give_up
    }

    pub fn evaluation_score(&self) -> Option<f64> {
        self.evaluation_score
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_defaults() {
        let turn = TurnRecord::new(0, "やな", "おはよう").unwrap();
        assert_eq!(turn.turn_index(), 0);
        assert_eq!(turn.retry_count(), 0);
        assert!(!turn.give_up());
        assert!(turn.thought().is_none());
        assert!(turn.evaluation_score().is_none());
    }

    #[test]
    fn test_empty_speaker_rejected() {
        assert!(TurnRecord::new(0, "", "text").is_err());
    }

    #[test]
    fn test_score_bounds() {
        let turn = TurnRecord::new(1, "あゆ", "はい").unwrap();
        assert!(turn.clone().with_evaluation_score(0.0).is_ok());
        assert!(turn.clone().with_evaluation_score(1.0).is_ok());
        assert!(turn.clone().with_evaluation_score(1.01).is_err());
        assert!(turn.clone().with_evaluation_score(-0.1).is_err());
        assert!(turn.with_evaluation_score(f64::NAN).is_err());
    }
}
