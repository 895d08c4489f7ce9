//! Session configuration model.
//!
//! The same structure is read from the user's config file and embedded in
//! every saved world state as a snapshot of the settings it was produced with.

use crate::error::{HakoniwaError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for HAKONIWA sessions.
///
/// Missing keys fall back to the defaults below; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HakoniwaConfig {
    /// LLM backend (ollama, koboldcpp)
    pub llm_backend: String,
    /// LLM model name
    pub llm_model: String,
    /// LLM API base URL
    pub llm_base_url: String,
    /// Maximum turns per session (at least 1)
    pub max_turns: u32,
    /// Maximum retries per turn
    pub max_retries: u32,
    /// Directory for session results
    pub results_dir: String,
}

impl Default for HakoniwaConfig {
    fn default() -> Self {
        Self {
            llm_backend: "ollama".to_string(),
            llm_model: "gemma3:12b".to_string(),
            llm_base_url: "http://localhost:11434".to_string(),
            max_turns: 10,
            max_retries: 3,
            results_dir: "results".to_string(),
        }
    }
}

impl HakoniwaConfig {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(HakoniwaError::config(problems.join("; ")))
        }
    }

    /// Every violated constraint, in field order.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.llm_backend.trim().is_empty() {
            problems.push("llm_backend must not be empty".to_string());
        }
        if self.max_turns < 1 {
            problems.push(format!(
                "max_turns must be at least 1, got {}",
                self.max_turns
            ));
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = HakoniwaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm_backend, "ollama");
        assert_eq!(config.max_turns, 10);
    }

    #[test]
    fn test_zero_max_turns_rejected() {
        let config = HakoniwaConfig {
            max_turns: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_problems_reports_every_violation() {
        let config = HakoniwaConfig {
            llm_backend: " ".to_string(),
            max_turns: 0,
            ..Default::default()
        };
        assert_eq!(config.problems().len(), 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HakoniwaConfig =
            serde_json::from_str(r#"{"llm_model": "qwen2.5:14b"}"#).unwrap();
        assert_eq!(config.llm_model, "qwen2.5:14b");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: std::result::Result<HakoniwaConfig, _> =
            serde_json::from_str(r#"{"temperature": 0.7}"#);
        assert!(result.is_err());
    }
}
