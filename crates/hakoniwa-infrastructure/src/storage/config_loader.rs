//! Config file loading, validation and the health summary shown by `up`.

use crate::codec::compute_hash;
use hakoniwa_core::config::HakoniwaConfig;
use hakoniwa_core::error::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hakoniwa.toml";

/// Loads configuration from a TOML file.
///
/// A missing path, a missing file or an empty file yields the defaults.
/// Keys absent from the file take their default values.
pub fn load_config(path: Option<&Path>) -> Result<HakoniwaConfig> {
    let Some(path) = path else {
        return Ok(HakoniwaConfig::default());
    };
    if !path.exists() {
        tracing::debug!("Config file {:?} not found, using defaults", path);
        return Ok(HakoniwaConfig::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HakoniwaConfig::default());
    }

    let config: HakoniwaConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Outcome of `validate_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub errors: Vec<String>,
}

impl ConfigReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a config file without failing.
///
/// Unlike `load_config`, a missing file is an error here.
pub fn validate_config(path: &Path) -> ConfigReport {
    let mut report = ConfigReport::default();

    if !path.exists() {
        report
            .errors
            .push(format!("Config file not found: {}", path.display()));
        return report;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            report.errors.push(format!("Failed to read config: {}", e));
            return report;
        }
    };

    match toml::from_str::<HakoniwaConfig>(&content) {
        Ok(config) => report.errors.extend(config.problems()),
        Err(e) => report
            .errors
            .push(format!("Invalid config: {}", e.message())),
    }

    if !report.is_valid() {
        tracing::warn!(
            "Config {} has {} problem(s)",
            path.display(),
            report.errors.len()
        );
    }
    report
}

/// Short content hash of a config: the first 12 hex chars of the SHA-256 of
/// its compact JSON rendering with sorted keys.
pub fn config_hash(config: &HakoniwaConfig) -> Result<String> {
    let tree = serde_json::to_value(config)?;
    let compact = serde_json::to_string(&tree)?;
    let mut hash = compute_hash(compact.as_bytes());
    hash.truncate(12);
    Ok(hash)
}

/// Informational summary printed by `hakoniwa up`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthSummary {
    pub status: String,
    pub config_hash: String,
    pub llm_backend: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub max_turns: u32,
    pub max_retries: u32,
    pub results_dir: String,
}

pub fn health_summary(config: &HakoniwaConfig) -> Result<HealthSummary> {
    Ok(HealthSummary {
        status: "OK".to_string(),
        config_hash: config_hash(config)?,
        llm_backend: config.llm_backend.clone(),
        llm_model: config.llm_model.clone(),
        llm_base_url: config.llm_base_url.clone(),
        max_turns: config.max_turns,
        max_retries: config.max_retries,
        results_dir: config.results_dir.clone(),
    })
}
