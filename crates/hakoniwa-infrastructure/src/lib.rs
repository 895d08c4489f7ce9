//! File-backed adapters for HAKONIWA: canonical codec, world-state
//! persistence, config files and the JSONL audit log.

pub mod codec;
pub mod dto;
pub mod persistence;
pub mod storage;

pub use persistence::{
    DryRunReport, hash_path, load_dry_run, load_world_state, save_world_state,
};
pub use storage::{
    HealthSummary, JsonlAuditSink, config_hash, health_summary, load_audit_log, load_config,
    validate_config,
};
