//! Storage layer: atomic file writes, config files and the audit log.

mod atomic_file;
mod audit_log;
mod config_loader;

pub use atomic_file::AtomicFile;
pub use audit_log::{JsonlAuditSink, load_audit_log};
pub use config_loader::{
    ConfigReport, DEFAULT_CONFIG_FILE, HealthSummary, config_hash, health_summary, load_config,
    validate_config,
};
