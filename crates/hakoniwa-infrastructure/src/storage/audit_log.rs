//! JSON Lines audit sink for matcher decisions.

use hakoniwa_core::error::{HakoniwaError, Result};
use hakoniwa_core::matcher::{AuditLogEntry, AuditSink};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditSink {
    /// Creates the sink, creating the parent directory if needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditSink {
    fn append(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Reads an audit log back. A missing file is an empty log; blank lines are skipped.
pub fn load_audit_log(path: &Path) -> Result<Vec<AuditLogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str::<AuditLogEntry>(line).map_err(HakoniwaError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hakoniwa_core::matcher::{AdoptionStatus, FuzzyMatcher, MatcherExt};
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_matcher_writes_jsonl() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("audit.jsonl");
        let sink = Arc::new(JsonlAuditSink::new(&log_path).unwrap());
        let matcher = FuzzyMatcher::default().with_audit_sink(sink);

        let world: BTreeSet<String> = ["冷蔵庫", "テレビ"].iter().map(|s| s.to_string()).collect();
        matcher.match_query("冷蔵庫", &world);
        matcher.match_query("電子レンジ", &world);

        let entries = load_audit_log(&log_path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].input_query(), "冷蔵庫");
        assert_eq!(entries[0].status(), AdoptionStatus::AutoAdopted);
        assert_eq!(entries[1].status(), AdoptionStatus::Rejected);
        assert_eq!(entries[1].world_objects(), ["テレビ", "冷蔵庫"]);
    }

    #[test]
    fn test_load_missing_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let entries = load_audit_log(&temp_dir.path().join("none.jsonl")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.jsonl");
        let sink = JsonlAuditSink::new(&log_path).unwrap();
        let matcher = FuzzyMatcher::default().with_audit_sink(Arc::new(sink));
        matcher.match_query("x", &BTreeSet::new());

        let mut content = fs::read_to_string(&log_path).unwrap();
        content.push_str("\n\n");
        fs::write(&log_path, content).unwrap();

        assert_eq!(load_audit_log(&log_path).unwrap().len(), 1);
    }
}
