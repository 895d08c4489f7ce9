use anyhow::Result;
use colored::Colorize;
use hakoniwa_core::error::ValidationIssue;
use hakoniwa_infrastructure::{load_dry_run, load_world_state};
use std::io::Write;
use std::path::Path;

/// `hakoniwa load PATH --dry-run`
pub fn dry_run(path: &Path, out: &mut dyn Write) -> Result<bool> {
    let report = load_dry_run(path);

    if report.is_valid() {
        writeln!(out, "{} {}", "✓ Valid:".green(), path.display())?;
    } else {
        writeln!(out, "{} {}", "✗ Invalid:".red(), path.display())?;
        write_issues(report.errors(), out)?;
    }
    Ok(report.is_valid())
}

/// `hakoniwa load PATH`
pub fn load(path: &Path, out: &mut dyn Write) -> Result<bool> {
    let state = match load_world_state(path) {
        Ok(state) => state,
        Err(e) if e.validation_kind().is_some() => {
            writeln!(out, "{} {}", "✗ Failed to load:".red(), path.display())?;
            write_issues(e.issues(), out)?;
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let manifest = state.manifest();
    writeln!(out, "{} {}", "✓ Loaded:".green(), path.display())?;
    writeln!(out, "  session_id:     {}", manifest.session_id())?;
    writeln!(out, "  schema_version: {}", manifest.schema_version())?;
    writeln!(out, "  scenario_id:    {}", state.scenario_id())?;
    writeln!(out, "  turn_count:     {}", state.turn_count())?;
    writeln!(out, "  created_at:     {}", manifest.created_at().to_rfc3339())?;
    match manifest.modified_at() {
        Some(ts) => writeln!(out, "  modified_at:    {}", ts.to_rfc3339())?,
        None => writeln!(out, "  modified_at:    -")?,
    }
    Ok(true)
}

fn write_issues(issues: &[ValidationIssue], out: &mut dyn Write) -> Result<()> {
    for issue in issues {
        writeln!(out, "  - {}", issue)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hakoniwa_core::config::HakoniwaConfig;
    use hakoniwa_core::world::{Manifest, TurnRecord, WorldState};
    use hakoniwa_infrastructure::save_world_state;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn save_mystery_mansion(dir: &TempDir) -> PathBuf {
        let mut state =
            WorldState::new(Manifest::new(""), "mystery_mansion", HakoniwaConfig::default())
                .unwrap();
        state
            .append_turn(TurnRecord::new(0, "やな", "この館、何かおかしい").unwrap())
            .unwrap();
        state
            .append_turn(TurnRecord::new(1, "あゆ", "時計が止まっていますね").unwrap())
            .unwrap();

        let path = dir.path().join("world_state.json");
        save_world_state(&state, &path).unwrap();
        path
    }

    #[test]
    fn test_dry_run_valid_then_corrupted() {
        let temp_dir = TempDir::new().unwrap();
        let path = save_mystery_mansion(&temp_dir);

        let mut out = Vec::new();
        assert!(dry_run(&path, &mut out).unwrap());

        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replacen("やな", "やだ", 1)).unwrap();

        let mut out = Vec::new();
        assert!(!dry_run(&path, &mut out).unwrap());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("IntegrityError: Hash mismatch"));
        assert!(printed.contains("Detail: File content was modified after save"));
    }

    #[test]
    fn test_load_prints_summary() {
        let temp_dir = TempDir::new().unwrap();
        let path = save_mystery_mansion(&temp_dir);

        let mut out = Vec::new();
        assert!(load(&path, &mut out).unwrap());

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("scenario_id:    mystery_mansion"));
        assert!(printed.contains("turn_count:     2"));
        assert!(printed.contains("schema_version: 1.0.0"));
    }

    #[test]
    fn test_load_missing_file_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        assert!(!load(&temp_dir.path().join("nope.json"), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("FileNotFound"));
    }
}
