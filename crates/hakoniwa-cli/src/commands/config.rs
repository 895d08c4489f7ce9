use anyhow::Result;
use colored::Colorize;
use hakoniwa_infrastructure::validate_config;
use std::io::Write;
use std::path::Path;

/// `hakoniwa config validate`
pub fn validate(path: &Path, out: &mut dyn Write) -> Result<bool> {
    let report = validate_config(path);

    if report.is_valid() {
        writeln!(out, "{} ({})", "✓ Config OK".green(), path.display())?;
    } else {
        writeln!(out, "{}", "✗ Config Invalid".red())?;
        for error in &report.errors {
            writeln!(out, "  - {}", error)?;
        }
    }
    Ok(report.is_valid())
}
