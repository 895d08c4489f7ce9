use anyhow::{Context, Result};
use colored::Colorize;
use hakoniwa_infrastructure::{health_summary, load_config};
use std::io::Write;
use std::path::Path;

/// `hakoniwa up`
pub fn run(config_path: &Path, json: bool, out: &mut dyn Write) -> Result<()> {
    let config = load_config(Some(config_path))
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let summary = health_summary(&config)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    writeln!(out, "{}", format!("HAKONIWA {}", summary.status).green().bold())?;
    writeln!(out, "  config_hash: {}", summary.config_hash)?;
    writeln!(
        out,
        "  llm:         {} / {} ({})",
        summary.llm_backend, summary.llm_model, summary.llm_base_url
    )?;
    writeln!(out, "  max_turns:   {}", summary.max_turns)?;
    writeln!(out, "  max_retries: {}", summary.max_retries)?;
    writeln!(out, "  results_dir: {}", summary.results_dir)?;
    Ok(())
}
