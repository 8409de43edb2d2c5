//! Sample configuration generation

use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::{Result, ShortLinkError};

pub fn generate_config(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if std::path::Path::new(&path).exists() && !force {
        return Err(ShortLinkError::config(format!(
            "{} already exists, use --force to overwrite",
            path
        )));
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| ShortLinkError::config(format!("Failed to write {}: {}", path, e)))?;

    println!(
        "{} Sample configuration written to {}",
        "✓".bold().green(),
        path.cyan()
    );
    Ok(())
}
