//! Generate config command

use anyhow::{Result, bail};
use colored::Colorize;
use std::path::Path;

use crate::config::AppConfig;

pub const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

/// Write a sample configuration file with every default filled in
pub fn generate_config(output_path: Option<&str>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or(DEFAULT_SAMPLE_PATH);

    if Path::new(path).exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path);
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, AppConfig::generate_sample_config())?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Set auth.access_token_secret and auth.refresh_token_secret before deploying".yellow()
    );
    Ok(())
}
