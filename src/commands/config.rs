use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;
use touhou_calendar_core::settings::CONFIG_FILE_NAME;
use touhou_calendar_core::Settings;

pub fn show(settings: &Settings, config_path: Option<&Path>) -> Result<()> {
    let path = config_file(config_path);

    println!("{}", "Paths".bold());
    if path.exists() {
        println!("  Config:  {}", path.display());
    } else {
        println!("  Config:  {} {}", path.display(), "(not found, using defaults)".dimmed());
    }
    println!("  Days:    {}", settings.days_dir().display());
    println!("  Output:  {}", settings.output().display());
    println!();
    println!("{}", "Effective settings".bold());
    print!("{}", settings.to_toml()?);

    Ok(())
}

pub fn init(config_path: Option<&Path>) -> Result<()> {
    let path = config_file(config_path);

    if path.exists() {
        anyhow::bail!("Config file already exists at {}", path.display());
    }

    Settings::create_default_config(&path)?;
    tracing::info!(path = %path.display(), "Config file created");
    println!("{}", format!("Created {}", path.display()).green());

    Ok(())
}

fn config_file(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}
