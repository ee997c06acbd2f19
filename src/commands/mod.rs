pub mod build;
pub mod check;
pub mod config;
pub mod list;

use anyhow::{Context, Result};
use touhou_calendar_core::days::load_days_dir;
use touhou_calendar_core::{DayRecord, Settings};

/// Load every record from the configured days directory.
fn load_records(settings: &Settings) -> Result<Vec<DayRecord>> {
    let days_dir = settings.days_dir();
    load_days_dir(&days_dir)
        .with_context(|| format!("Failed to load day records from {}", days_dir.display()))
}
