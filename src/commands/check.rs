use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use touhou_calendar_core::{Converter, Settings};

use super::load_records;
use crate::render::pluralize;

/// Load and convert everything, but keep the result in memory.
pub fn run(settings: &Settings) -> Result<()> {
    let records = load_records(settings)?;

    let document = Converter::new(settings.calendar.clone())
        .convert(&records)
        .context("Day records are invalid")?;

    let leap_days = records.iter().filter(|r| r.is_leap_day()).count();
    if leap_days > 0 {
        tracing::info!(count = leap_days, policy = ?settings.calendar.leap_day, "Leap day records");
    }

    println!(
        "{}",
        format!(
            "  {} {} valid",
            document.event_count(),
            pluralize("event", document.event_count())
        )
        .green()
    );

    Ok(())
}
