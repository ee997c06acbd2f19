use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use touhou_calendar_core::{Converter, Settings};

use super::load_records;
use crate::render::render_summary;

pub fn run(settings: &Settings) -> Result<()> {
    let records = load_records(settings)?;

    println!("{}", render_summary(&records));
    println!();

    let document = Converter::new(settings.calendar.clone())
        .convert(&records)
        .context("Failed to generate calendar")?;

    let output = settings.output();
    write_atomically(&output, document.as_str())?;

    tracing::info!(
        path = %output.display(),
        events = document.event_count(),
        "Calendar written"
    );

    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.display().to_string());

    println!(
        "{}",
        format!("Written {} with {} events.", file_name, document.event_count()).green()
    );

    Ok(())
}

/// Write through a temp file in the target directory, then rename into place.
/// A failed write never leaves a truncated calendar behind.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
