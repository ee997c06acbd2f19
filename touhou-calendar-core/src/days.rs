//! Loading day records from the days directory.
//!
//! The directory holds one YAML file per month (`1.yaml` .. `12.yaml`). Each
//! file is a stream of YAML documents separated by `---`, one record per
//! document. Empty documents are ignored.

use std::path::Path;

use serde::Deserialize;

use crate::day_record::DayRecord;
use crate::error::{CalendarError, CalendarResult};

/// Load and validate every record in the days directory.
///
/// Records are sorted by month, day and title. Missing month files are skipped.
pub fn load_days_dir(dir: &Path) -> CalendarResult<Vec<DayRecord>> {
    if !dir.is_dir() {
        return Err(CalendarError::Config(format!(
            "Days directory not found: {}",
            dir.display()
        )));
    }

    let mut records = Vec::new();

    for month in 1..=12 {
        let path = dir.join(format!("{month}.yaml"));
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Month file missing, skipping");
            continue;
        }
        records.extend(load_days_file(&path)?);
    }

    sort_records(&mut records);
    tracing::debug!(count = records.len(), dir = %dir.display(), "Loaded day records");

    Ok(records)
}

/// Load and validate the records of a single YAML file, in file order.
pub fn load_days_file(path: &Path) -> CalendarResult<Vec<DayRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| CalendarError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_days(&source, &text)
}

/// Parse a multi-document YAML stream into validated records.
///
/// `source` is only used to name the offending document in errors.
pub fn parse_days(source: &str, text: &str) -> CalendarResult<Vec<DayRecord>> {
    let mut records = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let location = format!("{} document #{}", source, index + 1);

        let value = serde_yaml::Value::deserialize(document)
            .map_err(|e| CalendarError::validation(&location, e.to_string()))?;
        if value.is_null() {
            continue;
        }

        let record: DayRecord = serde_yaml::from_value(value)
            .map_err(|e| CalendarError::validation(&location, e.to_string()))?;

        record.validate().map_err(|e| match e {
            CalendarError::Validation { record, reason } => {
                CalendarError::validation(format!("{record} ({location})"), reason)
            }
            other => other,
        })?;

        records.push(record);
    }

    Ok(records)
}

/// Order records by month, day, then title. Stable for equal keys.
pub fn sort_records(records: &mut [DayRecord]) {
    records.sort_by(|a, b| {
        (a.month, a.day, &a.title).cmp(&(b.month, b.day, &b.title))
    });
}
