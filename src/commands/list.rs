use anyhow::Result;
use serde::Serialize;
use touhou_calendar_core::ics::event_uid;
use touhou_calendar_core::{DayRecord, Settings};

use super::load_records;
use crate::render::Render;

/// One record as printed by `list --json`.
#[derive(Serialize)]
struct ListedDay<'a> {
    uid: String,
    date: String,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    characters: &'a [String],
}

impl<'a> ListedDay<'a> {
    fn new(record: &'a DayRecord, uid_domain: &str) -> Self {
        ListedDay {
            uid: event_uid(record, uid_domain),
            date: format!("{:02}-{:02}", record.month, record.day),
            title: &record.title,
            description: record.description(),
            characters: &record.characters,
        }
    }
}

pub fn run(settings: &Settings, json: bool) -> Result<()> {
    let records = load_records(settings)?;

    if json {
        println!("{}", render_json(&records, &settings.calendar.uid_domain)?);
    } else {
        for record in &records {
            println!("{}", record.render());
        }
    }

    Ok(())
}

fn render_json(records: &[DayRecord], uid_domain: &str) -> Result<String> {
    let listed: Vec<ListedDay> = records
        .iter()
        .map(|record| ListedDay::new(record, uid_domain))
        .collect();
    Ok(serde_json::to_string_pretty(&listed)?)
}
