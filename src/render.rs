//! Terminal rendering for day records.
//!
//! Extension trait adding colored output to core types using owo_colors.

use owo_colors::OwoColorize;
use touhou_calendar_core::DayRecord;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DayRecord {
    fn render(&self) -> String {
        let date = format!("{:02}/{:02}", self.month, self.day);
        let mut line = format!("  {} - {}", date.dimmed(), self.title);

        if self.is_leap_day() {
            line.push_str(&format!(" {}", "(leap day)".yellow()));
        }

        line
    }
}

/// The listing printed before a build: a count line, then one line per record.
pub fn render_summary(records: &[DayRecord]) -> String {
    let mut lines = vec![format!(
        "Parsed {} {}:",
        records.len().bold(),
        pluralize("event", records.len())
    )];
    lines.push(String::new());
    lines.extend(records.iter().map(Render::render));
    lines.join("\n")
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
