//! Day records: one celebrated day of the year.
//!
//! A record names a month and day without a year. Records are read from the
//! YAML files in the days directory and turned into yearly all-day events.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

/// Year every record is anchored to. Must be a leap year so Feb 29 exists.
pub const REFERENCE_YEAR: i32 = 2024;

/// A celebrated day of the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub month: u32,
    pub day: u32,

    /// Event title. The data files spell this `name`.
    #[serde(rename = "name", alias = "title")]
    pub title: String,

    /// Explicit description. When absent, one is composed from the other fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    /// Shorter explanation preferred over `explanation` in the calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_short: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub characters: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

/// Where a day comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DayRecord {
    pub fn new(month: u32, day: u32, title: impl Into<String>) -> Self {
        DayRecord {
            month,
            day,
            title: title.into(),
            description: None,
            message: None,
            explanation: None,
            explanation_short: None,
            characters: Vec::new(),
            citations: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check that the record can become a calendar event.
    pub fn validate(&self) -> CalendarResult<()> {
        if self.title.trim().is_empty() {
            return Err(CalendarError::validation(self.label(), "title must not be empty"));
        }
        self.date().map(|_| ())
    }

    /// The record's date in [`REFERENCE_YEAR`].
    pub fn date(&self) -> CalendarResult<NaiveDate> {
        if !(1..=12).contains(&self.month) {
            return Err(CalendarError::validation(
                self.label(),
                format!("month {} is out of range (1-12)", self.month),
            ));
        }

        NaiveDate::from_ymd_opt(REFERENCE_YEAR, self.month, self.day).ok_or_else(|| {
            CalendarError::validation(
                self.label(),
                format!("day {} does not exist in month {}", self.day, self.month),
            )
        })
    }

    pub fn is_leap_day(&self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// Description shown in the calendar, if any.
    ///
    /// An explicit `description` is used as is. Otherwise the message, the
    /// (short) explanation and the character list are joined by blank lines.
    pub fn description(&self) -> Option<String> {
        if let Some(ref desc) = self.description {
            let desc = desc.trim();
            return (!desc.is_empty()).then(|| desc.to_string());
        }

        let characters = (!self.characters.is_empty())
            .then(|| format!("Characters: {}", self.characters.join(", ")));

        let parts: Vec<&str> = [
            self.message.as_deref(),
            self.explanation_short
                .as_deref()
                .or(self.explanation.as_deref()),
            characters.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }

    /// Short human-readable identification used in errors and logs.
    pub fn label(&self) -> String {
        format!("{:02}/{:02} \"{}\"", self.month, self.day, self.title)
    }
}

impl fmt::Display for DayRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}/{:02} - {}", self.month, self.day, self.title)
    }
}
