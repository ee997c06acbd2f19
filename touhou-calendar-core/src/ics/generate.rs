//! Calendar document generation.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use icalendar::{Calendar, Component, Property, ValueType};

use crate::day_record::{DayRecord, REFERENCE_YEAR};
use crate::error::{CalendarError, CalendarResult};
use crate::ics::uid::event_uid;
use crate::settings::{CalendarSettings, LeapDayPolicy};

/// DTSTAMP for every event. Fixed so rebuilding from the same data yields the
/// same bytes.
const DTSTAMP: &str = "20240101T000000Z";

/// A generated calendar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDocument {
    content: String,
    event_count: usize,
}

impl CalendarDocument {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn into_string(self) -> String {
        self.content
    }

    /// Content lines without their CRLF terminators. Folded continuation
    /// lines are returned as separate lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }
}

impl fmt::Display for CalendarDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Turns day records into a calendar of yearly all-day events.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    settings: CalendarSettings,
}

impl Converter {
    pub fn new(settings: CalendarSettings) -> Self {
        Converter { settings }
    }

    /// Generate the calendar for `records`, one event per record in input order.
    ///
    /// Fails on the first invalid record, or when two records would share a
    /// UID. Nothing is returned in that case.
    pub fn convert(&self, records: &[DayRecord]) -> CalendarResult<CalendarDocument> {
        self.settings.validate()?;

        let mut cal = Calendar::new();
        cal.append_property(Property::new("METHOD", "PUBLISH"));
        cal.append_property(Property::new("X-WR-CALNAME", self.settings.name.as_str()));

        let mut seen_uids: HashMap<String, String> = HashMap::with_capacity(records.len());

        for record in records {
            record.validate()?;

            let uid = event_uid(record, &self.settings.uid_domain);
            if let Some(first) = seen_uids.get(&uid) {
                return Err(CalendarError::validation(
                    record.label(),
                    format!("duplicates {first} (same month, day and title)"),
                ));
            }
            seen_uids.insert(uid.clone(), record.label());

            cal.push(self.build_event(record, &uid)?);
        }

        let cal = cal.done();
        let content = self.rewrite_header(&cal.to_string());

        tracing::debug!(events = records.len(), bytes = content.len(), "Generated calendar");

        Ok(CalendarDocument {
            content,
            event_count: records.len(),
        })
    }

    fn build_event(&self, record: &DayRecord, uid: &str) -> CalendarResult<icalendar::Event> {
        let date = self.event_date(record)?;

        let mut ics_event = icalendar::Event::new();
        ics_event.uid(uid);
        ics_event.add_property("DTSTAMP", DTSTAMP);

        let mut dtstart = Property::new("DTSTART", date.format("%Y%m%d").to_string());
        dtstart.append_parameter(ValueType::Date);
        ics_event.append_property(dtstart);

        ics_event.summary(&record.title);
        if let Some(desc) = record.description() {
            ics_event.description(&desc);
        }

        // No COUNT or UNTIL: the day repeats forever
        ics_event.add_property("RRULE", "FREQ=YEARLY");
        // Celebrations never block time
        ics_event.add_property("TRANSP", "TRANSPARENT");

        Ok(ics_event.done())
    }

    fn event_date(&self, record: &DayRecord) -> CalendarResult<NaiveDate> {
        if record.is_leap_day() && self.settings.leap_day == LeapDayPolicy::ShiftToFeb28 {
            tracing::debug!(record = %record.label(), "Shifting leap day to Feb 28");
            return NaiveDate::from_ymd_opt(REFERENCE_YEAR, 2, 28).ok_or_else(|| {
                CalendarError::IcsGenerate("Feb 28 missing from reference year".into())
            });
        }
        record.date()
    }

    /// Replace the icalendar crate's PRODID with ours and pin CALSCALE right
    /// after it, so the header is the same whatever the crate defaults are.
    fn rewrite_header(&self, ics: &str) -> String {
        let mut result = String::with_capacity(ics.len() + 64);

        for line in ics.lines() {
            if line.starts_with("PRODID:") {
                result.push_str("PRODID:");
                result.push_str(&self.settings.prodid);
                result.push_str("\r\nCALSCALE:GREGORIAN\r\n");
                continue;
            }

            if line.starts_with("CALSCALE:") {
                continue;
            }

            result.push_str(line);
            result.push_str("\r\n");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reimu() -> DayRecord {
        DayRecord::new(5, 14, "Reimu Hakurei Day")
    }

    fn sample_records() -> Vec<DayRecord> {
        vec![
            reimu(),
            DayRecord::new(9, 9, "Cirno Day").with_description("Baka"),
            DayRecord::new(2, 29, "Miyako Day"),
        ]
    }

    fn event_sections(doc: &CalendarDocument) -> Vec<String> {
        doc.as_str()
            .split("BEGIN:VEVENT")
            .skip(1)
            .map(|s| s.split("END:VEVENT").next().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_one_event_per_record() {
        let doc = Converter::default().convert(&sample_records()).unwrap();
        assert_eq!(doc.event_count(), 3);
        assert_eq!(doc.lines().filter(|l| *l == "BEGIN:VEVENT").count(), 3);
        assert_eq!(doc.lines().filter(|l| *l == "END:VEVENT").count(), 3);
    }

    #[test]
    fn test_empty_input_is_header_and_footer_only() {
        let doc = Converter::default().convert(&[]).unwrap();
        assert_eq!(doc.event_count(), 0);
        assert!(!doc.as_str().contains("BEGIN:VEVENT"));
        assert!(doc.as_str().starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(doc.as_str().ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let converter = Converter::default();
        let first = converter.convert(&sample_records()).unwrap();
        let second = converter.convert(&sample_records()).unwrap();
        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_header() {
        let doc = Converter::default().convert(&[reimu()]).unwrap();
        let header: Vec<&str> = doc.lines().take_while(|l| *l != "BEGIN:VEVENT").collect();

        assert_eq!(header[0], "BEGIN:VCALENDAR");
        assert!(header.contains(&"VERSION:2.0"));
        assert!(header.contains(&"PRODID:-//Touhou Calendar//Touhou Calendar//EN"));
        assert!(header.contains(&"CALSCALE:GREGORIAN"));
        assert!(header.contains(&"METHOD:PUBLISH"));
        assert!(header.contains(&"X-WR-CALNAME:Touhou Calendar"));
        assert_eq!(
            header.iter().filter(|l| l.starts_with("PRODID:")).count(),
            1,
            "Header:\n{:?}",
            header
        );
        assert_eq!(header.iter().filter(|l| l.starts_with("CALSCALE:")).count(), 1);
    }

    #[test]
    fn test_custom_calendar_settings() {
        let settings = CalendarSettings {
            name: "Gensokyo Days".to_string(),
            prodid: "-//Example//Days//EN".to_string(),
            uid_domain: "example.org".to_string(),
            leap_day: LeapDayPolicy::LeapYearsOnly,
        };
        let doc = Converter::new(settings).convert(&[reimu()]).unwrap();

        assert!(doc.as_str().contains("X-WR-CALNAME:Gensokyo Days\r\n"));
        assert!(doc.as_str().contains("PRODID:-//Example//Days//EN\r\n"));
        assert!(doc.as_str().contains("UID:d4bc560d7d678fcf@example.org\r\n"));
    }

    #[test]
    fn test_yearly_all_day_event() {
        let doc = Converter::default().convert(&[reimu()]).unwrap();
        let event = &event_sections(&doc)[0];

        assert!(event.contains("\r\nSUMMARY:Reimu Hakurei Day\r\n"), "Event:\n{}", event);
        assert!(event.contains("\r\nDTSTART;VALUE=DATE:20240514\r\n"), "Event:\n{}", event);
        assert!(event.contains("\r\nRRULE:FREQ=YEARLY\r\n"), "Event:\n{}", event);
        assert!(event.contains("\r\nTRANSP:TRANSPARENT\r\n"), "Event:\n{}", event);
        assert!(event.contains("\r\nUID:d4bc560d7d678fcf@touhou-calendar\r\n"));
        assert!(event.contains("\r\nDTSTAMP:20240101T000000Z\r\n"));

        // No year bound and no explicit end
        assert!(!event.contains("UNTIL"), "Event:\n{}", event);
        assert!(!event.contains("COUNT"), "Event:\n{}", event);
        assert!(!event.contains("DTEND"), "Event:\n{}", event);
        assert!(!event.contains("DESCRIPTION"), "Event:\n{}", event);
    }

    #[test]
    fn test_description_is_emitted() {
        let doc = Converter::default()
            .convert(&[DayRecord::new(9, 9, "Cirno Day").with_description("Baka")])
            .unwrap();
        assert!(doc.as_str().contains("\r\nDESCRIPTION:Baka\r\n"));
    }

    #[test]
    fn test_preserves_input_order() {
        let records = vec![
            DayRecord::new(12, 1, "Last"),
            DayRecord::new(1, 1, "First"),
            DayRecord::new(6, 6, "Middle"),
        ];
        let doc = Converter::default().convert(&records).unwrap();
        let summaries: Vec<&str> = doc
            .lines()
            .filter_map(|l| l.strip_prefix("SUMMARY:"))
            .collect();
        assert_eq!(summaries, vec!["Last", "First", "Middle"]);
    }

    #[test]
    fn test_uids_are_unique() {
        let doc = Converter::default().convert(&sample_records()).unwrap();
        let mut uids: Vec<&str> = doc.lines().filter(|l| l.starts_with("UID:")).collect();
        let total = uids.len();
        uids.sort();
        uids.dedup();
        assert_eq!(uids.len(), total);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_duplicate_record_rejected() {
        let records = vec![reimu(), DayRecord::new(1, 1, "Other"), reimu()];
        let err = Converter::default().convert(&records).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("duplicates"), "Got: {}", err);
    }

    #[test]
    fn test_invalid_record_aborts_conversion() {
        let records = vec![reimu(), DayRecord::new(13, 1, "X")];
        let err = Converter::default().convert(&records).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("13/01 \"X\""), "Got: {}", err);
    }

    #[test]
    fn test_leap_day_kept_by_default() {
        let doc = Converter::default()
            .convert(&[DayRecord::new(2, 29, "Miyako Day")])
            .unwrap();
        assert!(doc.as_str().contains("DTSTART;VALUE=DATE:20240229\r\n"));
    }

    #[test]
    fn test_leap_day_shifted_to_feb_28() {
        let settings = CalendarSettings {
            leap_day: LeapDayPolicy::ShiftToFeb28,
            ..CalendarSettings::default()
        };
        let doc = Converter::new(settings)
            .convert(&[DayRecord::new(2, 29, "Miyako Day")])
            .unwrap();
        assert!(doc.as_str().contains("DTSTART;VALUE=DATE:20240228\r\n"));
        // UID still follows the recorded date
        assert!(doc.as_str().contains("UID:1246b52e625d9167@touhou-calendar\r\n"));
    }

    #[test]
    fn test_every_line_is_crlf_terminated() {
        let doc = Converter::default().convert(&sample_records()).unwrap();
        assert!(doc.as_str().ends_with("END:VCALENDAR\r\n"));
        assert_eq!(
            doc.as_str().matches('\n').count(),
            doc.as_str().matches("\r\n").count()
        );
    }

    #[test]
    fn test_text_values_are_escaped() {
        let doc = Converter::default()
            .convert(&[DayRecord::new(9, 9, "Cirno, the; strongest\\fairy")])
            .unwrap();
        assert!(
            doc.as_str().contains("\r\nSUMMARY:Cirno\\, the\\; strongest\\\\fairy\r\n"),
            "ICS:\n{}",
            doc
        );
    }

    #[test]
    fn test_composed_description_is_escaped_and_folded() {
        let mut record = DayRecord::new(9, 9, "Cirno Day");
        record.message = Some("Happy Cirno Day!".to_string());
        record.explanation = Some(
            "Cirno is often called \"⑨\", so the ninth day of the ninth month belongs \
             to the strongest fairy of the Misty Lake, café regulars included."
                .to_string(),
        );
        record.characters = vec!["Cirno".to_string(), "Daiyousei".to_string()];

        let doc = Converter::default().convert(&[record]).unwrap();

        for line in doc.as_str().split("\r\n") {
            assert!(line.len() <= 75, "Line longer than 75 octets: {:?}", line);
        }

        let unfolded = doc.as_str().replace("\r\n ", "");
        let description = unfolded
            .lines()
            .find(|l| l.starts_with("DESCRIPTION:"))
            .expect("Should have DESCRIPTION line");

        assert!(
            description.starts_with("DESCRIPTION:Happy Cirno Day!\\n\\nCirno is often called \"⑨\"\\, so"),
            "Got: {}",
            description
        );
        assert!(description.contains("café regulars included."), "Got: {}", description);
        assert!(
            description.ends_with("\\n\\nCharacters: Cirno\\, Daiyousei"),
            "Got: {}",
            description
        );
        assert!(
            doc.as_str().lines().filter(|l| l.starts_with(' ')).count() > 0,
            "Long description should be folded"
        );
    }

    #[test]
    fn test_prodid_with_line_break_rejected() {
        let settings = CalendarSettings {
            prodid: "-//Broken\r\nX-INJECTED:1//EN".to_string(),
            ..CalendarSettings::default()
        };
        let err = Converter::new(settings).convert(&[reimu()]).unwrap_err();
        assert!(matches!(err, CalendarError::Config(_)), "Got: {}", err);
    }
}
