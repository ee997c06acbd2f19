//! ICS generation.
//!
//! Day records become yearly, all-day, transparent VEVENTs inside a single
//! VCALENDAR, following RFC 5545.

mod generate;
mod uid;

pub use generate::{CalendarDocument, Converter};
pub use uid::event_uid;
