//! Core of the Touhou calendar.
//!
//! - `day_record`: the celebrated days and their validation
//! - `days`: loading records from the per-month YAML files
//! - `ics`: turning records into a subscribable .ics calendar
//! - `settings`: layered configuration for a build

pub mod day_record;
pub mod days;
pub mod error;
pub mod ics;
pub mod settings;

pub use day_record::DayRecord;
pub use error::{CalendarError, CalendarResult};
pub use ics::{CalendarDocument, Converter};
pub use settings::{CalendarSettings, LeapDayPolicy, Settings};
