//! Settings for a calendar build.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML config file,
//! then `TOUHOU_CALENDAR__*` environment variables (`__` separates nested keys,
//! e.g. `TOUHOU_CALENDAR__CALENDAR__NAME`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

/// Config file looked up in the working directory when none is given.
pub const CONFIG_FILE_NAME: &str = "touhou-calendar.toml";

static DEFAULT_DAYS_DIR: &str = "days";
static DEFAULT_OUTPUT: &str = "touhou_calendar.ics";
static DEFAULT_CALENDAR_NAME: &str = "Touhou Calendar";
static DEFAULT_PRODID: &str = "-//Touhou Calendar//Touhou Calendar//EN";
static DEFAULT_UID_DOMAIN: &str = "touhou-calendar";

/// PRODID is written verbatim, so it has to fit on one unfolded line.
const MAX_PRODID_LEN: usize = 75 - "PRODID:".len();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding `1.yaml` .. `12.yaml`
    pub days_dir: PathBuf,

    /// Where the generated .ics file is written
    pub output: PathBuf,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,

    pub calendar: CalendarSettings,
}

/// Header values and conversion options for the generated calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// X-WR-CALNAME shown by calendar apps
    pub name: String,
    pub prodid: String,
    /// Right-hand side of every event UID
    pub uid_domain: String,
    pub leap_day: LeapDayPolicy,
}

/// How Feb 29 records are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeapDayPolicy {
    /// Keep Feb 29; the yearly rule only fires in leap years.
    #[default]
    #[serde(rename = "leap-years-only")]
    LeapYearsOnly,
    /// Move the day to Feb 28 so it shows up every year.
    #[serde(rename = "shift-to-feb-28")]
    ShiftToFeb28,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            days_dir: PathBuf::from(DEFAULT_DAYS_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            log_level: "info".to_string(),
            calendar: CalendarSettings::default(),
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            name: DEFAULT_CALENDAR_NAME.to_string(),
            prodid: DEFAULT_PRODID.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
            leap_day: LeapDayPolicy::default(),
        }
    }
}

impl CalendarSettings {
    /// Reject header values that would break the generated file.
    pub fn validate(&self) -> CalendarResult<()> {
        if self.uid_domain.trim().is_empty() {
            return Err(CalendarError::Config("calendar.uid_domain must not be empty".into()));
        }
        if self.prodid.trim().is_empty() {
            return Err(CalendarError::Config("calendar.prodid must not be empty".into()));
        }
        if self.prodid.chars().any(char::is_control) {
            return Err(CalendarError::Config(
                "calendar.prodid must not contain control characters".into(),
            ));
        }
        if self.prodid.len() > MAX_PRODID_LEN {
            return Err(CalendarError::Config(format!(
                "calendar.prodid is longer than {MAX_PRODID_LEN} bytes"
            )));
        }
        if self.name.chars().any(char::is_control) || self.uid_domain.chars().any(char::is_control) {
            return Err(CalendarError::Config(
                "calendar.name and calendar.uid_domain must not contain control characters".into(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from `path`, or from `touhou-calendar.toml` if it exists.
    ///
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> CalendarResult<Self> {
        let file = match path {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::from(PathBuf::from(CONFIG_FILE_NAME)).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("TOUHOU_CALENDAR").separator("__"))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> CalendarResult<()> {
        self.calendar.validate()
    }

    /// Days directory with `~` expanded.
    pub fn days_dir(&self) -> PathBuf {
        expand_tilde(&self.days_dir)
    }

    /// Output path with `~` expanded.
    pub fn output(&self) -> PathBuf {
        expand_tilde(&self.output)
    }

    pub fn to_toml(&self) -> CalendarResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# touhou-calendar configuration

# Directory with one YAML file per month (1.yaml .. 12.yaml):
# days_dir = \"{DEFAULT_DAYS_DIR}\"

# Where the calendar file is written:
# output = \"{DEFAULT_OUTPUT}\"

# Log filter used when RUST_LOG is not set:
# log_level = \"info\"

[calendar]
# name = \"{DEFAULT_CALENDAR_NAME}\"
# prodid = \"{DEFAULT_PRODID}\"
# uid_domain = \"{DEFAULT_UID_DOMAIN}\"

# Feb 29 handling: \"leap-years-only\" or \"shift-to-feb-28\"
# leap_day = \"leap-years-only\"
"
        );

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
