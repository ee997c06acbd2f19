//! Stable event UIDs.

use sha2::{Digest, Sha256};

use crate::day_record::DayRecord;

/// Derive the UID of a record's event.
///
/// The UID is the first 16 hex digits of SHA256 over `MM-DD-title`, followed
/// by `@domain`. It depends only on the date and title, so calendar apps keep
/// the same event across rebuilds even when the description changes.
pub fn event_uid(record: &DayRecord, domain: &str) -> String {
    let key = format!("{:02}-{:02}-{}", record.month, record.day, record.title);

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let hash = hex::encode(hasher.finalize());

    format!("{}@{}", &hash[..16], domain)
}
