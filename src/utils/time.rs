use chrono::NaiveDateTime;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parses `text` with the chrono `format` and returns epoch millis.
/// The format carries no offset, so the wall-clock time is read as UTC.
pub fn parse_timestamp(text: &str, format: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(text.trim(), format)
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

pub fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
