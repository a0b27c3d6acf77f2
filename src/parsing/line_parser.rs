use crate::error::ConvertError;
use crate::parsing::regex::{RE_BRACKETED, RE_TIMESTAMP_PREFIX};
use crate::utils::time::parse_timestamp;

/// A log line split into its SQL statement and best-effort timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub statement: &'a str,
    pub timestamp: Option<i64>,
}

impl ParsedLine<'_> {
    /// Timestamp as carried downstream, 0 when it could not be parsed.
    pub fn timestamp_or_zero(&self) -> i64 {
        self.timestamp.unwrap_or(0)
    }
}

pub fn parse_log_line<'a>(
    line: &'a str,
    marker: &str,
    timestamp_format: &str,
) -> Result<ParsedLine<'a>, ConvertError> {
    let (head, statement) = line.split_once(marker).ok_or(ConvertError::MalformedLogLine)?;

    let statement = statement.trim();
    if statement.is_empty() {
        return Err(ConvertError::MalformedLogLine);
    }

    Ok(ParsedLine {
        statement,
        timestamp: extract_timestamp(head, timestamp_format),
    })
}

/// Reads the text before the bracketed context token, then falls back to the
/// first bracketed token for layouts that wrap the timestamp itself.
fn extract_timestamp(head: &str, format: &str) -> Option<i64> {
    if let Some(caps) = RE_TIMESTAMP_PREFIX.captures(head) {
        if let Some(ts) = parse_timestamp(&caps["timestamp"], format) {
            return Some(ts);
        }
    }

    RE_BRACKETED
        .captures(head)
        .and_then(|caps| parse_timestamp(&caps["inner"], format))
}
