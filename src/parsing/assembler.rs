use tracing::{debug, trace, warn};

use crate::error::{ConvertError, RelayError};
use crate::models::{Operation, ParseMode, RelaySettings};
use crate::parsing::classifier::classify_statement;
use crate::parsing::entity_builder::build_payload;
use crate::parsing::line_parser::parse_log_line;

/// A line that produced no operation, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub error: ConvertError,
}

/// Result of converting a batch: operations in source order plus the
/// diagnostics of every dropped line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub operations: Vec<Operation>,
    pub skipped: Vec<SkippedLine>,
}

impl Conversion {
    /// Skips that are faults rather than documented no-ops.
    pub fn diagnostics(&self) -> impl Iterator<Item = &SkippedLine> {
        self.skipped.iter().filter(|s| !s.error.is_silent())
    }
}

/// Turns raw `jdbc.sqlonly` log lines into operations.
#[derive(Debug, Clone)]
pub struct LogConverter {
    marker: String,
    timestamp_format: String,
    parse_mode: ParseMode,
}

impl Default for LogConverter {
    fn default() -> Self {
        Self::new(&RelaySettings::default())
    }
}

impl LogConverter {
    pub fn new(settings: &RelaySettings) -> Self {
        Self {
            marker: settings.marker.clone(),
            timestamp_format: settings.timestamp_format.clone(),
            parse_mode: settings.parse_mode,
        }
    }

    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    /// Runs one line through parse, classify and build.
    pub fn convert_line(&self, line: &str) -> Result<Operation, ConvertError> {
        let parsed = parse_log_line(line, &self.marker, &self.timestamp_format)?;
        let classification = classify_statement(parsed.statement)?;
        let timestamp = parsed.timestamp_or_zero();
        let payload = build_payload(parsed.statement, classification, timestamp)?;
        Ok(Operation::new(timestamp, classification.operation_type, payload))
    }

    /// Records a dropped line: logs it and hands back the diagnostic, or
    /// fails when strict mode makes the error fatal.
    pub fn skip(&self, line_no: usize, error: ConvertError) -> Result<SkippedLine, RelayError> {
        if self.is_fatal(&error) {
            return Err(RelayError::Convert {
                line: line_no,
                source: error,
            });
        }
        log_skip(line_no, &error);
        Ok(SkippedLine {
            line: line_no,
            error,
        })
    }

    /// Converts a batch of lines, keeping the relative order of the lines
    /// that produced an operation.
    pub fn convert_logs<I, S>(&self, lines: I) -> Result<Conversion, RelayError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut conversion = Conversion::default();
        for (index, line) in lines.into_iter().enumerate() {
            let line_no = index + 1;
            match self.convert_line(line.as_ref()) {
                Ok(operation) => conversion.operations.push(operation),
                Err(error) => conversion.skipped.push(self.skip(line_no, error)?),
            }
        }

        debug!(
            operations = conversion.operations.len(),
            skipped = conversion.skipped.len(),
            "converted log batch"
        );
        Ok(conversion)
    }

    fn is_fatal(&self, error: &ConvertError) -> bool {
        self.parse_mode == ParseMode::Strict
            && matches!(error, ConvertError::MalformedParameterList { .. })
    }
}

fn log_skip(line_no: usize, error: &ConvertError) {
    match error {
        ConvertError::MalformedParameterList { .. } => {
            warn!(line = line_no, %error, "skipping line")
        }
        ConvertError::MalformedLogLine => debug!(line = line_no, %error, "skipping line"),
        _ => trace!(line = line_no, %error, "dropping line"),
    }
}
