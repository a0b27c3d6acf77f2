use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::RelayError;
use crate::log::reader::{LogFollower, TrailingLine, read_log_file};
use crate::parsing::LogConverter;
use crate::publish::{Broker, Publisher};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelaySummary {
    pub lines: usize,
    pub published: usize,
    pub skipped: usize,
    pub diagnostics: usize,
    /// Byte offset the file was read up to
    pub end_position: u64,
}

/// Converts every line of the file and publishes the resulting operations
/// in order. Pass [`TrailingLine::HoldBack`] when the file is followed
/// afterwards, so `end_position` is where the follower picks up.
pub fn process_full_log_file<B: Broker>(
    file_path: &Path,
    trailing: TrailingLine,
    converter: &LogConverter,
    publisher: &mut Publisher<B>,
) -> Result<RelaySummary, RelayError> {
    let chunk = read_log_file(file_path, trailing)?;
    let conversion = converter.convert_logs(&chunk.lines)?;

    let summary = RelaySummary {
        lines: chunk.lines.len(),
        published: conversion.operations.len(),
        skipped: conversion.skipped.len(),
        diagnostics: conversion.diagnostics().count(),
        end_position: chunk.end_position,
    };
    publisher.publish_all(conversion.operations)?;

    info!(
        path = %file_path.display(),
        lines = summary.lines,
        published = summary.published,
        skipped = summary.skipped,
        diagnostics = summary.diagnostics,
        "processed log file"
    );
    Ok(summary)
}

/// Follows the file from `start_position`, publishing each new operation
/// before the next line is read. Returns once `stop` is set, after the
/// in-flight publish completes.
pub fn follow_log_file<B: Broker>(
    file_path: &Path,
    start_position: u64,
    first_line_no: usize,
    converter: &LogConverter,
    publisher: &mut Publisher<B>,
    poll_interval: Duration,
    stop: &AtomicBool,
) -> Result<RelaySummary, RelayError> {
    let mut follower = LogFollower::new(file_path, start_position);
    let mut summary = RelaySummary::default();
    let mut line_no = first_line_no;

    info!(path = %file_path.display(), position = start_position, "following log file");

    while !stop.load(Ordering::Relaxed) {
        let lines = match follower.poll() {
            Ok(lines) => lines,
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "error reading log file");
                Vec::new()
            }
        };

        for line in lines {
            line_no += 1;
            summary.lines += 1;
            match converter.convert_line(&line) {
                Ok(operation) => {
                    publisher.publish(&operation)?;
                    summary.published += 1;
                }
                Err(error) => {
                    let skipped = converter.skip(line_no, error)?;
                    summary.skipped += 1;
                    if !skipped.error.is_silent() {
                        summary.diagnostics += 1;
                    }
                }
            }
        }

        summary.end_position = follower.position();
        thread::sleep(poll_interval);
    }

    Ok(summary)
}
