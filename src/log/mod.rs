pub mod reader;
pub mod watcher;

pub use reader::{LogChunk, LogFollower, TrailingLine, read_log_file};
pub use watcher::{RelaySummary, follow_log_file, process_full_log_file};
