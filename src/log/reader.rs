use std::fs;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::warn;

/// Lines read from a log file and the byte offset reading stopped at.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogChunk {
    pub lines: Vec<String>,
    pub end_position: u64,
}

/// What a read does with a last line that has no newline yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingLine {
    /// The file is final; an unterminated last line is still a line.
    Include,
    /// The file may still grow; stop reading after the last newline.
    HoldBack,
}

/// Reads the whole file. Invalid UTF-8 is replaced rather than rejected.
pub fn read_log_file(path: &Path, trailing: TrailingLine) -> io::Result<LogChunk> {
    let file_content = fs::read(path)?;
    let complete = match trailing {
        TrailingLine::Include => file_content.len(),
        TrailingLine::HoldBack => complete_len(&file_content),
    };

    Ok(LogChunk {
        lines: decode_lines(&file_content[..complete]),
        end_position: complete as u64,
    })
}

/// Length of the prefix that ends with the last newline.
fn complete_len(bytes: &[u8]) -> usize {
    bytes.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1)
}

// A newline byte never occurs inside a multibyte UTF-8 sequence, so cutting
// at one before decoding cannot split a character.
fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes).lines().map(str::to_string).collect()
}

/// Tails a growing log file, handing out only complete lines in file order.
#[derive(Debug)]
pub struct LogFollower {
    path: PathBuf,
    position: u64,
    partial: Vec<u8>,
}

impl LogFollower {
    pub fn new(path: impl Into<PathBuf>, position: u64) -> Self {
        Self {
            path: path.into(),
            position,
            partial: Vec::new(),
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads whatever was appended since the last poll. A trailing line
    /// without its newline is held back until the rest of it arrives.
    pub fn poll(&mut self) -> io::Result<Vec<String>> {
        let current_size = fs::metadata(&self.path)?.len();
        if current_size < self.position {
            warn!(
                path = %self.path.display(),
                previous = self.position,
                current = current_size,
                "log file shrank, reading from the start"
            );
            self.position = 0;
            self.partial.clear();
        }
        if current_size == self.position {
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(fs::File::open(&self.path)?);
        reader.seek(SeekFrom::Start(self.position))?;
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.position += buffer.len() as u64;
        self.partial.extend_from_slice(&buffer);

        let complete = complete_len(&self.partial);
        let remainder = self.partial.split_off(complete);
        let complete = std::mem::replace(&mut self.partial, remainder);

        Ok(decode_lines(&complete))
    }
}
