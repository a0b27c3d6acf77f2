use std::io::Write;
use std::time::Duration;

use crate::error::PublishError;
use crate::publish::broker::{Acknowledgment, Broker, PendingAck};

/// Writes each record as `<key>\t<value>\n` to any writer and acknowledges
/// it once the line is written. Offsets count records from zero.
pub struct JsonLinesBroker<W: Write> {
    writer: W,
    next_offset: i64,
    closed: bool,
}

impl<W: Write> JsonLinesBroker<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_offset: 0,
            closed: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> Broker for JsonLinesBroker<W> {
    fn send(&mut self, key: i64, value: &[u8]) -> Result<PendingAck, PublishError> {
        if self.closed {
            return Err(PublishError::Failure {
                key,
                reason: "sink is closed".to_string(),
            });
        }

        let written = write!(self.writer, "{}\t", key)
            .and_then(|_| self.writer.write_all(value))
            .and_then(|_| self.writer.write_all(b"\n"));
        if let Err(e) = written {
            return Err(PublishError::Failure {
                key,
                reason: e.to_string(),
            });
        }

        let ack = Acknowledgment {
            partition: 0,
            offset: self.next_offset,
        };
        self.next_offset += 1;
        Ok(PendingAck::ready(key, ack))
    }

    fn flush(&mut self, _timeout: Duration) -> Result<(), PublishError> {
        self.writer.flush().map_err(|e| PublishError::Flush(e.to_string()))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
