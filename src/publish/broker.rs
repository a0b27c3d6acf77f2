use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use crate::error::PublishError;

/// Broker-side confirmation that a record was durably accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment {
    pub partition: i32,
    pub offset: i64,
}

type DeliveryResult = Result<Acknowledgment, String>;

/// Completes a [`PendingAck`]. Dropping it without completing counts as a
/// delivery failure.
#[derive(Debug)]
pub struct AckSender(mpsc::SyncSender<DeliveryResult>);

impl AckSender {
    pub fn acknowledge(self, ack: Acknowledgment) {
        // The waiting side may already have timed out.
        let _ = self.0.send(Ok(ack));
    }

    pub fn fail(self, reason: impl Into<String>) {
        let _ = self.0.send(Err(reason.into()));
    }
}

/// Handle on one in-flight record.
#[derive(Debug)]
pub struct PendingAck {
    key: i64,
    rx: mpsc::Receiver<DeliveryResult>,
}

impl PendingAck {
    pub fn channel(key: i64) -> (AckSender, PendingAck) {
        let (tx, rx) = mpsc::sync_channel(1);
        (AckSender(tx), PendingAck { key, rx })
    }

    /// An acknowledgment that is already complete.
    pub fn ready(key: i64, ack: Acknowledgment) -> PendingAck {
        let (tx, pending) = PendingAck::channel(key);
        tx.acknowledge(ack);
        pending
    }

    /// Blocks until the broker acknowledges or rejects the record, or until
    /// `timeout` elapses. `None` waits forever.
    pub fn wait(self, timeout: Option<Duration>) -> Result<Acknowledgment, PublishError> {
        let received = match timeout {
            Some(limit) => match self.rx.recv_timeout(limit) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(PublishError::Timeout {
                        key: self.key,
                        timeout_ms: limit.as_millis(),
                    });
                }
                Err(RecvTimeoutError::Disconnected) => Err("delivery report dropped".to_string()),
            },
            None => self
                .rx
                .recv()
                .unwrap_or_else(|_| Err("delivery report dropped".to_string())),
        };
        received.map_err(|reason| PublishError::Failure {
            key: self.key,
            reason,
        })
    }
}

/// The send side of a message broker.
///
/// `send` hands one record to the broker and returns without waiting; the
/// returned [`PendingAck`] resolves once the broker reports delivery.
/// Records must reach the broker in call order.
pub trait Broker {
    fn send(&mut self, key: i64, value: &[u8]) -> Result<PendingAck, PublishError>;

    /// Waits for every outstanding record to be delivered.
    fn flush(&mut self, timeout: Duration) -> Result<(), PublishError>;

    /// Releases the connection. Called once, after `flush`.
    fn close(&mut self);
}

impl<B: Broker + ?Sized> Broker for Box<B> {
    fn send(&mut self, key: i64, value: &[u8]) -> Result<PendingAck, PublishError> {
        (**self).send(key, value)
    }

    fn flush(&mut self, timeout: Duration) -> Result<(), PublishError> {
        (**self).flush(timeout)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
