use std::thread;

use tracing::{debug, error, info, warn};

use crate::error::PublishError;
use crate::models::{Operation, PublishSettings};
use crate::publish::broker::{Acknowledgment, Broker};
use crate::utils::time::current_millis;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub sent: usize,
    pub first_key: Option<i64>,
    pub last_key: Option<i64>,
}

/// Sends operations to a broker one at a time, in order.
///
/// Each operation gets the next key of a strictly increasing sequence and
/// the publisher waits for its acknowledgment before sending the next one,
/// so at most one record is ever in flight. A failed operation is retried
/// in place (up to `max_retries`) before anything after it is sent.
///
/// The broker is flushed and closed when the publisher is closed or dropped,
/// whichever comes first.
pub struct Publisher<B: Broker> {
    broker: B,
    settings: PublishSettings,
    next_key: i64,
    closed: bool,
}

impl<B: Broker> Publisher<B> {
    pub fn new(broker: B, settings: &PublishSettings) -> Self {
        Self {
            broker,
            settings: settings.clone(),
            next_key: settings.key_start.unwrap_or_else(current_millis),
            closed: false,
        }
    }

    /// Key the next operation will be sent with.
    pub fn next_key(&self) -> i64 {
        self.next_key
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Sends one operation and blocks until the broker acknowledges it.
    pub fn publish(&mut self, operation: &Operation) -> Result<Acknowledgment, PublishError> {
        let value = serde_json::to_vec(operation)?;
        let key = self.next_key;
        let ack = self.deliver(key, &value)?;
        self.next_key += 1;

        debug!(
            key,
            partition = ack.partition,
            offset = ack.offset,
            operation_type = %operation.operation_type(),
            entity_type = %operation.entity_type(),
            "operation acknowledged"
        );
        Ok(ack)
    }

    /// Publishes the whole sequence in order. The first delivery failure
    /// aborts the rest of the batch.
    pub fn publish_all<I>(&mut self, operations: I) -> Result<PublishReport, PublishError>
    where
        I: IntoIterator<Item = Operation>,
    {
        let mut report = PublishReport::default();
        for operation in operations {
            let key = self.next_key;
            self.publish(&operation)?;
            report.sent += 1;
            report.first_key.get_or_insert(key);
            report.last_key = Some(key);
        }

        info!(sent = report.sent, last_key = ?report.last_key, "published batch");
        Ok(report)
    }

    /// Flushes and closes the broker, reporting a failed flush.
    pub fn close(mut self) -> Result<(), PublishError> {
        self.release()
    }

    /// Sends `value` under `key`, resending it in place on a retryable error.
    ///
    /// A resend after [`PublishError::Timeout`] reuses the key while the
    /// first attempt may still be queued in the broker, so consumers can see
    /// the same key twice when `max_retries > 0`. Deduplicate downstream by
    /// key.
    fn deliver(&mut self, key: i64, value: &[u8]) -> Result<Acknowledgment, PublishError> {
        let timeout = self.settings.ack_timeout();
        let mut attempt = 0u32;
        loop {
            let result = self.broker.send(key, value).and_then(|pending| pending.wait(timeout));
            match result {
                Ok(ack) => return Ok(ack),
                Err(e) if e.is_retryable() && attempt < self.settings.max_retries => {
                    attempt += 1;
                    let backoff = self
                        .settings
                        .retry_backoff()
                        .saturating_mul(1 << (attempt - 1).min(10));
                    warn!(
                        key,
                        attempt,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "retrying delivery"
                    );
                    thread::sleep(backoff);
                }
                Err(e) => {
                    error!(key, error = %e, "delivery failed");
                    return Err(e);
                }
            }
        }
    }

    fn release(&mut self) -> Result<(), PublishError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let flushed = self.broker.flush(self.settings.flush_timeout());
        self.broker.close();
        debug!(next_key = self.next_key, "broker connection released");
        flushed
    }
}

impl<B: Broker> Drop for Publisher<B> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(error = %e, "flush before close failed");
        }
    }
}
