use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What to do with a line whose parameter list cannot be mapped to a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Skip the line, record a diagnostic and keep going.
    #[default]
    Lenient,
    /// Abort the whole batch on the first malformed parameter list.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Literal that separates log metadata from the SQL statement
    pub marker: String,
    /// chrono format of the timestamp that precedes the bracketed context
    pub timestamp_format: String,
    pub parse_mode: ParseMode,
    /// Poll interval of follow mode, in milliseconds
    pub follow_poll_ms: u64,
    pub log_level: String,
    pub publish: PublishSettings,
    pub kafka: KafkaSettings,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            marker: "jdbc.sqlonly - ".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S,%3f".to_string(),
            parse_mode: ParseMode::Lenient,
            follow_poll_ms: 250,
            log_level: "info".to_string(),
            publish: PublishSettings::default(),
            kafka: KafkaSettings::default(),
        }
    }
}

impl RelaySettings {
    pub fn follow_poll_interval(&self) -> Duration {
        Duration::from_millis(self.follow_poll_ms.max(10))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    /// How long to wait for a delivery acknowledgment; `None` waits forever
    pub ack_timeout_ms: Option<u64>,
    /// Extra attempts for one operation after a failure or timeout
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// First message key; defaults to the current epoch millis
    pub key_start: Option<i64>,
    pub flush_timeout_ms: u64,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            ack_timeout_ms: Some(10_000),
            max_retries: 0,
            retry_backoff_ms: 100,
            key_start: None,
            flush_timeout_ms: 5_000,
        }
    }
}

impl PublishSettings {
    pub fn ack_timeout(&self) -> Option<Duration> {
        self.ack_timeout_ms.map(Duration::from_millis)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaSettings {
    pub bootstrap_servers: String,
    pub topic: String,
    pub client_id: String,
    /// Additional client properties passed through untouched
    pub extra: HashMap<String, String>,
}

impl Default for KafkaSettings {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:9092".to_string(),
            topic: "library-operations".to_string(),
            client_id: "oplog-relay".to_string(),
            extra: HashMap::new(),
        }
    }
}
