use std::io;

use crate::models::{EntityType, OperationType};

/// Why a log line produced no operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("marker token not found in log line")]
    MalformedLogLine,

    #[error("unrecognized operation token '{0}'")]
    UnrecognizedOperationToken(String),

    #[error("unrecognized entity type '{0}'")]
    UnrecognizedEntityType(String),

    #[error("{operation} is not supported for {entity}")]
    UnsupportedEntityOperation {
        operation: OperationType,
        entity: EntityType,
    },

    #[error("malformed parameter list for {operation} {entity}: {reason}")]
    MalformedParameterList {
        operation: OperationType,
        entity: EntityType,
        reason: String,
    },
}

impl ConvertError {
    /// Drops that are documented policy rather than faults.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            ConvertError::UnrecognizedOperationToken(_)
                | ConvertError::UnrecognizedEntityType(_)
                | ConvertError::UnsupportedEntityOperation { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("broker rejected key {key}: {reason}")]
    Failure { key: i64, reason: String },

    #[error("no acknowledgment for key {key} within {timeout_ms} ms")]
    Timeout { key: i64, timeout_ms: u128 },

    #[error("flush failed: {0}")]
    Flush(String),

    #[error("failed to encode operation: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PublishError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PublishError::Failure { .. } | PublishError::Timeout { .. })
    }
}

/// Top-level error of a relay run.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("line {line}: {source}")]
    Convert {
        line: usize,
        #[source]
        source: ConvertError,
    },

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("broker setup failed: {0}")]
    Broker(String),
}
