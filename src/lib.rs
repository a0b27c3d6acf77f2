//! Turns `jdbc.sqlonly` audit-log lines into typed change operations and
//! publishes them, in order, to a message broker.

pub mod error;
pub mod log;
pub mod models;
pub mod parsing;
pub mod publish;
pub mod utils;

pub use error::{ConvertError, PublishError, RelayError};
pub use log::{RelaySummary, TrailingLine, follow_log_file, process_full_log_file};
pub use models::{EntityType, Operation, OperationType, Payload, RelaySettings};
pub use parsing::{Conversion, LogConverter};
pub use publish::{Broker, JsonLinesBroker, Publisher};
