pub mod broker;
pub mod json_lines;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod publisher;

pub use broker::{AckSender, Acknowledgment, Broker, PendingAck};
pub use json_lines::JsonLinesBroker;
#[cfg(feature = "kafka")]
pub use kafka::KafkaBroker;
pub use publisher::{PublishReport, Publisher};
