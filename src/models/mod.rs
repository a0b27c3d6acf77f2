pub mod operation;
pub mod payload;
pub mod settings;

pub use operation::{EntityType, Operation, OperationType};
pub use payload::{Book, Issue, MailServerInfo, Member, Payload, RenewCount};
pub use settings::{KafkaSettings, ParseMode, PublishSettings, RelaySettings};
