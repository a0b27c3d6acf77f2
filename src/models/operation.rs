use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Insert,
    Update,
    Delete,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "INSERT",
            OperationType::Update => "UPDATE",
            OperationType::Delete => "DELETE",
        }
    }
}

impl FromStr for OperationType {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "INSERT" => Ok(OperationType::Insert),
            "UPDATE" => Ok(OperationType::Update),
            "DELETE" => Ok(OperationType::Delete),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Book,
    Member,
    Issue,
    MailServerInfo,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Book => "BOOK",
            EntityType::Member => "MEMBER",
            EntityType::Issue => "ISSUE",
            EntityType::MailServerInfo => "MAIL_SERVER_INFO",
        }
    }
}

impl FromStr for EntityType {
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "BOOK" => Ok(EntityType::Book),
            "MEMBER" => Ok(EntityType::Member),
            "ISSUE" => Ok(EntityType::Issue),
            "MAIL_SERVER_INFO" => Ok(EntityType::MailServerInfo),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed change event. Fields are private so an assembled operation
/// cannot be altered; the entity type is always read off the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    timestamp: i64,
    operation_type: OperationType,
    #[serde(flatten)]
    payload: Payload,
}

impl Operation {
    pub fn new(timestamp: i64, operation_type: OperationType, payload: Payload) -> Self {
        Self {
            timestamp,
            operation_type,
            payload,
        }
    }

    /// Epoch millis of the source line, 0 when it could not be parsed.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    pub fn entity_type(&self) -> EntityType {
        self.payload.entity_type()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}
