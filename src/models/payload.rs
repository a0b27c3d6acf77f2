use serde::{Deserialize, Serialize};

use crate::models::EntityType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
}

impl Member {
    /// Identity-only member, as carried by deletes.
    pub fn with_id(id: String) -> Self {
        Self {
            id,
            name: None,
            mobile: None,
            email: None,
        }
    }
}

/// How an update changes the renew counter of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum RenewCount {
    /// `renew_count=3`
    Absolute(u32),
    /// `renew_count=renew_count+1`
    Increment(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub book_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub renew_count: Option<RenewCount>,
    /// Epoch millis of the line that issued or renewed the book.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub issued_at: Option<i64>,
}

impl Issue {
    pub fn with_book_id(book_id: String) -> Self {
        Self {
            book_id,
            member_id: None,
            renew_count: None,
            issued_at: None,
        }
    }
}

/// Mail server settings. A delete carries none of the fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailServerInfo {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    #[serde(rename = "useTLS", skip_serializing_if = "Option::is_none", default)]
    pub use_tls: Option<bool>,
}

/// Entity-specific payload of an operation. The variant is the entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entityType", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Payload {
    Book(Book),
    Member(Member),
    Issue(Issue),
    MailServerInfo(MailServerInfo),
}

impl Payload {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Payload::Book(_) => EntityType::Book,
            Payload::Member(_) => EntityType::Member,
            Payload::Issue(_) => EntityType::Issue,
            Payload::MailServerInfo(_) => EntityType::MailServerInfo,
        }
    }
}
