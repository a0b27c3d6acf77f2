use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use tracing::debug;

use crate::error::ConvertError;
use crate::models::{
    Book, EntityType, Issue, MailServerInfo, Member, OperationType, Payload, RenewCount,
};
use crate::parsing::classifier::Classification;
use crate::parsing::regex::{RE_ASSIGNMENT, RE_RENEW_INCREMENT, RE_VALUES};

/// Extracts the entity fields of a classified statement.
///
/// Inserts map the `VALUES(...)` list positionally onto the entity's fields.
/// Updates and deletes look up `KEY='VALUE'` (or `KEY=value`) assignments by
/// name, so absent optional keys just leave the field unset.
pub fn build_payload(
    statement: &str,
    classification: Classification,
    timestamp: i64,
) -> Result<Payload, ConvertError> {
    let Classification {
        operation_type,
        entity_type,
    } = classification;
    let malformed = |reason: String| ConvertError::MalformedParameterList {
        operation: operation_type,
        entity: entity_type,
        reason,
    };

    let built = match operation_type {
        OperationType::Insert => {
            let values = parse_values_list(statement).map_err(malformed)?;
            build_insert(entity_type, &values, timestamp).map(Some)
        }
        OperationType::Update => {
            build_update(entity_type, &Assignments::parse(statement), timestamp)
        }
        OperationType::Delete => {
            build_delete(entity_type, &Assignments::parse(statement)).map(Some)
        }
    };

    match built.map_err(malformed)? {
        Some(payload) => Ok(payload),
        None => Err(ConvertError::UnsupportedEntityOperation {
            operation: operation_type,
            entity: entity_type,
        }),
    }
}

fn build_insert(
    entity_type: EntityType,
    values: &[Option<String>],
    timestamp: i64,
) -> Result<Payload, String> {
    match entity_type {
        EntityType::Book => match values {
            [id, title, author, publisher] => Ok(Payload::Book(Book {
                id: required(id, "id")?,
                title: title.clone(),
                author: author.clone(),
                publisher: publisher.clone(),
                is_available: Some(false),
            })),
            [id, title, author, publisher, available] => Ok(Payload::Book(Book {
                id: required(id, "id")?,
                title: title.clone(),
                author: author.clone(),
                publisher: publisher.clone(),
                is_available: Some(flag(available.as_deref())),
            })),
            _ => Err(field_count("4 or 5", values.len())),
        },
        EntityType::Member => match values {
            [id, name, mobile, email] => Ok(Payload::Member(Member {
                id: required(id, "id")?,
                name: name.clone(),
                mobile: mobile.clone(),
                email: email.clone(),
            })),
            _ => Err(field_count("4", values.len())),
        },
        EntityType::Issue => match values {
            [book_id, member_id] => Ok(Payload::Issue(Issue {
                book_id: required(book_id, "bookId")?,
                member_id: member_id.clone(),
                renew_count: Some(RenewCount::Absolute(0)),
                issued_at: Some(timestamp),
            })),
            _ => Err(field_count("2", values.len())),
        },
        EntityType::MailServerInfo => match values {
            [host, port, username, password, use_tls] => {
                let port = port
                    .as_deref()
                    .unwrap_or_default()
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| format!("invalid port {:?}: {}", port, e))?;
                Ok(Payload::MailServerInfo(MailServerInfo {
                    host: Some(required(host, "host")?),
                    port: Some(port),
                    username: username.clone(),
                    password: password.clone(),
                    use_tls: Some(flag(use_tls.as_deref())),
                }))
            }
            _ => Err(field_count("5", values.len())),
        },
    }
}

/// `None` for entities that never receive updates.
fn build_update(
    entity_type: EntityType,
    fields: &Assignments,
    timestamp: i64,
) -> Result<Option<Payload>, String> {
    let payload = match entity_type {
        EntityType::Book => Payload::Book(Book {
            id: fields.required("ID")?,
            title: fields.get("TITLE"),
            author: fields.get("AUTHOR"),
            publisher: fields.get("PUBLISHER"),
            is_available: fields.get("ISAVAIL").map(|v| flag(Some(v.as_str()))),
        }),
        EntityType::Member => Payload::Member(Member {
            id: fields.required("ID")?,
            name: fields.get("NAME"),
            mobile: fields.get("MOBILE"),
            email: fields.get("EMAIL"),
        }),
        EntityType::Issue => Payload::Issue(Issue {
            book_id: fields.required("BOOKID")?,
            member_id: fields.get("MEMBERID"),
            renew_count: fields.get("RENEW_COUNT").and_then(|v| parse_renew_count(&v)),
            issued_at: Some(timestamp),
        }),
        EntityType::MailServerInfo => return Ok(None),
    };
    Ok(Some(payload))
}

fn build_delete(entity_type: EntityType, fields: &Assignments) -> Result<Payload, String> {
    Ok(match entity_type {
        EntityType::Book => Payload::Book(Book {
            id: fields.required("ID")?,
            title: fields.get("TITLE"),
            author: fields.get("AUTHOR"),
            publisher: fields.get("PUBLISHER"),
            is_available: None,
        }),
        EntityType::Member => Payload::Member(Member::with_id(fields.required("ID")?)),
        EntityType::Issue => Payload::Issue(Issue::with_book_id(fields.required("BOOKID")?)),
        EntityType::MailServerInfo => Payload::MailServerInfo(MailServerInfo::default()),
    })
}

fn required(value: &Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.clone()),
        _ => Err(format!("missing {}", field)),
    }
}

fn flag(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some(v) if v == "1" || v.eq_ignore_ascii_case("true"))
}

fn field_count(expected: &str, found: usize) -> String {
    format!("expected {} values, found {}", expected, found)
}

fn parse_renew_count(value: &str) -> Option<RenewCount> {
    if let Ok(count) = value.parse::<u32>() {
        return Some(RenewCount::Absolute(count));
    }
    if let Some(caps) = RE_RENEW_INCREMENT.captures(value) {
        if let Ok(step) = caps["step"].parse::<u32>() {
            return Some(RenewCount::Increment(step));
        }
    }
    debug!(value, "unrecognized renew_count expression");
    None
}

/// Named assignments found anywhere in an UPDATE or DELETE statement.
/// Keys are upper-cased; the first occurrence of a key wins.
struct Assignments(HashMap<String, String>);

impl Assignments {
    fn parse(statement: &str) -> Self {
        let mut fields = HashMap::new();
        for caps in RE_ASSIGNMENT.captures_iter(statement) {
            let value = match (caps.name("quoted"), caps.name("bare")) {
                (Some(quoted), _) => quoted.as_str().replace("''", "'"),
                (None, Some(bare)) => bare.as_str().to_string(),
                (None, None) => continue,
            };
            fields.entry(caps["key"].to_ascii_uppercase()).or_insert(value);
        }
        Assignments(fields)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn required(&self, key: &str) -> Result<String, String> {
        required(&self.get(key), key)
    }
}

/// Tokenizes the `VALUES(...)` list of an INSERT. Quoted values may contain
/// commas, parentheses and doubled quotes; a bare `NULL` becomes `None`.
pub fn parse_values_list(statement: &str) -> Result<Vec<Option<String>>, String> {
    let start = RE_VALUES
        .find(statement)
        .ok_or_else(|| "no VALUES(...) list".to_string())?
        .end();
    let mut chars = statement[start..].chars().peekable();
    let mut values = Vec::new();

    loop {
        skip_whitespace(&mut chars);
        match chars.peek() {
            Some(')') if values.is_empty() => {
                chars.next();
                return Ok(values);
            }
            Some('\'') => {
                chars.next();
                values.push(Some(read_quoted(&mut chars)?));
            }
            Some(_) => {
                let bare = read_bare(&mut chars);
                if bare.eq_ignore_ascii_case("NULL") {
                    values.push(None);
                } else {
                    values.push(Some(bare));
                }
            }
            None => return Err("unterminated VALUES list".to_string()),
        }

        skip_whitespace(&mut chars);
        match chars.next() {
            Some(',') => continue,
            Some(')') => return Ok(values),
            Some(c) => return Err(format!("unexpected '{}' in VALUES list", c)),
            None => return Err("unterminated VALUES list".to_string()),
        }
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String, String> {
    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.next_if_eq(&'\'').is_some() {
                value.push('\'');
            } else {
                return Ok(value);
            }
        } else {
            value.push(c);
        }
    }
    Err("unterminated quoted value".to_string())
}

fn read_bare(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut value = String::new();
    while let Some(c) = chars.next_if(|c| *c != ',' && *c != ')') {
        value.push(c);
    }
    value.trim().to_string()
}
