use crate::error::ConvertError;
use crate::models::{EntityType, OperationType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub operation_type: OperationType,
    pub entity_type: EntityType,
}

/// Reads the operation from the first token and the entity from the token
/// position that operation puts it in:
///
/// - `INSERT INTO BOOK(...)`: third token, before the parenthesis
/// - `UPDATE BOOK SET ...`: second token
/// - `DELETE FROM BOOK WHERE ...`: third token
pub fn classify_statement(statement: &str) -> Result<Classification, ConvertError> {
    let mut tokens = statement.split_whitespace();
    let first = tokens.next().unwrap_or_default();

    let operation_type: OperationType = first
        .parse()
        .map_err(|_| ConvertError::UnrecognizedOperationToken(first.to_string()))?;

    let entity_token = match operation_type {
        OperationType::Insert => tokens
            .nth(1)
            .map(|token| token.split('(').next().unwrap_or_default()),
        OperationType::Update => tokens.next(),
        OperationType::Delete => tokens.nth(1),
    }
    .unwrap_or_default();

    let entity_type: EntityType = entity_token
        .parse()
        .map_err(|_| ConvertError::UnrecognizedEntityType(entity_token.to_string()))?;

    Ok(Classification {
        operation_type,
        entity_type,
    })
}
