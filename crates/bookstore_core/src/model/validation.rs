//! Draft validation errors shared by catalog records.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for a record draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValidationError {
    /// Required text field is empty after trim.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
    /// Book ISBN does not have a 10 or 13 digit shape.
    InvalidIsbn(String),
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity}.{field} must not be blank")
            }
            Self::InvalidIsbn(value) => write!(f, "invalid isbn: `{value}`"),
        }
    }
}

impl Error for EntityValidationError {}

pub(crate) fn require_non_blank(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), EntityValidationError> {
    if value.trim().is_empty() {
        return Err(EntityValidationError::BlankField { entity, field });
    }
    Ok(())
}
