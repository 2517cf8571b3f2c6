//! Author record.

use crate::model::validation::{require_non_blank, EntityValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned author identifier.
pub type AuthorId = i64;

/// Persisted author.
///
/// The author's books and prizes are relationship collections resolved
/// through the repositories, not fields of this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    /// Unix epoch milliseconds.
    pub birth_date: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Author fields before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Rejects drafts with a blank name.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_blank("author", "name", &self.name)
    }
}
