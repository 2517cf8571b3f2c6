//! Book record.
//!
//! # Invariants
//! - `isbn` holds 10 or 13 digits once separators are stripped; ISBN-10
//!   may end with `X`.

use crate::model::validation::{require_non_blank, EntityValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{9}[\dXx]|\d{13})$").expect("valid isbn regex"));

/// Store-assigned book identifier.
pub type BookId = i64;

/// Persisted book.
///
/// The author set lives in the `book_authors` join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub isbn: String,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Unix epoch milliseconds.
    pub publishing_date: Option<i64>,
}

/// Book fields before the store assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub name: String,
    pub isbn: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub publishing_date: Option<i64>,
}

impl NewBook {
    pub fn new(name: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isbn: isbn.into(),
            ..Self::default()
        }
    }

    /// Rejects drafts with a blank name or a malformed ISBN.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_blank("book", "name", &self.name)?;
        if !is_valid_isbn(&self.isbn) {
            return Err(EntityValidationError::InvalidIsbn(self.isbn.clone()));
        }
        Ok(())
    }
}

/// Checks ISBN shape, ignoring hyphen and space separators.
pub fn is_valid_isbn(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|ch| *ch != '-' && !ch.is_whitespace())
        .collect();
    ISBN_RE.is_match(&compact)
}
