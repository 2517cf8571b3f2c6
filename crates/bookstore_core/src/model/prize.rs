//! Prize record.
//!
//! # Invariants
//! - A prize references at most one author through `author_id`.
//! - The author's prize collection is the set of prizes whose `author_id`
//!   points at that author, so both sides change in one write.

use crate::model::author::AuthorId;
use crate::model::validation::{require_non_blank, EntityValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned prize identifier.
pub type PrizeId = i64;

/// Persisted prize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub id: PrizeId,
    pub name: String,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub premiation_date: Option<i64>,
    /// Nullable single-valued association to the awarded author.
    pub author_id: Option<AuthorId>,
}

impl Prize {
    pub fn has_author(&self) -> bool {
        self.author_id.is_some()
    }
}

/// Prize fields before the store assigns an id.
///
/// New prizes are always created without an author; linking goes through
/// the prize/author use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrize {
    pub name: String,
    pub description: Option<String>,
    pub premiation_date: Option<i64>,
}

impl NewPrize {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_non_blank("prize", "name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{NewPrize, Prize};

    #[test]
    fn blank_name_is_rejected() {
        assert!(NewPrize::new("  ").validate().is_err());
        assert!(NewPrize::new("Nobel").validate().is_ok());
    }

    #[test]
    fn unlinked_prize_serializes_null_author() {
        let prize = Prize {
            id: 3,
            name: "Premio Planeta".to_string(),
            description: None,
            premiation_date: Some(0),
            author_id: None,
        };
        assert!(!prize.has_author());

        let json = serde_json::to_value(&prize).unwrap();
        assert!(json["author_id"].is_null());

        let back: Prize = serde_json::from_value(json).unwrap();
        assert_eq!(back, prize);
    }
}
