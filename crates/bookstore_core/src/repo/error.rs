use crate::db::DbError;
use crate::model::author::AuthorId;
use crate::model::book::BookId;
use crate::model::prize::PrizeId;
use crate::model::validation::EntityValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies one catalog record in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Author(AuthorId),
    Book(BookId),
    Prize(PrizeId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Author(id) => write!(f, "author {id}"),
            Self::Book(id) => write!(f, "book {id}"),
            Self::Prize(id) => write!(f, "prize {id}"),
        }
    }
}

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntityValidationError),
    Db(DbError),
    /// Write targeted a record that does not exist.
    NotFound(EntityRef),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<EntityValidationError> for RepoError {
    fn from(value: EntityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
