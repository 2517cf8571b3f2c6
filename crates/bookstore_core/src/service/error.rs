use crate::db::DbError;
use crate::model::author::AuthorId;
use crate::model::book::BookId;
use crate::model::prize::PrizeId;
use crate::repo::{EntityRef, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coarse error classes surfaced to callers of association use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced record (or a required link) does not exist.
    NotFound,
    /// Both records exist but the requested association does not.
    IllegalOperation,
    /// Persistence failure below the use-case layer.
    Storage,
}

/// Error from book/author and prize/author use-cases.
///
/// Every error aborts the operation's transaction.
#[derive(Debug)]
pub enum AssociationError {
    AuthorNotFound(AuthorId),
    BookNotFound(BookId),
    PrizeNotFound(PrizeId),
    /// Prize exists but has no author linked.
    PrizeWithoutAuthor(PrizeId),
    /// Book and author both exist but are not linked.
    AuthorNotInBook { book_id: BookId, author_id: AuthorId },
    Repo(RepoError),
}

impl AssociationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthorNotFound(_)
            | Self::BookNotFound(_)
            | Self::PrizeNotFound(_)
            | Self::PrizeWithoutAuthor(_) => ErrorKind::NotFound,
            Self::AuthorNotInBook { .. } => ErrorKind::IllegalOperation,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthorNotFound(_) => "author_not_found",
            Self::BookNotFound(_) => "book_not_found",
            Self::PrizeNotFound(_) => "prize_not_found",
            Self::PrizeWithoutAuthor(_) => "prize_without_author",
            Self::AuthorNotInBook { .. } => "author_not_in_book",
            Self::Repo(_) => "storage_error",
        }
    }
}

impl Display for AssociationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthorNotFound(id) => {
                write!(f, "The author with the given id was not found: {id}")
            }
            Self::BookNotFound(id) => write!(f, "The book with the given id was not found: {id}"),
            Self::PrizeNotFound(id) => {
                write!(f, "The prize with the given id was not found: {id}")
            }
            Self::PrizeWithoutAuthor(id) => write!(f, "The prize {id} has no author"),
            Self::AuthorNotInBook { book_id, author_id } => write!(
                f,
                "The author {author_id} is not associated to the book {book_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssociationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AssociationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityRef::Author(id)) => Self::AuthorNotFound(id),
            RepoError::NotFound(EntityRef::Book(id)) => Self::BookNotFound(id),
            RepoError::NotFound(EntityRef::Prize(id)) => Self::PrizeNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for AssociationError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}
