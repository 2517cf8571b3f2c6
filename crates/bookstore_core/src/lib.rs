//! Core catalog logic for the bookstore.
//! This crate owns the book/author and prize/author association rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, DatabaseConfig, LoggingConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult, TransactionManager, UnitOfWork};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::author::{Author, AuthorId, NewAuthor};
pub use model::book::{Book, BookId, NewBook};
pub use model::prize::{NewPrize, Prize, PrizeId};
pub use model::validation::EntityValidationError;
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::prize_repo::{PrizeRepository, SqlitePrizeRepository};
pub use repo::{EntityRef, RepoError, RepoResult};
pub use service::book_author_service::BookAuthorService;
pub use service::prize_author_service::PrizeAuthorService;
pub use service::{AssociationError, ErrorKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
