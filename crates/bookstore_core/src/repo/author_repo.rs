//! Author repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve authors by id and persist new author records.
//! - Expose the author side of both relationships: the ordered prize
//!   collection and the inverse book set.

use crate::db::UnitOfWork;
use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::model::book::Book;
use crate::model::prize::Prize;
use crate::repo::book_repo::{parse_book_row, BOOK_COLUMNS_SQL};
use crate::repo::prize_repo::{parse_prize_row, PRIZE_SELECT_SQL};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

pub(crate) const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth_date,
    description,
    image
FROM authors";

/// Author columns for queries that alias `authors` as `a`.
pub(crate) const AUTHOR_COLUMNS_SQL: &str = "a.id, a.name, a.birth_date, a.description, a.image";

/// Record store for authors.
pub trait AuthorRepository {
    /// Persists a validated draft and returns the store-assigned id.
    fn create_author(&self, uow: &UnitOfWork<'_>, draft: &NewAuthor) -> RepoResult<AuthorId>;
    fn find_by_id(&self, uow: &UnitOfWork<'_>, id: AuthorId) -> RepoResult<Option<Author>>;
    /// Lists all authors ordered by id.
    fn list_authors(&self, uow: &UnitOfWork<'_>) -> RepoResult<Vec<Author>>;
    /// Returns the author's prize collection ordered by prize id.
    fn list_prizes(&self, uow: &UnitOfWork<'_>, author_id: AuthorId) -> RepoResult<Vec<Prize>>;
    /// Returns the books the author is linked to, ordered by book id.
    fn list_books(&self, uow: &UnitOfWork<'_>, author_id: AuthorId) -> RepoResult<Vec<Book>>;
}

/// SQLite-backed author store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteAuthorRepository;

impl SqliteAuthorRepository {
    pub fn new() -> Self {
        Self
    }
}

impl AuthorRepository for SqliteAuthorRepository {
    fn create_author(&self, uow: &UnitOfWork<'_>, draft: &NewAuthor) -> RepoResult<AuthorId> {
        draft.validate()?;

        let conn = uow.connection();
        conn.execute(
            "INSERT INTO authors (name, birth_date, description, image)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.name.trim(),
                draft.birth_date,
                draft.description.as_deref(),
                draft.image.as_deref(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn find_by_id(&self, uow: &UnitOfWork<'_>, id: AuthorId) -> RepoResult<Option<Author>> {
        let mut stmt = uow
            .connection()
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_author_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_authors(&self, uow: &UnitOfWork<'_>) -> RepoResult<Vec<Author>> {
        let mut stmt = uow
            .connection()
            .prepare(&format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn list_prizes(&self, uow: &UnitOfWork<'_>, author_id: AuthorId) -> RepoResult<Vec<Prize>> {
        let mut stmt = uow.connection().prepare(&format!(
            "{PRIZE_SELECT_SQL}
             WHERE author_id = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([author_id])?;
        let mut prizes = Vec::new();
        while let Some(row) = rows.next()? {
            prizes.push(parse_prize_row(row)?);
        }
        Ok(prizes)
    }

    fn list_books(&self, uow: &UnitOfWork<'_>, author_id: AuthorId) -> RepoResult<Vec<Book>> {
        let mut stmt = uow.connection().prepare(&format!(
            "SELECT {BOOK_COLUMNS_SQL}
             FROM books b
             INNER JOIN book_authors ba ON ba.book_id = b.id
             WHERE ba.author_id = ?1
             ORDER BY b.id ASC;"
        ))?;
        let mut rows = stmt.query([author_id])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }
}

pub(crate) fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id: AuthorId = row.get("id")?;
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in authors.name for id {id}"
        )));
    }

    Ok(Author {
        id,
        name,
        birth_date: row.get("birth_date")?,
        description: row.get("description")?,
        image: row.get("image")?,
    })
}
