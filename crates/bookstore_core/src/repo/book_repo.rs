//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Resolve books by id and persist new book records.
//! - Own the `book_authors` join rows backing each book's author set.
//!
//! # Invariants
//! - A book's author set never holds the same author twice: the join table
//!   is keyed by `(book_id, author_id)` and inserts ignore existing pairs.
//! - Author listing follows link insertion order.

use crate::db::UnitOfWork;
use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookId, NewBook};
use crate::repo::author_repo::{parse_author_row, AUTHOR_COLUMNS_SQL};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

/// Book columns for queries that alias `books` as `b`.
pub(crate) const BOOK_COLUMNS_SQL: &str =
    "b.id, b.name, b.isbn, b.description, b.image, b.publishing_date";

/// Record store for books and their author links.
pub trait BookRepository {
    /// Persists a validated draft and returns the store-assigned id.
    fn create_book(&self, uow: &UnitOfWork<'_>, draft: &NewBook) -> RepoResult<BookId>;
    fn find_by_id(&self, uow: &UnitOfWork<'_>, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists all books ordered by id.
    fn list_books(&self, uow: &UnitOfWork<'_>) -> RepoResult<Vec<Book>>;
    /// Returns the book's author collection in link insertion order.
    fn list_authors(&self, uow: &UnitOfWork<'_>, book_id: BookId) -> RepoResult<Vec<Author>>;
    fn contains_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool>;
    /// Links the author to the book. Returns `false` when already linked.
    fn insert_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool>;
    /// Unlinks the author from the book. Returns `false` when not linked.
    fn remove_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool>;
    /// Drops every author link of the book and returns how many were removed.
    fn clear_authors(&self, uow: &UnitOfWork<'_>, book_id: BookId) -> RepoResult<usize>;
}

/// SQLite-backed book store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteBookRepository;

impl SqliteBookRepository {
    pub fn new() -> Self {
        Self
    }
}

impl BookRepository for SqliteBookRepository {
    fn create_book(&self, uow: &UnitOfWork<'_>, draft: &NewBook) -> RepoResult<BookId> {
        draft.validate()?;

        let conn = uow.connection();
        conn.execute(
            "INSERT INTO books (name, isbn, description, image, publishing_date)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                draft.name.trim(),
                draft.isbn.trim(),
                draft.description.as_deref(),
                draft.image.as_deref(),
                draft.publishing_date,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn find_by_id(&self, uow: &UnitOfWork<'_>, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = uow
            .connection()
            .prepare(&format!("SELECT {BOOK_COLUMNS_SQL} FROM books b WHERE b.id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_book_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_books(&self, uow: &UnitOfWork<'_>) -> RepoResult<Vec<Book>> {
        let mut stmt = uow
            .connection()
            .prepare(&format!("SELECT {BOOK_COLUMNS_SQL} FROM books b ORDER BY b.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn list_authors(&self, uow: &UnitOfWork<'_>, book_id: BookId) -> RepoResult<Vec<Author>> {
        let mut stmt = uow.connection().prepare(&format!(
            "SELECT {AUTHOR_COLUMNS_SQL}
             FROM book_authors ba
             INNER JOIN authors a ON a.id = ba.author_id
             WHERE ba.book_id = ?1
             ORDER BY ba.rowid ASC;"
        ))?;
        let mut rows = stmt.query([book_id])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn contains_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool> {
        let exists: i64 = uow.connection().query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM book_authors
                WHERE book_id = ?1 AND author_id = ?2
            );",
            params![book_id, author_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool> {
        let changed = uow.connection().execute(
            "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2);",
            params![book_id, author_id],
        )?;
        Ok(changed == 1)
    }

    fn remove_author(
        &self,
        uow: &UnitOfWork<'_>,
        book_id: BookId,
        author_id: AuthorId,
    ) -> RepoResult<bool> {
        let changed = uow.connection().execute(
            "DELETE FROM book_authors WHERE book_id = ?1 AND author_id = ?2;",
            params![book_id, author_id],
        )?;
        Ok(changed == 1)
    }

    fn clear_authors(&self, uow: &UnitOfWork<'_>, book_id: BookId) -> RepoResult<usize> {
        let changed = uow
            .connection()
            .execute("DELETE FROM book_authors WHERE book_id = ?1;", [book_id])?;
        Ok(changed)
    }
}

pub(crate) fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in books.name for id {id}"
        )));
    }

    Ok(Book {
        id,
        name,
        isbn: row.get("isbn")?,
        description: row.get("description")?,
        image: row.get("image")?,
        publishing_date: row.get("publishing_date")?,
    })
}
