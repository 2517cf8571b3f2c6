//! Book/author association use-cases.
//!
//! # Responsibility
//! - Link and unlink existing authors to existing books.
//! - Answer membership queries over a book's author set.
//!
//! # Invariants
//! - Every operation resolves the referenced book and author(s) before it
//!   touches the join table, and fails with a not-found error otherwise.
//! - A book's author set never contains duplicates; re-linking is a no-op.
//! - `add_authors`/`replace_authors` either link every supplied author or
//!   none of them.

use crate::db::{TransactionManager, UnitOfWork};
use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookId};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::service::{log_outcome, require_author, AssociationError};
use log::debug;
use rusqlite::Connection;
use std::time::Instant;

type ServiceResult<T> = Result<T, AssociationError>;

/// Use-case service for the many-to-many book/author relationship.
pub struct BookAuthorService<'conn, A: AuthorRepository, B: BookRepository> {
    tx: TransactionManager<'conn>,
    authors: A,
    books: B,
}

impl<'conn> BookAuthorService<'conn, SqliteAuthorRepository, SqliteBookRepository> {
    /// Builds the service over SQLite-backed stores sharing `conn`.
    pub fn with_sqlite(conn: &'conn mut Connection) -> Self {
        Self::new(
            TransactionManager::new(conn),
            SqliteAuthorRepository::new(),
            SqliteBookRepository::new(),
        )
    }
}

impl<'conn, A: AuthorRepository, B: BookRepository> BookAuthorService<'conn, A, B> {
    pub fn new(tx: TransactionManager<'conn>, authors: A, books: B) -> Self {
        Self { tx, authors, books }
    }

    /// Links an author to a book and returns the author.
    ///
    /// Linking an author that is already in the book's set leaves the set
    /// unchanged.
    ///
    /// # Errors
    /// - `AuthorNotFound` when `author_id` does not resolve (checked first).
    /// - `BookNotFound` when `book_id` does not resolve.
    pub fn add_author(&mut self, book_id: BookId, author_id: AuthorId) -> ServiceResult<Author> {
        let started_at = Instant::now();
        let (authors, books) = (&self.authors, &self.books);
        let result: ServiceResult<Author> = self.tx.run("book_author_add", |uow| {
            let author = require_author(authors, uow, author_id)?;
            require_book(books, uow, book_id)?;
            let inserted = books.insert_author(uow, book_id, author.id)?;
            debug!(
                "event=book_author_link module=service book_id={book_id} author_id={author_id} inserted={inserted}"
            );
            Ok(author)
        });
        log_outcome(
            "book_author_add",
            started_at,
            &format!("book_id={book_id} author_id={author_id}"),
            &result,
        );
        result
    }

    /// Returns the book's full author collection.
    ///
    /// # Errors
    /// - `BookNotFound` when `book_id` does not resolve.
    pub fn get_authors(&mut self, book_id: BookId) -> ServiceResult<Vec<Author>> {
        let started_at = Instant::now();
        let books = &self.books;
        let result: ServiceResult<Vec<Author>> = self.tx.run("book_author_list", |uow| {
            require_book(books, uow, book_id)?;
            Ok(books.list_authors(uow, book_id)?)
        });
        log_outcome(
            "book_author_list",
            started_at,
            &format!("book_id={book_id}"),
            &result,
        );
        result
    }

    /// Returns one author of the book.
    ///
    /// # Errors
    /// - `AuthorNotFound` / `BookNotFound` when either id does not resolve.
    /// - `AuthorNotInBook` when both exist but are not linked.
    pub fn get_author(&mut self, book_id: BookId, author_id: AuthorId) -> ServiceResult<Author> {
        let started_at = Instant::now();
        let (authors, books) = (&self.authors, &self.books);
        let result: ServiceResult<Author> = self.tx.run("book_author_get", |uow| {
            let author = require_author(authors, uow, author_id)?;
            require_book(books, uow, book_id)?;
            if books.contains_author(uow, book_id, author_id)? {
                return Ok(author);
            }
            Err(AssociationError::AuthorNotInBook { book_id, author_id })
        });
        log_outcome(
            "book_author_get",
            started_at,
            &format!("book_id={book_id} author_id={author_id}"),
            &result,
        );
        result
    }

    /// Links every listed author to the book, skipping ones already linked,
    /// and returns the resulting collection.
    ///
    /// # Errors
    /// - `BookNotFound` when `book_id` does not resolve (checked first).
    /// - `AuthorNotFound` for the first listed author that does not resolve;
    ///   no link from this call survives.
    pub fn add_authors(
        &mut self,
        book_id: BookId,
        author_ids: &[AuthorId],
    ) -> ServiceResult<Vec<Author>> {
        let started_at = Instant::now();
        let (authors, books) = (&self.authors, &self.books);
        let result: ServiceResult<Vec<Author>> = self.tx.run("book_author_add_many", |uow| {
            require_book(books, uow, book_id)?;
            for &author_id in author_ids {
                let author = require_author(authors, uow, author_id)?;
                if !books.contains_author(uow, book_id, author.id)? {
                    books.insert_author(uow, book_id, author.id)?;
                }
            }
            Ok(books.list_authors(uow, book_id)?)
        });
        log_outcome(
            "book_author_add_many",
            started_at,
            &format!("book_id={book_id} requested={}", author_ids.len()),
            &result,
        );
        result
    }

    /// Makes the book's author set exactly the listed authors.
    ///
    /// Duplicate ids in `author_ids` are linked once. Link order follows the
    /// first occurrence of each id.
    ///
    /// # Errors
    /// - `BookNotFound` when `book_id` does not resolve (checked first).
    /// - `AuthorNotFound` for the first listed author that does not resolve;
    ///   the previous author set is kept.
    pub fn replace_authors(
        &mut self,
        book_id: BookId,
        author_ids: &[AuthorId],
    ) -> ServiceResult<Vec<Author>> {
        let started_at = Instant::now();
        let (authors, books) = (&self.authors, &self.books);
        let result: ServiceResult<Vec<Author>> = self.tx.run("book_author_replace", |uow| {
            require_book(books, uow, book_id)?;
            let resolved = author_ids
                .iter()
                .map(|&author_id| require_author(authors, uow, author_id))
                .collect::<ServiceResult<Vec<_>>>()?;

            let removed = books.clear_authors(uow, book_id)?;
            for author in &resolved {
                books.insert_author(uow, book_id, author.id)?;
            }
            debug!(
                "event=book_author_replace module=service book_id={book_id} removed={removed} linked={}",
                resolved.len()
            );
            Ok(books.list_authors(uow, book_id)?)
        });
        log_outcome(
            "book_author_replace",
            started_at,
            &format!("book_id={book_id} requested={}", author_ids.len()),
            &result,
        );
        result
    }

    /// Unlinks an author from the book.
    ///
    /// Unlinking an author that was never linked is a no-op.
    ///
    /// # Errors
    /// - `AuthorNotFound` / `BookNotFound` when either id does not resolve.
    pub fn remove_author(&mut self, book_id: BookId, author_id: AuthorId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let (authors, books) = (&self.authors, &self.books);
        let result: ServiceResult<()> = self.tx.run("book_author_remove", |uow| {
            require_author(authors, uow, author_id)?;
            require_book(books, uow, book_id)?;
            let removed = books.remove_author(uow, book_id, author_id)?;
            debug!(
                "event=book_author_unlink module=service book_id={book_id} author_id={author_id} removed={removed}"
            );
            Ok(())
        });
        log_outcome(
            "book_author_remove",
            started_at,
            &format!("book_id={book_id} author_id={author_id}"),
            &result,
        );
        result
    }
}

fn require_book<B: BookRepository>(
    books: &B,
    uow: &UnitOfWork<'_>,
    book_id: BookId,
) -> ServiceResult<Book> {
    books
        .find_by_id(uow, book_id)?
        .ok_or(AssociationError::BookNotFound(book_id))
}
