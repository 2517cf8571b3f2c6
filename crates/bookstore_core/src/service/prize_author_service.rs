//! Prize/author association use-cases.
//!
//! # Invariants
//! - A prize has at most one author.
//! - The author's prize collection is derived from the prize author
//!   reference, so linking, replacing and removing keep both sides in sync
//!   within the same transaction.

use crate::db::{TransactionManager, UnitOfWork};
use crate::model::author::{Author, AuthorId};
use crate::model::prize::{Prize, PrizeId};
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::prize_repo::{PrizeRepository, SqlitePrizeRepository};
use crate::service::{log_outcome, require_author, AssociationError};
use log::debug;
use rusqlite::Connection;
use std::time::Instant;

type ServiceResult<T> = Result<T, AssociationError>;

/// Use-case service for the single-valued prize/author relationship.
pub struct PrizeAuthorService<'conn, A: AuthorRepository, P: PrizeRepository> {
    tx: TransactionManager<'conn>,
    authors: A,
    prizes: P,
}

impl<'conn> PrizeAuthorService<'conn, SqliteAuthorRepository, SqlitePrizeRepository> {
    /// Builds the service over SQLite-backed stores sharing `conn`.
    pub fn with_sqlite(conn: &'conn mut Connection) -> Self {
        Self::new(
            TransactionManager::new(conn),
            SqliteAuthorRepository::new(),
            SqlitePrizeRepository::new(),
        )
    }
}

impl<'conn, A: AuthorRepository, P: PrizeRepository> PrizeAuthorService<'conn, A, P> {
    pub fn new(tx: TransactionManager<'conn>, authors: A, prizes: P) -> Self {
        Self {
            tx,
            authors,
            prizes,
        }
    }

    /// Sets the prize author and returns the author.
    ///
    /// Any previous author loses the prize from its collection.
    ///
    /// # Errors
    /// - `AuthorNotFound` when `author_id` does not resolve (checked first).
    /// - `PrizeNotFound` when `prize_id` does not resolve.
    pub fn add_author(&mut self, author_id: AuthorId, prize_id: PrizeId) -> ServiceResult<Author> {
        self.link("prize_author_add", prize_id, author_id)
    }

    /// Replaces the prize author and returns the new author.
    ///
    /// Same mechanics and errors as [`Self::add_author`]; kept as its own
    /// entry point for callers expressing replace intent.
    pub fn replace_author(
        &mut self,
        prize_id: PrizeId,
        author_id: AuthorId,
    ) -> ServiceResult<Author> {
        self.link("prize_author_replace", prize_id, author_id)
    }

    /// Returns the prize author.
    ///
    /// # Errors
    /// - `PrizeNotFound` when `prize_id` does not resolve.
    /// - `PrizeWithoutAuthor` when the prize has no author.
    pub fn get_author(&mut self, prize_id: PrizeId) -> ServiceResult<Author> {
        let started_at = Instant::now();
        let (authors, prizes) = (&self.authors, &self.prizes);
        let result: ServiceResult<Author> = self.tx.run("prize_author_get", |uow| {
            let prize = require_prize(prizes, uow, prize_id)?;
            let author_id = prize
                .author_id
                .ok_or(AssociationError::PrizeWithoutAuthor(prize_id))?;
            require_author(authors, uow, author_id)
        });
        log_outcome(
            "prize_author_get",
            started_at,
            &format!("prize_id={prize_id}"),
            &result,
        );
        result
    }

    /// Clears the prize author and drops the prize from that author's
    /// collection.
    ///
    /// # Errors
    /// - `PrizeNotFound` when `prize_id` does not resolve.
    /// - `PrizeWithoutAuthor` when the prize has no author.
    pub fn remove_author(&mut self, prize_id: PrizeId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let (authors, prizes) = (&self.authors, &self.prizes);
        let result: ServiceResult<()> = self.tx.run("prize_author_remove", |uow| {
            let prize = require_prize(prizes, uow, prize_id)?;
            let author_id = prize
                .author_id
                .ok_or(AssociationError::PrizeWithoutAuthor(prize_id))?;
            let author = require_author(authors, uow, author_id)?;
            prizes.set_author(uow, prize.id, None)?;
            debug!(
                "event=prize_author_unlink module=service prize_id={prize_id} author_id={}",
                author.id
            );
            Ok(())
        });
        log_outcome(
            "prize_author_remove",
            started_at,
            &format!("prize_id={prize_id}"),
            &result,
        );
        result
    }

    /// Returns the author's prize collection ordered by prize id.
    ///
    /// # Errors
    /// - `AuthorNotFound` when `author_id` does not resolve.
    pub fn get_prizes(&mut self, author_id: AuthorId) -> ServiceResult<Vec<Prize>> {
        let started_at = Instant::now();
        let authors = &self.authors;
        let result: ServiceResult<Vec<Prize>> = self.tx.run("author_prize_list", |uow| {
            require_author(authors, uow, author_id)?;
            Ok(authors.list_prizes(uow, author_id)?)
        });
        log_outcome(
            "author_prize_list",
            started_at,
            &format!("author_id={author_id}"),
            &result,
        );
        result
    }

    fn link(
        &mut self,
        event: &'static str,
        prize_id: PrizeId,
        author_id: AuthorId,
    ) -> ServiceResult<Author> {
        let started_at = Instant::now();
        let (authors, prizes) = (&self.authors, &self.prizes);
        let result: ServiceResult<Author> = self.tx.run(event, |uow| {
            let author = require_author(authors, uow, author_id)?;
            let prize = require_prize(prizes, uow, prize_id)?;
            prizes.set_author(uow, prize.id, Some(author.id))?;
            debug!(
                "event=prize_author_link module=service prize_id={prize_id} author_id={author_id} previous_author_id={}",
                prize
                    .author_id
                    .map_or_else(|| "none".to_string(), |id| id.to_string())
            );
            Ok(author)
        });
        log_outcome(
            event,
            started_at,
            &format!("prize_id={prize_id} author_id={author_id}"),
            &result,
        );
        result
    }
}

fn require_prize<P: PrizeRepository>(
    prizes: &P,
    uow: &UnitOfWork<'_>,
    prize_id: PrizeId,
) -> ServiceResult<Prize> {
    prizes
        .find_by_id(uow, prize_id)?
        .ok_or(AssociationError::PrizeNotFound(prize_id))
}
