//! Prize repository contract and SQLite implementation.
//!
//! # Invariants
//! - `prizes.author_id` is the only storage of the prize/author link; the
//!   author's prize collection is read back from it.

use crate::db::UnitOfWork;
use crate::model::author::AuthorId;
use crate::model::prize::{NewPrize, Prize, PrizeId};
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

pub(crate) const PRIZE_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    premiation_date,
    author_id
FROM prizes";

/// Record store for prizes.
pub trait PrizeRepository {
    /// Persists a validated draft without an author.
    fn create_prize(&self, uow: &UnitOfWork<'_>, draft: &NewPrize) -> RepoResult<PrizeId>;
    fn find_by_id(&self, uow: &UnitOfWork<'_>, id: PrizeId) -> RepoResult<Option<Prize>>;
    /// Lists all prizes ordered by id.
    fn list_prizes(&self, uow: &UnitOfWork<'_>) -> RepoResult<Vec<Prize>>;
    /// Overwrites the prize author reference; `None` clears it.
    fn set_author(
        &self,
        uow: &UnitOfWork<'_>,
        prize_id: PrizeId,
        author_id: Option<AuthorId>,
    ) -> RepoResult<()>;
}

/// SQLite-backed prize store.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePrizeRepository;

impl SqlitePrizeRepository {
    pub fn new() -> Self {
        Self
    }
}

impl PrizeRepository for SqlitePrizeRepository {
    fn create_prize(&self, uow: &UnitOfWork<'_>, draft: &NewPrize) -> RepoResult<PrizeId> {
        draft.validate()?;

        let conn = uow.connection();
        conn.execute(
            "INSERT INTO prizes (name, description, premiation_date, author_id)
             VALUES (?1, ?2, ?3, NULL);",
            params![
                draft.name.trim(),
                draft.description.as_deref(),
                draft.premiation_date,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn find_by_id(&self, uow: &UnitOfWork<'_>, id: PrizeId) -> RepoResult<Option<Prize>> {
        let mut stmt = uow
            .connection()
            .prepare(&format!("{PRIZE_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_prize_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_prizes(&self, uow: &UnitOfWork<'_>) -> RepoResult<Vec<Prize>> {
        let mut stmt = uow
            .connection()
            .prepare(&format!("{PRIZE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut prizes = Vec::new();
        while let Some(row) = rows.next()? {
            prizes.push(parse_prize_row(row)?);
        }
        Ok(prizes)
    }

    fn set_author(
        &self,
        uow: &UnitOfWork<'_>,
        prize_id: PrizeId,
        author_id: Option<AuthorId>,
    ) -> RepoResult<()> {
        let changed = uow.connection().execute(
            "UPDATE prizes SET author_id = ?2 WHERE id = ?1;",
            params![prize_id, author_id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Prize(prize_id)));
        }

        Ok(())
    }
}

pub(crate) fn parse_prize_row(row: &Row<'_>) -> RepoResult<Prize> {
    let id: PrizeId = row.get("id")?;
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in prizes.name for id {id}"
        )));
    }

    Ok(Prize {
        id,
        name,
        description: row.get("description")?,
        premiation_date: row.get("premiation_date")?,
        author_id: row.get("author_id")?,
    })
}
