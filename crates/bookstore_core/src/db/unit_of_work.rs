//! Scoped transaction boundary for catalog use-cases.
//!
//! # Responsibility
//! - Open one SQLite transaction per use-case call.
//! - Commit when the scoped work succeeds, roll back when it fails.
//!
//! # Invariants
//! - A `UnitOfWork` never outlives the `TransactionManager::run` call that
//!   created it.
//! - A unit of work that is dropped without commit (error return or panic)
//!   is rolled back.
//! - Nested units of work are impossible: `run` needs `&mut self`.

use super::DbError;
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Open transaction handed to repository calls.
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
    operation: &'static str,
}

impl UnitOfWork<'_> {
    /// Connection view scoped to the open transaction.
    pub fn connection(&self) -> &Connection {
        &self.tx
    }

    /// Use-case name this unit of work was opened for.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

/// Owns the connection and scopes every use-case into one transaction.
pub struct TransactionManager<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> TransactionManager<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Runs `work` inside one immediate transaction.
    ///
    /// # Contract
    /// - `Ok` from `work` commits all writes; a failing commit is returned
    ///   as `DbError`.
    /// - `Err` from `work` rolls back all writes and is returned unchanged.
    /// - A panic inside `work` unwinds through the transaction guard, which
    ///   rolls back on drop.
    pub fn run<T, E, F>(&mut self, operation: &'static str, work: F) -> Result<T, E>
    where
        F: FnOnce(&UnitOfWork<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        let uow = UnitOfWork { tx, operation };

        match work(&uow) {
            Ok(value) => {
                if let Err(err) = uow.tx.commit() {
                    error!(
                        "event=tx_commit module=db status=error op={} duration_ms={} error={}",
                        operation,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(DbError::from(err).into());
                }
                debug!(
                    "event=tx_commit module=db status=ok op={} duration_ms={}",
                    operation,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                match uow.tx.rollback() {
                    Ok(()) => warn!(
                        "event=tx_rollback module=db status=ok op={} duration_ms={}",
                        operation,
                        started_at.elapsed().as_millis()
                    ),
                    Err(rollback_err) => error!(
                        "event=tx_rollback module=db status=error op={} error={}",
                        operation, rollback_err
                    ),
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransactionManager;
    use crate::db::{open_db_in_memory, DbError};
    use rusqlite::Connection;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn author_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))
            .unwrap()
    }

    fn insert_author(conn: &Connection) -> Result<(), DbError> {
        conn.execute("INSERT INTO authors (name) VALUES ('Borges');", [])?;
        Ok(())
    }

    #[test]
    fn run_commits_when_work_succeeds() {
        let mut conn = open_db_in_memory().unwrap();
        TransactionManager::new(&mut conn)
            .run("test_commit", |uow| insert_author(uow.connection()))
            .unwrap();
        assert_eq!(author_count(&conn), 1);
    }

    #[test]
    fn run_rolls_back_when_work_fails() {
        let mut conn = open_db_in_memory().unwrap();
        let result: Result<(), DbError> =
            TransactionManager::new(&mut conn).run("test_rollback", |uow| {
                insert_author(uow.connection())?;
                Err(DbError::UnsupportedSchemaVersion {
                    db_version: 0,
                    latest_supported: 0,
                })
            });
        assert!(result.is_err());
        assert_eq!(author_count(&conn), 0);
    }

    #[test]
    fn run_rolls_back_when_work_panics() {
        let mut conn = open_db_in_memory().unwrap();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _: Result<(), DbError> =
                TransactionManager::new(&mut conn).run("test_panic", |uow| {
                    insert_author(uow.connection())?;
                    panic!("boom");
                });
        }));
        assert!(outcome.is_err());
        assert_eq!(author_count(&conn), 0);
    }

    #[test]
    fn unit_of_work_reports_operation_name() {
        let mut conn = open_db_in_memory().unwrap();
        let name = TransactionManager::new(&mut conn)
            .run::<_, DbError, _>("named_op", |uow| Ok(uow.operation()))
            .unwrap();
        assert_eq!(name, "named_op");
    }
}
