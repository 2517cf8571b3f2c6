//! Association use-case services.
//!
//! # Responsibility
//! - Resolve both sides of a relationship by id and validate existence.
//! - Mutate book/author and prize/author links inside one transaction per
//!   call.
//!
//! # Invariants
//! - Services never create or delete authors, books or prizes.
//! - Every error aborts the call's transaction; no partial writes remain.

pub mod book_author_service;
mod error;
pub mod prize_author_service;

pub use error::{AssociationError, ErrorKind};

use crate::db::UnitOfWork;
use crate::model::author::{Author, AuthorId};
use crate::repo::author_repo::AuthorRepository;
use log::{error, info, warn};
use std::time::Instant;

/// Resolves an author or fails with `AuthorNotFound`.
fn require_author<A: AuthorRepository>(
    authors: &A,
    uow: &UnitOfWork<'_>,
    author_id: AuthorId,
) -> Result<Author, AssociationError> {
    authors
        .find_by_id(uow, author_id)?
        .ok_or(AssociationError::AuthorNotFound(author_id))
}

/// Emits the closing log line of one use-case call.
fn log_outcome<T>(
    event: &str,
    started_at: Instant,
    fields: &str,
    result: &Result<T, AssociationError>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms} {fields}"),
        Err(err) => match err.kind() {
            ErrorKind::Storage => error!(
                "event={event} module=service status=error duration_ms={duration_ms} {fields} error_code={} error={err}",
                err.code()
            ),
            ErrorKind::NotFound | ErrorKind::IllegalOperation => warn!(
                "event={event} module=service status=rejected duration_ms={duration_ms} {fields} error_code={}",
                err.code()
            ),
        },
    }
}
