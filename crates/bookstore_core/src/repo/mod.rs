//! Record stores for catalog entities and their relationships.
//!
//! # Responsibility
//! - Define by-id lookup and relationship mutation contracts.
//! - Isolate SQLite query details from association use-cases.
//!
//! # Invariants
//! - Every call takes an open `UnitOfWork`; writes become visible only when
//!   the enclosing transaction commits.
//! - Write paths validate drafts before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod author_repo;
pub mod book_repo;
mod error;
pub mod prize_repo;

pub use error::{EntityRef, RepoError, RepoResult};
