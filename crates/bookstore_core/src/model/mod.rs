//! Catalog domain model for authors, books and prizes.
//!
//! # Responsibility
//! - Define the records association use-cases read and link.
//! - Keep draft validation next to the records it guards.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned numeric id.
//! - Relationship fields are owned by storage (join rows and the prize
//!   author column), never duplicated inside author/book records.

pub mod author;
pub mod book;
pub mod prize;
pub mod validation;
