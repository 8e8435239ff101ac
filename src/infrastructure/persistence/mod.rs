//! Link repository implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL via SQLx
//! - [`InMemoryLinkRepository`] - process-local map with the same uniqueness contract

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
