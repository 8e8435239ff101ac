//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the interfaces the domain and application
//! layers consume.
//!
//! # Modules
//!
//! - [`ai`] - Language-model backend for slug suggestions
//! - [`cache`] - Redis, in-memory and no-op caches plus typed views
//! - [`persistence`] - PostgreSQL and in-memory link repositories

pub mod ai;
pub mod cache;
pub mod persistence;
