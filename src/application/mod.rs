//! Application layer services implementing business logic.
//!
//! Services coordinate the slug engine, repositories, caches and the AI
//! backend. HTTP handlers and the CLI consume them.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, redirects and updates
//! - [`services::slug_resolver::SlugResolver`] - Availability checks and collision alternatives
//! - [`services::suggestion_service::SuggestionService`] - AI suggestions with heuristic fallback

pub mod services;
