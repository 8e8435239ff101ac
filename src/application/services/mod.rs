//! Business logic services for the application layer.

pub mod link_service;
pub mod slug_resolver;
pub mod suggestion_service;

pub use link_service::{LinkDraft, LinkService, LinkSettings};
pub use slug_resolver::{Alternative, AlternativeKind, Resolution, SlugResolver};
pub use suggestion_service::{
    MAX_SUGGESTIONS, SuggestionBatch, SuggestionService, SuggestionSettings, SuggestionSource,
};
