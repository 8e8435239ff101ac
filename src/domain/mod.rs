//! Domain layer: entities, the slug engine and repository interfaces.
//!
//! - [`entities`] - Link records and their create/patch inputs
//! - [`slug`] - Sanitizer, pattern detector and fallback generator
//! - [`suggestion`] - Suggestion model and synthetic multi-style fallback
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] / [`click_worker`] - Asynchronous click counting
//!
//! Nothing in this layer depends on infrastructure or HTTP types.
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves a servable link
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel (dropped when full)
//! 3. [`click_worker::run_click_worker`] increments the counter with retry

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
pub mod slug;
pub mod suggestion;
