//! Core domain entities.
//!
//! - [`Link`] - A slug to destination mapping with lifecycle fields
//! - [`NewLink`] - Input for creating a link
//! - [`LinkPatch`] - Partial update

pub mod link;

pub use link::{Link, LinkPatch, NewLink};
