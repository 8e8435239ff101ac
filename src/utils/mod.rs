//! Utility functions shared across layers.
//!
//! - [`url_normalizer`] - URL normalization and sanitization

pub mod url_normalizer;
