//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod slug;
pub mod suggestions;
pub mod urls;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use slug::{check_slug_handler, detect_pattern_handler, list_patterns_handler};
pub use suggestions::generate_suggestions_handler;
pub use urls::{
    create_url_handler, delete_url_handler, get_url_handler, list_urls_handler, update_url_handler,
};
