//! Slug engine: grammar, site pattern detection and heuristic fallback.
//!
//! - [`sanitizer`] - normalization into the stored slug grammar
//! - [`patterns`] - fixed-priority table of known site URL shapes
//! - [`fallback`] - keyword/domain/path heuristic for everything else

pub mod fallback;
pub mod patterns;
pub mod sanitizer;

pub use fallback::fallback;
pub use patterns::{Confidence, DetectionResult, PatternInfo, SitePattern, detect};
pub use sanitizer::{
    MAX_SLUG_LENGTH, is_reserved, is_valid_slug, sanitize, tidy_display, validate_custom_slug,
    with_suffix,
};
