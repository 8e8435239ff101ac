//! Slug normalization and custom slug validation.
//!
//! A stored slug is 1-50 characters from `[a-z0-9.-]`, starts and ends with an
//! alphanumeric character and never contains `..`. Uniqueness is
//! case-insensitive, so everything is lowercased before it reaches storage.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Maximum slug length in characters.
pub const MAX_SLUG_LENGTH: usize = 50;

/// Grammar every sanitized, non-empty slug satisfies.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9.-]*[a-z0-9])?$").unwrap());

/// Slugs that would shadow service routes.
const RESERVED_SLUGS: &[&str] = &[
    "api",
    "health",
    "slug",
    "suggestions",
    "urls",
    "static",
    "admin",
];

/// Normalizes any candidate string into slug form.
///
/// Lowercases, drops every character outside `[a-z0-9.-]`, collapses runs of
/// `.`, trims separators from both ends and hard-cuts at
/// [`MAX_SLUG_LENGTH`]. The result may be empty when the input had no usable
/// characters; callers that need a slug must check for that.
///
/// `sanitize(sanitize(x)) == sanitize(x)` for every input.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_SLUG_LENGTH * 2));

    for c in raw.chars().flat_map(char::to_lowercase) {
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-') {
            continue;
        }
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }

    let trimmed = trim_separators(&out);
    let cut: String = trimmed.chars().take(MAX_SLUG_LENGTH).collect();

    trim_separators(&cut).to_string()
}

/// Cleans a display slug without changing its case.
///
/// Used by the pattern detector, whose suggestions are PascalCase. Invalid
/// characters become `.`, dot runs collapse, separators are trimmed and the
/// result is cut to [`MAX_SLUG_LENGTH`].
pub fn tidy_display(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for c in raw.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' {
            c
        } else {
            '.'
        };
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }

    let trimmed = trim_separators(&out);
    let cut: String = trimmed.chars().take(MAX_SLUG_LENGTH).collect();

    trim_separators(&cut).to_string()
}

/// Returns true when `slug` already satisfies the stored-slug grammar.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && !slug.contains("..")
        && SLUG_REGEX.is_match(slug)
}

/// Returns true when `slug` would shadow a service route. Case-insensitive.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
}

/// Appends `.{suffix}` to `base`, shortening `base` so the result stays
/// within [`MAX_SLUG_LENGTH`]. Case is preserved.
pub fn with_suffix(base: &str, suffix: &str) -> String {
    let room = MAX_SLUG_LENGTH.saturating_sub(suffix.chars().count() + 1);
    let head: String = base.chars().take(room).collect();
    let head = trim_separators(&head);

    if head.is_empty() {
        suffix.to_string()
    } else {
        format!("{}.{}", head, suffix)
    }
}

/// Validates a caller-supplied custom slug and returns its stored form.
///
/// # Rules
///
/// - 1-50 characters
/// - Only letters, digits, `.` and `-` (letters are lowercased for storage)
/// - Must start and end with a letter or digit, no `..`
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<String, AppError> {
    if slug.is_empty() || slug.chars().count() > MAX_SLUG_LENGTH {
        return Err(AppError::bad_request(
            "Custom slug must be 1-50 characters",
            json!({ "provided_length": slug.chars().count() }),
        ));
    }

    let lowered = slug.to_ascii_lowercase();

    if !is_valid_slug(&lowered) {
        return Err(AppError::bad_request(
            "Custom slug may only contain letters, digits, dots and hyphens, \
             must start and end with a letter or digit and cannot contain '..'",
            json!({ "slug": slug }),
        ));
    }

    if is_reserved(&lowered) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(lowered)
}

fn trim_separators(s: &str) -> &str {
    s.trim_matches(|c| c == '.' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_lowercases_and_strips() {
        assert_eq!(sanitize("Hello World!"), "helloworld");
        assert_eq!(sanitize("Amazon.Echo_Dot"), "amazon.echodot");
    }

    #[test]
    fn test_sanitize_collapses_dots() {
        assert_eq!(sanitize("a...b..c"), "a.b.c");
    }

    #[test]
    fn test_sanitize_trims_edges() {
        assert_eq!(sanitize("..promo.."), "promo");
        assert_eq!(sanitize("-promo-"), "promo");
        assert_eq!(sanitize(".-.x.-."), "x");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "a".repeat(80);
        assert_eq!(sanitize(&long).len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn test_sanitize_truncation_does_not_leave_trailing_dot() {
        let raw = format!("{}.{}", "a".repeat(49), "b".repeat(10));
        let slug = sanitize(&raw);
        assert_eq!(slug, "a".repeat(49));
    }

    #[test]
    fn test_sanitize_empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("!!!"), "");
    }

    #[test]
    fn test_sanitize_keeps_hyphens() {
        assert_eq!(sanitize("black-friday.deal"), "black-friday.deal");
    }

    #[test]
    fn test_tidy_display_preserves_case() {
        assert_eq!(tidy_display("GitHub.facebook.react"), "GitHub.facebook.react");
        assert_eq!(tidy_display("YouTube.dQw4w9_WgXcQ"), "YouTube.dQw4w9.WgXcQ");
        assert_eq!(tidy_display(".A..B."), "A.B");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("a"));
        assert!(is_valid_slug("amazon.product.2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("a..b"));
        assert!(!is_valid_slug(".a"));
        assert!(!is_valid_slug("a-"));
        assert!(!is_valid_slug("Upper"));
    }

    #[test]
    fn test_with_suffix_fits_limit() {
        assert_eq!(with_suffix("Amazon.Product", "2"), "Amazon.Product.2");

        let base = "x".repeat(50);
        let slug = with_suffix(&base, "2026");
        assert_eq!(slug.len(), MAX_SLUG_LENGTH);
        assert!(slug.ends_with(".2026"));
    }

    #[test]
    fn test_validate_custom_slug_ok() {
        assert_eq!(validate_custom_slug("Summer.Sale").unwrap(), "summer.sale");
        assert_eq!(validate_custom_slug("promo-2026").unwrap(), "promo-2026");
    }

    #[test]
    fn test_validate_custom_slug_rejects_bad_grammar() {
        assert!(validate_custom_slug("").is_err());
        assert!(validate_custom_slug("a..b").is_err());
        assert!(validate_custom_slug("has space").is_err());
        assert!(validate_custom_slug(".lead").is_err());
        assert!(validate_custom_slug(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_custom_slug_reserved() {
        for &reserved in RESERVED_SLUGS {
            assert!(
                validate_custom_slug(reserved).is_err(),
                "Reserved slug '{}' should be rejected",
                reserved
            );
        }
        assert!(validate_custom_slug("API").is_err());
    }

    #[test]
    fn test_is_reserved() {
        assert!(is_reserved("health"));
        assert!(is_reserved("Health"));
        assert!(!is_reserved("health.2"));
        assert!(!is_reserved("healthy"));
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(s in ".*") {
            let once = sanitize(&s);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn prop_sanitized_matches_grammar(s in "[ -~]{0,120}") {
            let slug = sanitize(&s);
            prop_assume!(!slug.is_empty());
            prop_assert!(is_valid_slug(&slug), "{:?} -> {:?}", s, slug);
            prop_assert!(slug.len() <= MAX_SLUG_LENGTH);
        }

        #[test]
        fn prop_tidy_display_never_double_dots(s in ".*") {
            let slug = tidy_display(&s);
            prop_assert!(!slug.contains(".."));
            prop_assert!(slug.chars().count() <= MAX_SLUG_LENGTH);
        }
    }
}
