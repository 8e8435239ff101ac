//! Heuristic slug generation for URLs no pattern recognizes.
//!
//! Deterministic and synchronous: it never fails and never touches the
//! network, so it is what every AI failure ends up on.

use super::sanitizer::sanitize;
use url::Url;

/// Maximum number of keywords joined into a slug.
const MAX_KEYWORDS: usize = 5;

/// Maximum words (brand included) in a brand-derived slug.
const MAX_BRAND_WORDS: usize = 5;

/// Path words appended after the domain label for generic URLs.
const MAX_PATH_WORDS: usize = 2;

/// Retailers whose URLs should always carry the brand name.
const KNOWN_BRANDS: &[&str] = &[
    "amazon",
    "target",
    "walmart",
    "costco",
    "hoka",
    "nike",
    "adidas",
    "reebok",
    "publix",
    "kroger",
    "safeway",
    "wholefoods",
    "instacart",
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "item", "product", "com", "www", "html",
    "php", "asp", "landing", "index",
];

const FILE_EXTENSIONS: &[&str] = &[
    ".html", ".htm", ".php", ".aspx", ".asp", ".jsp", ".cfm", ".shtml",
];

/// Derives a slug from caller keywords or, failing that, from the URL.
///
/// Keywords always win: up to five sanitized keywords are joined with `.`.
/// Without usable keywords the slug is built from a known brand plus product
/// words, or from the registrable domain label plus a couple of path words.
///
/// ```ignore
/// assert_eq!(fallback(&["test".into(), "product".into(), "demo".into()], "https://x.io"),
///            "test.product.demo");
/// ```
pub fn fallback(keywords: &[String], url: &str) -> String {
    let from_keywords: Vec<String> = keywords
        .iter()
        .map(|k| sanitize(k))
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .collect();

    if !from_keywords.is_empty() {
        return sanitize(&from_keywords.join("."));
    }

    let Ok(parsed) = Url::parse(url) else {
        return "link".to_string();
    };

    let host = parsed
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_ascii_lowercase())
        .unwrap_or_default();

    let words = path_words(&parsed);

    if let Some(brand) = KNOWN_BRANDS.iter().find(|b| host.contains(*b)) {
        if words.is_empty() {
            return format!("{}.products", brand);
        }
        let parts: Vec<&str> = std::iter::once(*brand)
            .chain(words.iter().map(String::as_str))
            .take(MAX_BRAND_WORDS)
            .collect();
        return sanitize(&parts.join("."));
    }

    let label = registrable_label(&host);
    let label = if label.is_empty() { "link" } else { label };

    let slug = if words.is_empty() {
        format!("{}.link", label)
    } else {
        let head: Vec<&str> = words
            .iter()
            .take(MAX_PATH_WORDS)
            .map(String::as_str)
            .collect();
        format!("{}.{}", label, head.join("."))
    };

    let slug = sanitize(&slug);
    if slug.is_empty() {
        "link".to_string()
    } else {
        slug
    }
}

/// Returns the label that names the site, e.g. `hoka` for `www.hoka.com`
/// and `bbc` for `news.bbc.co.uk`.
pub fn registrable_label(host: &str) -> &str {
    const SECOND_LEVEL: &[&str] = &["co", "com", "org", "net", "ac", "gov", "edu"];

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();

    match labels.as_slice() {
        [] => "",
        [only] => only,
        [.., name, sld, tld] if tld.len() == 2 && SECOND_LEVEL.contains(sld) => name,
        [.., name, _tld] => name,
    }
}

/// Meaningful lowercase words from the URL path.
///
/// Numeric ids, stop words, file extensions and words of two characters or
/// fewer are dropped.
pub fn path_words(url: &Url) -> Vec<String> {
    let Some(segments) = url.path_segments() else {
        return Vec::new();
    };

    segments
        .filter(|s| !s.is_empty())
        .map(strip_extension)
        .flat_map(|seg| {
            seg.split(|c: char| !c.is_ascii_alphanumeric())
                .map(str::to_ascii_lowercase)
                .collect::<Vec<_>>()
        })
        .filter(|w| {
            w.len() > 2
                && !w.chars().all(|c| c.is_ascii_digit())
                && !STOP_WORDS.contains(&w.as_str())
        })
        .collect()
}

fn strip_extension(seg: &str) -> &str {
    let lower = seg.to_ascii_lowercase();
    FILE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &seg[..seg.len() - ext.len()])
        .unwrap_or(seg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_keywords_win() {
        assert_eq!(
            fallback(&kw(&["test", "product", "demo"]), "https://example.com/anything"),
            "test.product.demo"
        );
        assert_eq!(
            fallback(&kw(&["test", "product", "demo"]), "not even a url"),
            "test.product.demo"
        );
    }

    #[test]
    fn test_keywords_are_sanitized_and_capped() {
        let slug = fallback(
            &kw(&["Black Friday", "", "!!", "a", "b", "c", "d", "e"]),
            "https://example.com",
        );
        assert_eq!(slug, "blackfriday.a.b.c.d");
    }

    #[test]
    fn test_unusable_keywords_fall_through_to_url() {
        assert_eq!(
            fallback(&kw(&["!!!"]), "https://example.com/"),
            "example.link"
        );
    }

    #[test]
    fn test_brand_with_product_words() {
        let slug = fallback(
            &[],
            "https://www.hoka.com/en/us/mens-road/clifton-9/1127895.html",
        );
        assert_eq!(slug, "hoka.mens.road.clifton");
    }

    #[test]
    fn test_brand_without_path() {
        assert_eq!(fallback(&[], "https://www.amazon.com/"), "amazon.products");
    }

    #[test]
    fn test_generic_domain_and_path() {
        assert_eq!(
            fallback(&[], "https://example.com/blog/rust-async-patterns"),
            "example.blog.rust"
        );
    }

    #[test]
    fn test_generic_domain_only() {
        assert_eq!(fallback(&[], "https://example.com/"), "example.link");
        assert_eq!(fallback(&[], "https://example.com/12345/"), "example.link");
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(fallback(&[], "::::"), "link");
    }

    #[test]
    fn test_registrable_label() {
        assert_eq!(registrable_label("hoka.com"), "hoka");
        assert_eq!(registrable_label("shop.example.com"), "example");
        assert_eq!(registrable_label("news.bbc.co.uk"), "bbc");
        assert_eq!(registrable_label("localhost"), "localhost");
        assert_eq!(registrable_label(""), "");
    }

    #[test]
    fn test_path_words_filters_noise() {
        let url = Url::parse("https://example.com/the/product/42/shoes_and-socks.html").unwrap();
        assert_eq!(path_words(&url), vec!["shoes", "socks"]);
    }
}
