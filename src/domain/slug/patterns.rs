//! Site pattern detection.
//!
//! A fixed table of known URL shapes (commerce, video, code hosting, social,
//! news). [`detect`] walks [`PATTERNS`] in priority order, picks the first
//! pattern whose domain list matches the URL host and runs that pattern's
//! extractor. Once a domain matches there is no fallthrough: a URL whose path
//! yields only some of the fields is still reported as matched.
//!
//! Suggested slugs are rendered as dot-joined segments. Words derived from
//! titles are PascalCased; identifiers (usernames, repository names, video
//! ids) are kept verbatim.

use super::sanitizer::tidy_display;
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// How much trust to place in a detected slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A known site shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePattern {
    Amazon,
    YouTube,
    GitHub,
    Twitter,
    LinkedIn,
    Reddit,
    Medium,
    NyTimes,
}

/// Pattern table in match priority order.
pub static PATTERNS: [SitePattern; 8] = [
    SitePattern::Amazon,
    SitePattern::YouTube,
    SitePattern::GitHub,
    SitePattern::Twitter,
    SitePattern::LinkedIn,
    SitePattern::Reddit,
    SitePattern::Medium,
    SitePattern::NyTimes,
];

/// Outcome of running [`detect`] on a URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub matched: bool,
    pub pattern_name: &'static str,
    pub template: &'static str,
    pub extracted: BTreeMap<String, String>,
    pub suggested_slug: Option<String>,
    pub confidence: Confidence,
}

impl DetectionResult {
    fn generic() -> Self {
        Self {
            matched: false,
            pattern_name: "Generic",
            template: "{Domain}.{Path}",
            extracted: BTreeMap::new(),
            suggested_slug: None,
            confidence: Confidence::Low,
        }
    }
}

/// Public description of a pattern, as listed by `GET /slug/patterns`.
#[derive(Debug, Clone, Serialize)]
pub struct PatternInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub domains: &'static [&'static str],
    pub template: &'static str,
}

/// Fields pulled out of a URL plus the slug segments built from them.
#[derive(Debug, Default)]
struct Extraction {
    fields: BTreeMap<String, String>,
    parts: Vec<String>,
}

impl Extraction {
    fn field(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), value.into());
    }

    fn part(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.parts.push(value);
        }
    }
}

impl SitePattern {
    pub fn id(self) -> &'static str {
        match self {
            SitePattern::Amazon => "amazon",
            SitePattern::YouTube => "youtube",
            SitePattern::GitHub => "github",
            SitePattern::Twitter => "twitter",
            SitePattern::LinkedIn => "linkedin",
            SitePattern::Reddit => "reddit",
            SitePattern::Medium => "medium",
            SitePattern::NyTimes => "nytimes",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SitePattern::Amazon => "Amazon",
            SitePattern::YouTube => "YouTube",
            SitePattern::GitHub => "GitHub",
            SitePattern::Twitter => "Twitter/X",
            SitePattern::LinkedIn => "LinkedIn",
            SitePattern::Reddit => "Reddit",
            SitePattern::Medium => "Medium",
            SitePattern::NyTimes => "New York Times",
        }
    }

    pub fn domains(self) -> &'static [&'static str] {
        match self {
            SitePattern::Amazon => &[
                "amazon.com",
                "amzn.com",
                "amzn.to",
                "amazon.co.uk",
                "amazon.ca",
                "amazon.de",
            ],
            SitePattern::YouTube => &["youtube.com", "youtu.be"],
            SitePattern::GitHub => &["github.com", "raw.githubusercontent.com"],
            SitePattern::Twitter => &["twitter.com", "x.com"],
            SitePattern::LinkedIn => &["linkedin.com", "lnkd.in"],
            SitePattern::Reddit => &["reddit.com", "redd.it"],
            SitePattern::Medium => &["medium.com"],
            SitePattern::NyTimes => &["nytimes.com", "nyti.ms"],
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            SitePattern::Amazon => "Amazon.{ProductName}.{Category}",
            SitePattern::YouTube => "YouTube.{VideoId}",
            SitePattern::GitHub => "GitHub.{Username}.{RepoName}",
            SitePattern::Twitter => "X.{Username}.Tweet",
            SitePattern::LinkedIn => "LinkedIn.{Name}.{Type}",
            SitePattern::Reddit => "Reddit.{Subreddit}.{PostTitle}",
            SitePattern::Medium => "Medium.{Author}.{Title}",
            SitePattern::NyTimes => "NYTimes.{Headline}.{Year}",
        }
    }

    /// Structured-identifier patterns are `High`, the rest `Medium`.
    pub fn confidence(self) -> Confidence {
        match self {
            SitePattern::Amazon
            | SitePattern::YouTube
            | SitePattern::GitHub
            | SitePattern::Twitter => Confidence::High,
            SitePattern::LinkedIn
            | SitePattern::Reddit
            | SitePattern::Medium
            | SitePattern::NyTimes => Confidence::Medium,
        }
    }

    /// Matches `host` (already stripped of `www.`/`m.`) against the pattern's
    /// domains, accepting subdomains.
    pub fn matches_host(self, host: &str) -> bool {
        self.domains().iter().any(|d| {
            host == *d
                || host
                    .strip_suffix(d)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn info(self) -> PatternInfo {
        PatternInfo {
            id: self.id(),
            name: self.name(),
            domains: self.domains(),
            template: self.template(),
        }
    }

    fn extract(self, url: &Url, host: &str) -> Extraction {
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        match self {
            SitePattern::Amazon => extract_amazon(url, &segments),
            SitePattern::YouTube => extract_youtube(url, host, &segments),
            SitePattern::GitHub => extract_github(host, &segments),
            SitePattern::Twitter => extract_twitter(&segments),
            SitePattern::LinkedIn => extract_linkedin(&segments),
            SitePattern::Reddit => extract_reddit(host, &segments),
            SitePattern::Medium => extract_medium(host, &segments),
            SitePattern::NyTimes => extract_nytimes(host, &segments),
        }
    }
}

/// Detects the site pattern of `url` and proposes a slug.
///
/// Unparseable URLs and unknown hosts produce the `Generic` result with
/// `matched: false`.
pub fn detect(url: &str) -> DetectionResult {
    let Ok(parsed) = Url::parse(url) else {
        return DetectionResult::generic();
    };
    let Some(raw_host) = parsed.host_str() else {
        return DetectionResult::generic();
    };

    let host = normalize_host(raw_host);

    for pattern in PATTERNS {
        if !pattern.matches_host(&host) {
            continue;
        }

        let extraction = pattern.extract(&parsed, &host);
        let slug = tidy_display(&extraction.parts.join("."));

        tracing::debug!(pattern = pattern.name(), %slug, "Pattern matched");

        return DetectionResult {
            matched: true,
            pattern_name: pattern.name(),
            template: pattern.template(),
            extracted: extraction.fields,
            suggested_slug: (!slug.is_empty()).then_some(slug),
            confidence: pattern.confidence(),
        };
    }

    DetectionResult::generic()
}

/// Lists every supported pattern in priority order.
pub fn supported_patterns() -> Vec<PatternInfo> {
    PATTERNS.iter().map(|p| p.info()).collect()
}

fn normalize_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    host.strip_prefix("m.").unwrap_or(host).to_string()
}

fn extract_amazon(url: &Url, segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("merchant", "Amazon");
    ex.part("Amazon");

    let marker = segments
        .iter()
        .position(|s| matches!(*s, "dp" | "product" | "ASIN" | "d"));

    let asin = marker
        .and_then(|i| segments.get(i + 1))
        .filter(|s| is_asin(s))
        .map(|s| s.to_ascii_uppercase());

    // The human-readable slug sits right before `/dp/`.
    let product = marker
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| segments.get(i))
        .filter(|s| !matches!(**s, "gp" | "exec" | "obidos"))
        .map(|s| pascal_words(s, 3))
        .filter(|s| !s.is_empty());

    let category = amazon_category(segments);

    match (&product, &asin) {
        (Some(name), _) => ex.part(name.clone()),
        (None, Some(asin)) => ex.part(asin.clone()),
        (None, None) => ex.part("Product"),
    }
    if category != "Product" {
        ex.part(category);
    }

    if let Some(name) = product {
        ex.field("product", name);
    }
    if let Some(asin) = asin {
        let host = url.host_str().unwrap_or("www.amazon.com");
        ex.field("canonicalUrl", format!("https://{}/dp/{}", host, asin));
        ex.field("asin", asin);
    }
    ex.field("category", category);

    ex
}

fn is_asin(s: &str) -> bool {
    s.len() == 10 && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn amazon_category(segments: &[&str]) -> &'static str {
    const CATEGORIES: &[(&str, &str)] = &[
        ("electronics", "Electronics"),
        ("books", "Books"),
        ("clothing", "Fashion"),
        ("fashion", "Fashion"),
        ("sports", "Sports"),
        ("home", "Home"),
        ("beauty", "Beauty"),
        ("toys", "Toys"),
    ];

    segments
        .iter()
        .find_map(|seg| {
            let lower = seg.to_ascii_lowercase();
            CATEGORIES
                .iter()
                .find(|(key, _)| lower == *key)
                .map(|(_, name)| *name)
        })
        .unwrap_or("Product")
}

fn extract_youtube(url: &Url, host: &str, segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("platform", "YouTube");
    ex.part("YouTube");

    let is_short = segments.first() == Some(&"shorts");

    let video_id = if host == "youtu.be" {
        segments.first().map(|s| s.to_string())
    } else {
        match segments.first().copied() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts" | "embed" | "v" | "live") => segments.get(1).map(|s| s.to_string()),
            _ => None,
        }
    }
    .filter(|id| {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    });

    ex.field("type", if is_short { "Short" } else { "Video" });

    if let Some(id) = video_id {
        if is_short {
            ex.part("Short");
        }
        ex.part(id.clone());
        ex.field("videoId", id);
    } else if let Some(handle) = segments.first().and_then(|s| s.strip_prefix('@')) {
        ex.field("channel", handle);
        ex.part(handle);
    } else {
        ex.part("Video");
    }

    ex
}

fn extract_github(host: &str, segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("platform", "GitHub");
    ex.part("GitHub");

    if host == "gist.github.com" {
        ex.field("type", "Gist");
        ex.part("Gist");
        if let Some(owner) = segments.first() {
            ex.field("username", *owner);
            ex.part(*owner);
        }
        if let Some(id) = segments.get(1) {
            ex.field("gistId", *id);
        }
        return ex;
    }

    let owner = segments.first().copied();
    let repo = segments.get(1).map(|r| r.trim_end_matches(".git"));

    if let Some(owner) = owner {
        ex.field("username", owner);
        ex.part(owner);
    }
    if let Some(repo) = repo {
        ex.field("repo", repo);
        ex.part(repo);
    }

    let (kind, number) = match (segments.get(2).copied(), segments.get(3)) {
        (Some("issues"), Some(n)) if is_number(n) => ("Issue", Some(*n)),
        (Some("pull"), Some(n)) if is_number(n) => ("PR", Some(*n)),
        _ => ("Repo", None),
    };
    ex.field("type", kind);

    if let Some(n) = number {
        ex.field("number", n);
        ex.part(kind);
        ex.part(n);
    }

    ex
}

fn extract_twitter(segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("platform", "X");
    ex.part("X");

    let username = segments
        .first()
        .copied()
        .filter(|u| !matches!(*u, "i" | "home" | "search" | "intent" | "hashtag"));

    if let Some(user) = username {
        ex.field("username", user);
        ex.part(user);
    }

    if segments.get(1) == Some(&"status")
        && let Some(id) = segments.get(2).filter(|id| is_number(id))
    {
        ex.field("tweetId", *id);
        ex.field("type", "Tweet");
        ex.part("Tweet");
    }

    ex
}

fn extract_linkedin(segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("platform", "LinkedIn");
    ex.part("LinkedIn");

    let kind = match segments.first().copied() {
        Some("in") => Some("Profile"),
        Some("company") => Some("Company"),
        Some("pulse") => Some("Article"),
        _ => None,
    };

    if let Some(raw) = segments.get(1).filter(|_| kind.is_some()) {
        let name = pascal_words(raw, 3);
        ex.field("name", *raw);
        ex.part(name);
    }
    if let Some(kind) = kind {
        ex.field("type", kind);
        ex.part(kind);
    }

    ex
}

fn extract_reddit(host: &str, segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("platform", "Reddit");
    ex.part("Reddit");

    if host == "redd.it" {
        if let Some(id) = segments.first() {
            ex.field("postId", *id);
            ex.part(*id);
        }
        return ex;
    }

    if segments.first() != Some(&"r") {
        return ex;
    }

    if let Some(sub) = segments.get(1) {
        ex.field("subreddit", *sub);
        ex.part(*sub);
    }

    if segments.get(2) == Some(&"comments") {
        if let Some(id) = segments.get(3) {
            ex.field("postId", *id);
        }
        let title = segments
            .get(4)
            .map(|t| pascal_words(t, 2))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Post".to_string());
        ex.field("title", title.clone());
        ex.part(title);
    }

    ex
}

fn extract_medium(host: &str, segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("platform", "Medium");
    ex.part("Medium");

    // Publications live either at medium.com/@author or author.medium.com.
    let (author, title_seg) = match segments.first() {
        Some(first) if first.starts_with('@') => {
            (Some(first.trim_start_matches('@')), segments.get(1))
        }
        _ => match host.strip_suffix(".medium.com") {
            Some(sub) => (Some(sub), segments.first()),
            None => (segments.first().copied(), segments.get(1)),
        },
    };

    if let Some(author) = author {
        ex.field("author", author);
        ex.part(author);
    }
    if let Some(seg) = title_seg {
        let title = pascal_words(&strip_medium_id(seg), 3);
        if !title.is_empty() {
            ex.field("title", title.clone());
            ex.part(title);
        }
    }

    ex
}

/// Medium appends a hex post id to every article slug.
fn strip_medium_id(seg: &str) -> String {
    match seg.rsplit_once('-') {
        Some((head, tail))
            if tail.len() >= 8
                && tail.chars().all(|c| c.is_ascii_hexdigit())
                && tail.chars().any(|c| c.is_ascii_digit()) =>
        {
            head.to_string()
        }
        _ => seg.to_string(),
    }
}

fn extract_nytimes(host: &str, segments: &[&str]) -> Extraction {
    let mut ex = Extraction::default();
    ex.field("publication", "NYTimes");
    ex.part("NYTimes");

    if host == "nyti.ms" {
        if let Some(code) = segments.first() {
            ex.field("shortCode", *code);
            ex.part(*code);
        }
        return ex;
    }

    let dated = segments.len() >= 4
        && segments[0].len() == 4
        && is_number(segments[0])
        && is_number(segments[1])
        && is_number(segments[2]);

    if !dated {
        if let Some(last) = segments.last() {
            let headline = pascal_words(&strip_extension(last), 3);
            ex.part(headline);
        }
        return ex;
    }

    let (year, month, day) = (segments[0], segments[1], segments[2]);
    ex.field("year", year);
    ex.field("month", month);
    ex.field("day", day);

    if segments.len() > 4 {
        ex.field("category", pascal_words(segments[3], 1));
    } else {
        ex.field("category", "News");
    }

    if let Some(last) = segments.last() {
        let headline = pascal_words(&strip_extension(last), 3);
        if !headline.is_empty() {
            ex.field("headline", headline.clone());
            ex.part(headline);
        }
    }
    ex.part(year);

    ex
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn strip_extension(seg: &str) -> String {
    const EXTENSIONS: &[&str] = &[".html", ".htm", ".php", ".aspx", ".asp", ".jsp"];

    EXTENSIONS
        .iter()
        .find_map(|ext| seg.strip_suffix(ext))
        .unwrap_or(seg)
        .to_string()
}

/// Splits `text` into words and PascalCases up to `max` of them, dot-joined.
/// Purely numeric words are dropped.
pub(crate) fn pascal_words(text: &str, max: usize) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty() && !is_number(w))
        .take(max)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(".")
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}
