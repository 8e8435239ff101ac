//! Slug suggestion model and the synthetic multi-style fallback.

use crate::domain::slug::fallback::{path_words, registrable_label};
use crate::domain::slug::patterns::capitalize;
use crate::domain::slug::sanitize;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use url::Url;

/// The angle a suggestion takes on the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStyle {
    BrandFocused,
    ProductFocused,
    FeatureFocused,
    BenefitFocused,
    ActionFocused,
}

impl SuggestionStyle {
    /// Every style, in the order suggestions are presented.
    pub const ALL: [SuggestionStyle; 5] = [
        SuggestionStyle::BrandFocused,
        SuggestionStyle::ProductFocused,
        SuggestionStyle::FeatureFocused,
        SuggestionStyle::BenefitFocused,
        SuggestionStyle::ActionFocused,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionStyle::BrandFocused => "brand_focused",
            SuggestionStyle::ProductFocused => "product_focused",
            SuggestionStyle::FeatureFocused => "feature_focused",
            SuggestionStyle::BenefitFocused => "benefit_focused",
            SuggestionStyle::ActionFocused => "action_focused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == s)
    }

    /// Canned explanation used when the backend gives none.
    pub fn reasoning(self) -> &'static str {
        match self {
            SuggestionStyle::BrandFocused => "Starts with trusted brand name for recognition",
            SuggestionStyle::ProductFocused => "Describes what the product does",
            SuggestionStyle::FeatureFocused => "Emphasizes key capability",
            SuggestionStyle::BenefitFocused => "Focuses on user benefits",
            SuggestionStyle::ActionFocused => "Creates urgency and action",
        }
    }

    /// Guesses a style from the words in `slug`, falling back to position.
    pub fn infer(slug: &str, index: usize) -> Self {
        const ACTION: &[&str] = &["buy", "deal", "sale", "now", "shop", "get", "today"];
        const BENEFIT: &[&str] = &["best", "top", "premium", "pro", "plus", "free"];
        const FEATURE: &[&str] = &["smart", "wireless", "portable", "advanced", "voice"];
        const BRANDS: &[&str] = &["amazon", "nike", "apple", "google", "samsung", "sony"];

        let lower = slug.to_ascii_lowercase();
        let words: Vec<&str> = lower.split(['.', '-']).collect();
        let has_any = |list: &[&str]| words.iter().any(|w| list.contains(w));

        if has_any(ACTION) {
            SuggestionStyle::ActionFocused
        } else if has_any(BENEFIT) {
            SuggestionStyle::BenefitFocused
        } else if has_any(FEATURE) {
            SuggestionStyle::FeatureFocused
        } else if words.first().is_some_and(|w| BRANDS.contains(w)) {
            SuggestionStyle::BrandFocused
        } else {
            Self::ALL[index % Self::ALL.len()]
        }
    }
}

/// A candidate slug surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub slug: String,
    pub style: SuggestionStyle,
    pub confidence: f64,
    pub reasoning: String,
    pub preview_url: String,
}

impl Suggestion {
    pub fn new(
        slug: String,
        style: SuggestionStyle,
        confidence: f64,
        reasoning: String,
        base_url: &str,
    ) -> Self {
        let preview_url = format!("{}/{}", base_url.trim_end_matches('/'), slug);
        Self {
            id: suggestion_id(),
            slug,
            style,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning,
            preview_url,
        }
    }
}

/// Random 12-character URL-safe identifier.
pub fn suggestion_id() -> String {
    let mut bytes = [0u8; 9];
    if getrandom::fill(&mut bytes).is_err() {
        // OS entropy unavailable; ids only need to be unique within one response.
        bytes = rand::random();
    }
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Builds one suggestion per requested style from the URL structure and
/// keywords, without any backend.
///
/// Confidence starts at 0.75 and drops by 0.05 per position. Slugs that
/// sanitize to nothing are skipped, so fewer than `styles.len()` items may
/// come back.
pub fn synthesize(
    url: &str,
    keywords: &[String],
    styles: &[SuggestionStyle],
    base_url: &str,
) -> Vec<Suggestion> {
    let parsed = Url::parse(url).ok();

    let domain = parsed
        .as_ref()
        .and_then(|u| u.host_str())
        .map(|h| capitalize(registrable_label(&h.to_ascii_lowercase())))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "Link".to_string());

    let path: Vec<String> = parsed
        .as_ref()
        .map(path_words)
        .unwrap_or_default()
        .iter()
        .take(3)
        .map(|w| capitalize(w))
        .collect();

    let kw: Vec<String> = keywords
        .iter()
        .map(|k| sanitize(k))
        .filter(|k| !k.is_empty())
        .map(|k| capitalize(&k))
        .collect();

    let pick = |list: &[String], i: usize, default: &str| -> String {
        list.get(i).cloned().unwrap_or_else(|| default.to_string())
    };

    styles
        .iter()
        .enumerate()
        .filter_map(|(i, &style)| {
            let raw = match style {
                SuggestionStyle::BrandFocused => {
                    format!("{}.{}.{}", domain, pick(&path, 0, "Product"), pick(&path, 1, "Item"))
                }
                SuggestionStyle::ProductFocused => format!(
                    "{}.{}.{}",
                    pick(&path, 0, "Product"),
                    pick(&path, 1, "Category"),
                    pick(&kw, 0, "Item")
                ),
                SuggestionStyle::FeatureFocused => format!(
                    "{}.{}.{}",
                    pick(&kw, 0, "Smart"),
                    pick(&kw, 1, "Feature"),
                    pick(&path, 0, "Device")
                ),
                SuggestionStyle::BenefitFocused => {
                    format!("Best.{}.{}", pick(&path, 0, domain.as_str()), pick(&kw, 0, "Deal"))
                }
                SuggestionStyle::ActionFocused => {
                    format!("{}.{}.Today", pick(&path, 0, domain.as_str()), pick(&kw, 0, "Deal"))
                }
            };

            let slug = sanitize(&raw);
            (!slug.is_empty()).then(|| {
                Suggestion::new(
                    slug,
                    style,
                    0.75 - 0.05 * i as f64,
                    format!("Fallback {} suggestion based on URL structure", style.as_str()),
                    base_url,
                )
            })
        })
        .collect()
}
