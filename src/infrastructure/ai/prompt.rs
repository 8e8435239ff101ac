//! Prompt construction for slug suggestions.

use crate::domain::slug::DetectionResult;
use std::fmt::Write;
use url::Url;

/// A system/user prompt pair for the Messages API.
#[derive(Debug, Clone, PartialEq)]
pub struct AiPrompt {
    pub system: String,
    pub user: String,
}

/// What the model is told about the destination.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub url: &'a str,
    pub keywords: &'a [String],
    pub count: usize,
    pub detected: Option<&'a DetectionResult>,
}

const SYSTEM_PROMPT: &str = "You are an expert at creating memorable, human-readable URL slugs. \
     You answer with JSON only.";

impl AiPrompt {
    /// Builds the suggestion prompt, including UTM campaign context and any
    /// pattern the detector recognized.
    pub fn for_suggestions(ctx: &PromptContext<'_>) -> Self {
        let mut user = String::new();

        let _ = writeln!(user, "Create URL slugs for: {}", ctx.url);

        if !ctx.keywords.is_empty() {
            let _ = writeln!(user, "Keywords to include: {}", ctx.keywords.join(", "));
        }

        let utm = utm_params(ctx.url);
        if !utm.is_empty() {
            let _ = writeln!(user, "\nCAMPAIGN CONTEXT:");
            for (key, value) in &utm {
                let _ = writeln!(user, "- {}: {}", key, value);
            }
        }

        if let Some(detected) = ctx.detected.filter(|d| d.matched) {
            let _ = writeln!(
                user,
                "\nRecognized site: {} (template {})",
                detected.pattern_name, detected.template
            );
            for (key, value) in &detected.extracted {
                let _ = writeln!(user, "- {}: {}", key, value);
            }
        }

        let _ = write!(
            user,
            r#"
OUTPUT REQUIREMENTS:

Generate exactly {count} slugs, each with a different approach:

1. Brand-focused (start with brand/company name)
2. Product-focused (emphasize what it is)
3. Feature-focused (highlight key features)
4. Benefit-focused (what user gets)
5. Action-focused (end with action word)

Format as JSON array:

[
  {{"slug": "Example.Slug.Here", "style": "brand_focused", "confidence": 0.95, "reasoning": "Why this works"}},
  ...
]

Rules:
- Use PascalCase (capitalize each word)
- Separate words with dots (.)
- Max 50 characters
- No special characters except dots
- Each slug MUST be unique and different in structure

Output only valid JSON array:"#,
            count = ctx.count
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

/// `utm_*` query parameters, in URL order.
pub fn utm_params(url: &str) -> Vec<(String, String)> {
    Url::parse(url)
        .map(|u| {
            u.query_pairs()
                .filter(|(k, v)| k.starts_with("utm_") && !v.is_empty())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slug::detect;

    #[test]
    fn test_prompt_mentions_url_keywords_and_count() {
        let keywords = vec!["running".to_string(), "shoes".to_string()];
        let prompt = AiPrompt::for_suggestions(&PromptContext {
            url: "https://www.hoka.com/clifton",
            keywords: &keywords,
            count: 3,
            detected: None,
        });

        assert!(prompt.user.contains("https://www.hoka.com/clifton"));
        assert!(prompt.user.contains("running, shoes"));
        assert!(prompt.user.contains("Generate exactly 3 slugs"));
        assert!(!prompt.user.contains("CAMPAIGN CONTEXT"));
    }

    #[test]
    fn test_prompt_includes_utm_context() {
        let url = "https://example.com/sale?utm_source=newsletter&utm_campaign=spring&ref=x";
        let prompt = AiPrompt::for_suggestions(&PromptContext {
            url,
            keywords: &[],
            count: 5,
            detected: None,
        });

        assert!(prompt.user.contains("CAMPAIGN CONTEXT"));
        assert!(prompt.user.contains("- utm_source: newsletter"));
        assert!(prompt.user.contains("- utm_campaign: spring"));
        assert!(!prompt.user.contains("- ref: x"));
    }

    #[test]
    fn test_prompt_includes_detected_pattern() {
        let detected = detect("https://github.com/facebook/react");
        let prompt = AiPrompt::for_suggestions(&PromptContext {
            url: "https://github.com/facebook/react",
            keywords: &[],
            count: 5,
            detected: Some(&detected),
        });

        assert!(prompt.user.contains("Recognized site: GitHub"));
        assert!(prompt.user.contains("- repo: react"));
    }

    #[test]
    fn test_utm_params() {
        assert_eq!(
            utm_params("https://x.io/?utm_medium=email"),
            vec![("utm_medium".to_string(), "email".to_string())]
        );
        assert!(utm_params("not a url").is_empty());
    }
}
