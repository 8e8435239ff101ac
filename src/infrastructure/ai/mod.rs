//! AI text backend used for slug suggestions.
//!
//! The core only needs `complete(prompt, timeout) -> text`. Prompt building
//! and lenient parsing of the model's answer live here as well, so the
//! suggestion service deals purely in candidate slugs.

mod anthropic;
mod error;
mod parse;
mod prompt;

pub use anthropic::AnthropicBackend;
pub use error::AiError;
pub use parse::{RawSuggestion, parse_suggestions};
pub use prompt::{AiPrompt, PromptContext};

use async_trait::async_trait;
use std::time::Duration;

/// A language-model completion endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Sends `prompt` and returns the model's text answer.
    ///
    /// `timeout` bounds the whole exchange; callers additionally enforce
    /// their own deadline around this call.
    async fn complete(&self, prompt: &AiPrompt, timeout: Duration) -> Result<String, AiError>;

    /// Model identifier for logs and health output.
    fn model(&self) -> String;
}
