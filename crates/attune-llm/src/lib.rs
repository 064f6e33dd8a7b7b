//! LLM integration: the completion seam and an OpenAI-compatible client.

pub mod openai;

pub use openai::{CompletionError, OpenAiClient};

use async_trait::async_trait;
use attune_core::Prompt;

/// Produces a single text completion for a rendered prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CompletionError>;

    /// Model identifier requested from the provider.
    fn model(&self) -> &str;
}
