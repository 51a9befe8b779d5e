mod anthropic;
mod factory;
mod ollama;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::{build_generator, build_provider, ProviderKind};
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_user_prompt, RECIPE_GENERATOR_PROMPT};

use async_trait::async_trait;
use std::error::Error;

/// Prompt pair sent to a completion provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User instruction
    pub user: String,
}

/// Unified trait for all text-completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Request a single free-text completion
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}
