//! Completion service abstraction and HTTP backends.
//!
//! The pipeline only ever talks to [`CompletionService`]; concrete backends
//! ([`OllamaClient`], [`OpenRouterClient`]) are picked from [`LlmConfig`] by
//! [`build_client`]. Tests substitute a scripted implementation.

pub mod ollama;
pub mod openrouter;

use std::sync::Arc;

use async_trait::async_trait;

use brochure_shared::{LlmConfig, LlmProvider, PromptPair, Result, validate_api_key};

pub use ollama::OllamaClient;
pub use openrouter::OpenRouterClient;

/// User-Agent string for completion requests.
pub(crate) const USER_AGENT: &str = concat!("brochure/", env!("CARGO_PKG_VERSION"));

/// Per-call sampling options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature. `0.0` is greedy decoding.
    pub temperature: f32,
    /// Ask the backend to constrain output to a JSON object.
    pub json: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            json: false,
        }
    }
}

impl CompletionOptions {
    /// Deterministic, JSON-constrained output.
    pub fn json() -> Self {
        Self {
            json: true,
            ..Self::default()
        }
    }
}

/// A text-completion backend taking a system + user message pair.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run one completion and return the response text.
    async fn complete(&self, prompt: &PromptPair, options: &CompletionOptions) -> Result<String>;

    /// Model identifier used for requests.
    fn model_name(&self) -> &str;
}

/// Construct the configured completion backend.
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn CompletionService>> {
    match config.provider {
        LlmProvider::Ollama => Ok(Arc::new(OllamaClient::new(config)?)),
        LlmProvider::OpenRouter => {
            validate_api_key(config)?;
            Ok(Arc::new(OpenRouterClient::new(config)?))
        }
    }
}
