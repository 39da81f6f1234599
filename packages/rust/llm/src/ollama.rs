//! Ollama chat backend (`POST /api/chat`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use brochure_shared::{BrochureError, LlmConfig, PromptPair, Result};

use crate::{CompletionOptions, CompletionService, USER_AGENT};

/// Client for a local (or remote) Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Create a client. No request is made until the first completion.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| BrochureError::Completion(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.resolved_base_url().to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionService for OllamaClient {
    async fn complete(&self, prompt: &PromptPair, options: &CompletionOptions) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            stream: false,
            format: options.json.then_some("json"),
            options: ChatOptions {
                temperature: options.temperature,
            },
        };

        debug!(model = %self.model, json = options.json, "sending ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                BrochureError::Completion(format!(
                    "{url}: {e}. Is the Ollama server running (`ollama serve`)?"
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrochureError::Completion(format!(
                "{url}: HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| BrochureError::Completion(format!("invalid ollama response: {e}")))?;

        Ok(chat.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
