//! OpenRouter Provider
//!
//! Implementation of `LlmProvider` for OpenRouter's OpenAI-compatible
//! chat completions endpoint.

use async_trait::async_trait;
use axe_core::{
    error::{ModelError, Result},
    message::Message,
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http;

const PROVIDER: &str = "OpenRouter";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Attribution headers OpenRouter shows on its dashboards
const REFERER: &str = "https://axe-budget.app";
const TITLE: &str = "Axe Behavioral Spending Analyzer";

/// OpenRouter provider configuration
#[derive(Clone, Debug)]
pub struct OpenRouterConfig {
    /// API base URL (no trailing slash)
    pub base_url: String,

    /// Bearer key
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout_secs: 120,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// OpenRouter LLM provider
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterProvider {
    /// Create from configuration
    pub fn from_config(config: OpenRouterConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::Config("OpenRouter API key is empty".into()));
        }
        Ok(Self {
            client: http::client(config.timeout_secs)?,
            config,
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
    }

    fn build_request<'a>(messages: &'a [Message], opts: &'a GenerationOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &opts.model,
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.to_string(),
                    content: &m.content,
                })
                .collect(),
            temperature: opts.temperature,
            top_p: opts.top_p,
            max_tokens: opts.max_tokens,
            stop: (!opts.stop_sequences.is_empty()).then_some(opts.stop_sequences.as_slice()),
        }
    }

    /// No choices or a null message yields empty content
    fn convert_completion(response: ChatResponse, model: &str) -> Completion {
        let choice = response.choices.into_iter().next();
        let finish_reason = choice
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(FinishReason::from_provider);
        let content = choice
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            tracing::warn!(finish_reason = ?finish_reason, "OpenRouter returned no text");
        }

        Completion {
            content,
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            truncated: finish_reason == Some(FinishReason::Length),
            finish_reason,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();
        Ok(ProviderInfo {
            name: PROVIDER.into(),
            models,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("OpenRouter health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = Self::build_request(messages, options);
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .authorized(self.client.post(url))
            .json(&request)
            .send()
            .await
            .map_err(|e| http::transport_error(PROVIDER, &e))?;

        if !response.status().is_success() {
            return Err(http::status_error(PROVIDER, response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Provider(format!("{PROVIDER}: unreadable response: {e}")))?;

        Ok(Self::convert_completion(body, &options.model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.config.base_url);
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| http::transport_error(PROVIDER, &e))?;

        if !response.status().is_success() {
            return Err(http::status_error(PROVIDER, response).await);
        }

        let body: ModelList = response
            .json()
            .await
            .map_err(|e| ModelError::Provider(format!("{PROVIDER}: unreadable model list: {e}")))?;

        Ok(body
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.name.unwrap_or_else(|| m.id.clone()),
                id: m.id,
                context_length: m.context_length,
            })
            .collect())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    context_length: Option<u32>,
}
