//! Gemini Provider
//!
//! Implementation of `LlmProvider` for Google's Generative Language API.
//! System instructions travel out-of-band in `systemInstruction`.

use async_trait::async_trait;
use axe_core::{
    error::{ModelError, Result},
    message::{Message, Role, split_system},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http;

const PROVIDER: &str = "Gemini";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini provider configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API base URL (no trailing slash)
    pub base_url: String,

    /// Google API key
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
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

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create from configuration
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::Config("Google API key is empty".into()));
        }
        Ok(Self {
            client: http::client(config.timeout_secs)?,
            config,
        })
    }

    /// Model names may arrive with or without the `models/` prefix
    fn model_path(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn build_request<'a>(messages: &'a [Message], opts: &'a GenerationOptions) -> GenerateRequest<'a> {
        let (system, turns) = split_system(messages);

        GenerateRequest {
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            contents: turns
                .into_iter()
                .map(|m| Content {
                    role: Some(match m.role {
                        Role::Assistant => "model",
                        Role::User | Role::System => "user",
                    }),
                    parts: vec![Part {
                        text: m.content.clone(),
                    }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: opts.temperature,
                top_p: opts.top_p,
                max_output_tokens: opts.max_tokens,
                stop_sequences: (!opts.stop_sequences.is_empty())
                    .then_some(opts.stop_sequences.as_slice()),
            },
        }
    }

    /// A blocked or empty candidate yields empty content; parsing downstream
    /// decides what to do with it.
    fn convert_completion(response: GenerateResponse, model: &str) -> Completion {
        let candidate = response.candidates.into_iter().next();
        let finish_reason = match &candidate {
            Some(c) => c.finish_reason.as_deref().map(FinishReason::from_provider),
            None => Some(FinishReason::ContentFilter),
        };

        let content: String = candidate
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            tracing::warn!(finish_reason = ?finish_reason, "Gemini returned no text");
        }

        Completion {
            content,
            model: model.to_string(),
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            truncated: finish_reason == Some(FinishReason::Length),
            finish_reason,
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
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
                tracing::warn!("Gemini health check failed: {}", e);
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
        let url = format!(
            "{}/v1beta/{}:generateContent",
            self.config.base_url,
            Self::model_path(&options.model)
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| http::transport_error(PROVIDER, &e))?;

        if !response.status().is_success() {
            return Err(http::status_error(PROVIDER, response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Provider(format!("{PROVIDER}: unreadable response: {e}")))?;

        Ok(Self::convert_completion(body, &options.model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/v1beta/models", self.config.base_url);
        let response = self
            .client
            .get(url)
            .header("x-goog-api-key", &self.config.api_key)
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
            .models
            .into_iter()
            .map(|m| {
                let id = m.name.trim_start_matches("models/").to_string();
                ModelInfo {
                    name: m.display_name.unwrap_or_else(|| id.clone()),
                    id,
                    context_length: m.input_token_limit,
                }
            })
            .collect())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<&'a [String]>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    input_token_limit: Option<u32>,
}
