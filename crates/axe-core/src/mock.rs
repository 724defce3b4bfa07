//! Scripted Provider
//!
//! For testing and demo purposes. Replays queued responses in order and keeps
//! every prompt it was sent.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ModelError, Result};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo};

/// A prompt as received by the scripted provider
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

/// Provider that answers from a fixed script
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that answers with each text in order
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::default(),
        }
    }

    /// Queue a text response
    pub async fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub async fn push_error(&self, error: ModelError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Every prompt received so far
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of completions requested so far
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Scripted".into(),
            models: vec![ModelInfo::named("scripted")],
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.calls.lock().await.push(RecordedCall {
            messages: messages.to_vec(),
            options: options.clone(),
        });

        let next = self.responses.lock().await.pop_front();
        match next {
            Some(Ok(text)) => Ok(Completion::text(text, options.model.clone())),
            Some(Err(e)) => Err(e),
            None => Err(ModelError::Unavailable("script exhausted".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let provider = ScriptedProvider::with_responses(["first", "second"]);
        let opts = GenerationOptions::default();
        let prompt = [Message::user("hi")];

        assert_eq!(provider.complete(&prompt, &opts).await.unwrap().content, "first");
        assert_eq!(provider.complete(&prompt, &opts).await.unwrap().content, "second");
        assert!(matches!(
            provider.complete(&prompt, &opts).await,
            Err(ModelError::Unavailable(_))
        ));
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_queued_error() {
        let provider = ScriptedProvider::new();
        provider.push_error(ModelError::RateLimited("slow down".into())).await;

        let result = provider
            .complete(&[Message::user("hi")], &GenerationOptions::default())
            .await;
        assert!(matches!(result, Err(ModelError::RateLimited(_))));
    }
}
