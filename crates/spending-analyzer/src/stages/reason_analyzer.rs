//! Reason Analyzer
//!
//! Asks the model for the psychological driver behind a spending event and
//! the behavioral triggers that fed it.

use std::sync::Arc;

use async_trait::async_trait;
use axe_core::{GenerationOptions, LlmProvider, Message};

use super::Stage;
use crate::error::Result;
use crate::model::{AnalysisState, Step};
use crate::parsing::parse_reason_analysis;
use crate::prompts::{REASON_ANALYSIS_PROMPT, reason_user_message};

pub struct ReasonAnalyzer {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl ReasonAnalyzer {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    fn prompt(state: &AnalysisState) -> [Message; 2] {
        [
            Message::system(REASON_ANALYSIS_PROMPT),
            Message::user(reason_user_message(&state.request)),
        ]
    }
}

#[async_trait]
impl Stage for ReasonAnalyzer {
    fn step(&self) -> Step {
        Step::Analysis
    }

    async fn run(&self, mut state: AnalysisState) -> Result<AnalysisState> {
        let completion = self
            .provider
            .complete(&Self::prompt(&state), &self.options)
            .await?;

        tracing::debug!(
            analysis_id = %state.id,
            model = %completion.model,
            chars = completion.content.len(),
            "reason analysis received"
        );

        let outcome = parse_reason_analysis(&completion.content);
        if outcome.is_fallback() {
            tracing::warn!(
                analysis_id = %state.id,
                "reason analysis response unusable, substituting defaults"
            );
        }

        state.record(self.step(), completion.content);
        state.apply_reason(outcome.into_inner());
        Ok(state)
    }
}
