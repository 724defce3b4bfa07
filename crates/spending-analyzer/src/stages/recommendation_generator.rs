//! Recommendation Generator
//!
//! Turns the reason analysis into a short list of evidence-based techniques.

use std::sync::Arc;

use async_trait::async_trait;
use axe_core::{GenerationOptions, LlmProvider, Message};

use super::Stage;
use crate::error::Result;
use crate::model::{AnalysisState, Step};
use crate::parsing::parse_recommendations;
use crate::prompts::{RECOMMENDATION_PROMPT, recommendation_user_message};

pub struct RecommendationGenerator {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl RecommendationGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    fn prompt(state: &AnalysisState) -> [Message; 2] {
        [
            Message::system(RECOMMENDATION_PROMPT),
            Message::user(recommendation_user_message(state)),
        ]
    }
}

#[async_trait]
impl Stage for RecommendationGenerator {
    fn step(&self) -> Step {
        Step::Recommendations
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
            "recommendations received"
        );

        let outcome = parse_recommendations(&completion.content);
        if outcome.is_fallback() {
            tracing::warn!(
                analysis_id = %state.id,
                "recommendation response unusable, substituting defaults"
            );
        }

        state.record(self.step(), completion.content);
        state.apply_recommendations(outcome.into_inner());
        Ok(state)
    }
}
