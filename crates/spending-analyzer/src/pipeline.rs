//! Orchestrator
//!
//! Threads one `AnalysisState` through both stages, strictly in order:
//!
//! ```text
//! AnalyzingReason ──▶ GeneratingRecommendations ──▶ Done
//! ```
//!
//! No retries, no branches. The second stage needs the first stage's output,
//! so the two model calls never overlap.

use std::sync::Arc;

use axe_core::{GenerationOptions, LlmProvider};
use tracing::Instrument;

use crate::error::{AnalyzerError, Result};
use crate::model::{AnalysisRequest, AnalysisResult, AnalysisState, Phase};
use crate::stages::{ReasonAnalyzer, RecommendationGenerator, Stage};

/// The spending analysis pipeline.
///
/// Holds no per-request data, so one instance can serve concurrent requests
/// as long as the provider can.
pub struct SpendingAnalyzer {
    reason: ReasonAnalyzer,
    recommendations: RecommendationGenerator,
}

impl SpendingAnalyzer {
    /// Create a pipeline whose stages share one provider and option set
    pub fn new(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> Self {
        Self {
            reason: ReasonAnalyzer::new(provider.clone(), options.clone()),
            recommendations: RecommendationGenerator::new(provider, options),
        }
    }

    pub fn builder() -> SpendingAnalyzerBuilder {
        SpendingAnalyzerBuilder::new()
    }

    /// Analyze one spending event
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        self.run(request).await.map(AnalysisState::into_result)
    }

    /// Analyze one spending event, returning the full final state
    /// (including the raw per-stage model outputs)
    pub async fn run(&self, request: AnalysisRequest) -> Result<AnalysisState> {
        let state = AnalysisState::new(request);
        let span = tracing::info_span!(
            "analysis",
            id = %state.id,
            category = %state.request.spending_category,
        );

        async move {
            tracing::debug!(phase = ?state.phase(), "starting");
            let mut state = self.reason.run(state).await?;

            state.advance(Phase::GeneratingRecommendations);
            tracing::debug!(
                phase = ?state.phase(),
                triggers = state.behavioral_triggers().len(),
                "reason analyzed"
            );
            let mut state = self.recommendations.run(state).await?;

            state.advance(Phase::Done);
            tracing::info!(
                triggers = state.behavioral_triggers().len(),
                recommendations = state.recommendations().len(),
                "analysis complete"
            );
            Ok::<_, AnalyzerError>(state)
        }
        .instrument(span)
        .await
    }
}

/// Builder for the spending analyzer
pub struct SpendingAnalyzerBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    options: GenerationOptions,
}

impl Default for SpendingAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpendingAnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            options: GenerationOptions::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.options.model = model.into();
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temp: f32) -> Self {
        self.options.temperature = temp;
        self
    }

    pub fn build(self) -> Result<SpendingAnalyzer> {
        let provider = self
            .provider
            .ok_or_else(|| AnalyzerError::Config("Provider is required".into()))?;

        Ok(SpendingAnalyzer::new(provider, self.options))
    }
}
