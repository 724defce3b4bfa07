//! Application State

use std::sync::Arc;

use axe_core::LlmProvider;
use spending_analyzer::SpendingAnalyzer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The analysis pipeline, built once at startup
    pub analyzer: Arc<SpendingAnalyzer>,

    /// Model provider behind the analyzer (for health and model listing)
    pub provider: Arc<dyn LlmProvider>,

    /// Configured provider name (e.g., "google")
    pub provider_name: String,

    /// Configured model identifier
    pub model: String,
}
