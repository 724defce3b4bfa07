//! Error Types for the Spending Analyzer

use axe_core::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Failures that abort an analysis.
///
/// A malformed model response is not among them: each stage substitutes
/// fallback content instead.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Upstream model error: {0}")]
    Upstream(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalyzerError {
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream(e) => e.user_message(),
            Self::Config(_) => "The analyzer is not configured correctly.".into(),
        }
    }
}
