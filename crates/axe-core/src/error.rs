//! Error Types

use thiserror::Error;

/// Result type alias for model client operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Failures raised by a model client.
///
/// Every variant is an upstream failure as far as the analyzer is concerned:
/// a response that arrived but could not be parsed is not a `ModelError`.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Provider returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable or not responding
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ModelError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::Unavailable(_) => "The AI service is currently unavailable. Please try again.".into(),
            Self::RateLimited(_) => "You've made too many requests. Please wait a moment.".into(),
            Self::Auth(_) => "The AI service rejected our credentials.".into(),
            Self::Config(msg) => format!("The AI service is misconfigured: {msg}"),
        }
    }
}
