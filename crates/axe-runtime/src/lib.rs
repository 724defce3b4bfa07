//! # axe-runtime
//!
//! Concrete model providers for the axe spending analyzer.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google's Generative Language API
//! - **OpenRouter**: any model behind OpenRouter's OpenAI-compatible endpoint
//! - **Ollama** (feature `ollama`): local inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axe_runtime::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env()?;
//! let provider = config.build_provider()?;
//! let analyzer = SpendingAnalyzer::builder()
//!     .provider(provider)
//!     .options(config.generation_options())
//!     .build()?;
//! ```

pub mod config;
pub mod gemini;
mod http;
pub mod openrouter;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use config::{ProviderKind, RuntimeConfig};
pub use gemini::{GeminiConfig, GeminiProvider};
pub use openrouter::{OpenRouterConfig, OpenRouterProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use axe_core::{GenerationOptions, LlmProvider, Message, ModelError, Result, Role};
