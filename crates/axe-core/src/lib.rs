//! # axe-core
//!
//! Provider-agnostic model client abstraction for the axe spending analyzer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  spending-analyzer pipeline                  │
//! │  ┌─────────────────┐        ┌───────────────────────────┐   │
//! │  │ Reason Analyzer │──────▶│ Recommendation Generator  │   │
//! │  └────────┬────────┘        └─────────────┬─────────────┘   │
//! │           └──────────────┬────────────────┘                 │
//! │                   ┌──────▼──────┐                           │
//! │                   │ LlmProvider │  (Gemini, OpenRouter, …)  │
//! │                   └─────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait lets the analyzer run against any hosted or local
//! model without knowing which one answers.

pub mod error;
pub mod message;
pub mod mock;
pub mod provider;

pub use error::{ModelError, Result};
pub use message::{Message, Role};
pub use mock::ScriptedProvider;
pub use provider::{Completion, GenerationOptions, LlmProvider};
