//! # spending-analyzer
//!
//! Explains a single overspending event in psychological terms and suggests
//! ways to cope, by asking a language model twice.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────┐    ┌─────────────────────┐    ┌────────────────────────┐
//! │ AnalysisRequest  │──▶│   Reason Analyzer   │──▶│ Recommendation         │──▶ AnalysisResult
//! │ amount, reason,  │    │ underlying reason + │    │ Generator              │
//! │ category         │    │ up to 3 triggers    │    │ up to 4 {action, why}  │
//! └──────────────────┘    └─────────────────────┘    └────────────────────────┘
//! ```
//!
//! ## Failure policy
//!
//! - The model client failing (unreachable, rate limited, bad credentials)
//!   aborts the analysis with [`AnalyzerError::Upstream`].
//! - The model answering with something unparseable does not: each stage
//!   substitutes fixed fallback content, so a result always carries a reason,
//!   triggers and recommendations.
//!
//! ## Example
//!
//! ```rust,ignore
//! let analyzer = SpendingAnalyzer::builder()
//!     .provider(provider)
//!     .model("gemini-1.5-flash")
//!     .build()?;
//!
//! let request = AnalysisRequest::new(dec!(250), "friends picked an expensive place")
//!     .with_category("dining");
//! let result = analyzer.analyze(request).await?;
//! ```

pub mod error;
pub mod fallback;
pub mod model;
pub mod parsing;
pub mod pipeline;
pub mod prompts;
pub mod stages;

pub use error::{AnalyzerError, Result};
pub use model::{
    AnalysisRequest, AnalysisResult, AnalysisState, Phase, ReasonAnalysis, Recommendation, Step,
};
pub use parsing::{Outcome, strip_fence};
pub use pipeline::{SpendingAnalyzer, SpendingAnalyzerBuilder};
pub use stages::{ReasonAnalyzer, RecommendationGenerator, Stage};
