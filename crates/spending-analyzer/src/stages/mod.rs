//! Analysis Stages
//!
//! Each stage takes the per-request state by value, makes exactly one model
//! call, and hands the state back with its outputs filled in.

mod reason_analyzer;
mod recommendation_generator;

pub use reason_analyzer::ReasonAnalyzer;
pub use recommendation_generator::RecommendationGenerator;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AnalysisState, Step};

/// One step of the analysis pipeline
#[async_trait]
pub trait Stage: Send + Sync {
    /// Label recorded in the state's diagnostic log
    fn step(&self) -> Step;

    /// Run the stage. Fails only when the model client itself fails.
    async fn run(&self, state: AnalysisState) -> Result<AnalysisState>;
}
