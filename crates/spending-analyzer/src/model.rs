//! Domain Models
//!
//! Request, per-request state and result of a spending analysis.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "general";

/// Most behavioral triggers kept from a model response
pub const MAX_TRIGGERS: usize = 3;

/// Most recommendations kept from a model response
pub const MAX_RECOMMENDATIONS: usize = 4;

fn default_category() -> String {
    DEFAULT_CATEGORY.into()
}

/// A single reported overspending event.
///
/// Amounts are passed through untouched: zero budgets and negative or
/// nonsensical values are not rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// What the user meant to spend
    #[serde(default)]
    pub budget_amount: Decimal,

    /// What the user actually spent
    pub actual_spent: Decimal,

    /// The user's own explanation
    pub spending_reason: String,

    /// Free-text category (e.g., "dining")
    #[serde(default = "default_category")]
    pub spending_category: String,
}

impl AnalysisRequest {
    pub fn new(actual_spent: Decimal, spending_reason: impl Into<String>) -> Self {
        Self {
            budget_amount: Decimal::ZERO,
            actual_spent,
            spending_reason: spending_reason.into(),
            spending_category: default_category(),
        }
    }

    #[must_use]
    pub const fn with_budget(mut self, budget_amount: Decimal) -> Self {
        self.budget_amount = budget_amount;
        self
    }

    /// Set the category; blank input keeps the default
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !category.trim().is_empty() {
            self.spending_category = category;
        }
        self
    }
}

/// One coping technique and the reason it works
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    #[serde(default)]
    pub why: String,
}

impl Recommendation {
    pub fn new(action: impl Into<String>, why: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            why: why.into(),
        }
    }
}

/// Pipeline step that produced a raw model output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Analysis,
    Recommendations,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analysis => write!(f, "analysis"),
            Self::Recommendations => write!(f, "recommendations"),
        }
    }
}

/// Raw model output kept for diagnostics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepOutput {
    pub step: Step,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

/// Where a request is in the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AnalyzingReason,
    GeneratingRecommendations,
    Done,
}

/// Psychological explanation produced by the first stage
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReasonAnalysis {
    pub underlying_reason: String,
    pub triggers: Vec<String>,
}

/// Per-request working state, moved from stage to stage.
///
/// Outputs are only written through methods that enforce the trigger and
/// recommendation caps.
#[derive(Clone, Debug)]
pub struct AnalysisState {
    /// Correlates log lines of one request
    pub id: Uuid,
    pub request: AnalysisRequest,
    phase: Phase,
    underlying_reason: String,
    behavioral_triggers: Vec<String>,
    recommendations: Vec<Recommendation>,
    log: Vec<StepOutput>,
}

impl AnalysisState {
    pub fn new(request: AnalysisRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            phase: Phase::AnalyzingReason,
            underlying_reason: String::new(),
            behavioral_triggers: Vec::new(),
            recommendations: Vec::new(),
            log: Vec::new(),
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) const fn advance(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn underlying_reason(&self) -> &str {
        &self.underlying_reason
    }

    pub fn behavioral_triggers(&self) -> &[String] {
        &self.behavioral_triggers
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Raw model outputs in the order they arrived
    pub fn log(&self) -> &[StepOutput] {
        &self.log
    }

    pub fn record(&mut self, step: Step, content: impl Into<String>) {
        self.log.push(StepOutput {
            step,
            content: content.into(),
            recorded_at: Utc::now(),
        });
    }

    pub fn apply_reason(&mut self, analysis: ReasonAnalysis) {
        let ReasonAnalysis {
            underlying_reason,
            mut triggers,
        } = analysis;
        triggers.truncate(MAX_TRIGGERS);

        self.underlying_reason = underlying_reason;
        self.behavioral_triggers = triggers;
    }

    pub fn apply_recommendations(&mut self, mut recommendations: Vec<Recommendation>) {
        recommendations.truncate(MAX_RECOMMENDATIONS);
        self.recommendations = recommendations;
    }

    /// Extract the caller-facing view, discarding the diagnostic log
    pub fn into_result(self) -> AnalysisResult {
        AnalysisResult {
            underlying_reason: self.underlying_reason,
            behavioral_triggers: self.behavioral_triggers,
            recommendations: self.recommendations,
            spending_reason: self.request.spending_reason,
            actual_spent: self.request.actual_spent,
            category: self.request.spending_category,
        }
    }
}

/// Final analysis returned to the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub underlying_reason: String,
    pub behavioral_triggers: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub spending_reason: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub actual_spent: Decimal,
    pub category: String,
}
