//! HTTP Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use axe_core::provider::ModelInfo;
use spending_analyzer::{AnalysisRequest, AnalysisResult};

use crate::state::AppState;

const ANALYSIS_FAILED: &str = "Error analyzing spending";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
    pub provider_connected: bool,
}

/// Body of `POST /api/analyze`. Fields are optional here so a missing
/// field can be reported as such instead of as a generic decode error.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub actual_spent: Option<Decimal>,
    #[serde(default)]
    pub spending_reason: Option<String>,
    #[serde(default)]
    pub spending_category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            detail: detail.into(),
        }),
    )
}

impl AnalyzeRequest {
    /// Budget is not collected over HTTP and is always zero
    fn into_analysis_request(self) -> Result<AnalysisRequest, ApiError> {
        let reason = self.spending_reason.filter(|r| !r.trim().is_empty());
        let (Some(actual_spent), Some(reason)) = (self.actual_spent, reason) else {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Missing required fields",
                "actual_spent and spending_reason are required",
            ));
        };

        let mut request = AnalysisRequest::new(actual_spent, reason);
        if let Some(category) = self.spending_category {
            request = request.with_category(category);
        }
        Ok(request)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider_name.clone(),
        model: state.model.clone(),
        provider_connected,
    })
}

/// Models reported by the configured provider
pub async fn list_models(State(state): State<AppState>) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    state.provider.list_models().await.map(Json).map_err(|e| {
        tracing::warn!("Model listing failed: {}", e);
        api_error(StatusCode::BAD_GATEWAY, e.user_message(), "Error listing models")
    })
}

/// Analyze one overspending event
pub async fn analyze_spending(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        api_error(StatusCode::BAD_REQUEST, rejection.body_text(), ANALYSIS_FAILED)
    })?;
    let request = payload.into_analysis_request()?;

    let result = state.analyzer.analyze(request).await.map_err(|e| {
        tracing::error!("Analysis error: {}", e);
        let status = if e.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        api_error(status, e.user_message(), ANALYSIS_FAILED)
    })?;

    Ok(Json(result))
}
