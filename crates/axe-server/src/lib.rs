//! axe HTTP Server
//!
//! Axum router exposing the spending analyzer.

pub mod handlers;
pub mod state;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{analyze_spending, health_check, list_models};
pub use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    // Browser clients call from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        // Analysis
        .route("/api/analyze", post(analyze_spending))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
