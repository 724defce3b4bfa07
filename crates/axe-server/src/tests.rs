//! Router tests

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::post,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use axe_core::{LlmProvider, ModelError, ScriptedProvider};
use axe_runtime::{GeminiConfig, GeminiProvider};
use spending_analyzer::{SpendingAnalyzer, fallback};

use super::*;

const REASON: &str = r#"{"underlying_reason": "Keeping up with the table mattered more than the budget.", "triggers": ["Social pressure", "FOMO"]}"#;
const RECOMMENDATIONS: &str = r#"```json
[{"action": "Pick the restaurant yourself", "why": "You set the price range."}]
```"#;

fn app(provider: Arc<dyn LlmProvider>) -> Router {
    let analyzer = SpendingAnalyzer::builder()
        .provider(provider.clone())
        .build()
        .unwrap();
    router(AppState {
        analyzer: Arc::new(analyzer),
        provider,
        provider_name: "scripted".into(),
        model: "scripted".into(),
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_analyze_success() {
    let provider = Arc::new(ScriptedProvider::with_responses([REASON, RECOMMENDATIONS]));

    let response = app(provider)
        .oneshot(post_json(
            "/api/analyze",
            &json!({
                "actual_spent": 250,
                "spending_reason": "friends wanted this restaurant, everyone ordered expensive drinks",
                "spending_category": "dining"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["behavioral_triggers"], json!(["Social pressure", "FOMO"]));
    assert_eq!(json["recommendations"][0]["action"], "Pick the restaurant yourself");
    assert_eq!(json["actual_spent"], json!(250.0));
    assert_eq!(json["category"], "dining");
    assert!(json["spending_reason"].as_str().unwrap().starts_with("friends"));
}

#[tokio::test]
async fn test_analyze_defaults_category_and_coerces_amount() {
    let provider = Arc::new(ScriptedProvider::with_responses(["garbage", "garbage"]));

    let response = app(provider.clone())
        .oneshot(post_json(
            "/api/analyze",
            &json!({"actual_spent": "19.99", "spending_reason": "midnight snack delivery"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["category"], "general");
    assert_eq!(json["actual_spent"], json!(19.99));
    assert_eq!(
        json["recommendations"].as_array().unwrap().len(),
        fallback::DEFAULT_RECOMMENDATIONS.len()
    );

    let calls = provider.calls().await;
    assert!(calls[0].messages[1].content.contains("$19.99"));
}

#[tokio::test]
async fn test_missing_fields() {
    let provider = Arc::new(ScriptedProvider::new());

    for body in [
        json!({"spending_reason": "shoes"}),
        json!({"actual_spent": 40}),
        json!({"actual_spent": 40, "spending_reason": "   "}),
    ] {
        let response = app(provider.clone())
            .oneshot(post_json("/api/analyze", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing required fields");
    }
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn test_non_numeric_amount_is_bad_request() {
    let provider = Arc::new(ScriptedProvider::new());

    let response = app(provider.clone())
        .oneshot(post_json(
            "/api/analyze",
            &json!({"actual_spent": "a lot", "spending_reason": "vacation"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let provider = Arc::new(ScriptedProvider::new());
    provider
        .push_error(ModelError::RateLimited("quota exceeded".into()))
        .await;

    let response = app(provider.clone())
        .oneshot(post_json(
            "/api/analyze",
            &json!({"actual_spent": 90, "spending_reason": "new game release"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Error analyzing spending");
    assert!(!json["error"].as_str().unwrap().contains("quota"));
    assert_eq!(provider.call_count().await, 1);
}

#[tokio::test]
async fn test_cors_preflight() {
    let response = app(Arc::new(ScriptedProvider::new()))
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/analyze")
                .header(header::ORIGIN, "https://axe-budget.app")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_health() {
    let response = app(Arc::new(ScriptedProvider::new()))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["provider_connected"], true);
}

#[tokio::test]
async fn test_list_models() {
    let response = app(Arc::new(ScriptedProvider::new()))
        .oneshot(Request::builder().uri("/api/models").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["id"], "scripted");
}

/// Gemini stand-in that answers every generation with an empty text part
async fn silent_gemini() -> String {
    let app = Router::new().route(
        "/v1beta/models/{action}",
        post(|| async {
            Json(json!({
                "candidates": [{"content": {"parts": [{"text": ""}]}, "finishReason": "STOP"}]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_empty_model_reply_returns_fallback_analysis() {
    let base = silent_gemini().await;
    let provider =
        GeminiProvider::from_config(GeminiConfig::new("g-test").with_base_url(base)).unwrap();

    let response = app(Arc::new(provider))
        .oneshot(post_json(
            "/api/analyze",
            &json!({"actual_spent": 60, "spending_reason": "treated myself after a bad week"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["underlying_reason"], fallback::DEFAULT_UNDERLYING_REASON);
    assert_eq!(json["behavioral_triggers"], json!(fallback::default_triggers()));
    assert_eq!(
        json["recommendations"].as_array().unwrap().len(),
        fallback::DEFAULT_RECOMMENDATIONS.len()
    );
}
