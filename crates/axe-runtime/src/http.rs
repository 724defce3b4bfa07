//! Shared HTTP plumbing for the reqwest-based providers.

use std::time::Duration;

use axe_core::ModelError;
use reqwest::{Client, Response, StatusCode};

/// Longest slice of an error body carried into a `ModelError`
const MAX_ERROR_BODY: usize = 200;

pub fn client(timeout_secs: u64) -> Result<Client, ModelError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))
}

/// Map a transport-level failure
pub fn transport_error(provider: &str, err: &reqwest::Error) -> ModelError {
    if err.is_connect() || err.is_timeout() {
        ModelError::Unavailable(format!("{provider}: {err}"))
    } else {
        ModelError::Provider(format!("{provider}: {err}"))
    }
}

/// Map a non-success status, consuming the response body for context
pub async fn status_error(provider: &str, response: Response) -> ModelError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = format!("{provider} returned {status}: {}", truncate(&body));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited(detail),
        s if s.is_server_error() => ModelError::Unavailable(detail),
        _ => ModelError::Provider(detail),
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= MAX_ERROR_BODY + 3);
    }

    #[test]
    fn test_truncate_short_body() {
        assert_eq!(truncate("nope"), "nope");
    }
}
