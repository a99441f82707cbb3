use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use http::header::AUTHORIZATION;
use serde_json::json;
use subtle::ConstantTimeEq;

/// Header carrying the pre-shared key, alternative to `Authorization`.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Pre-shared key guarding every route.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

/// Middleware that rejects requests without the configured API key
pub async fn require_api_key(
    State(api_key): State<ApiKey>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let presented = extract_key_from_headers(req.headers())?;

    if !api_key.matches(presented) {
        tracing::warn!(uri = %req.uri(), "Rejected request with invalid API key");
        return Err(unauthorized("Invalid API key"));
    }

    Ok(next.run(req).await)
}

fn extract_key_from_headers(headers: &HeaderMap) -> Result<&str, Response> {
    let header = headers
        .get(API_KEY_HEADER)
        .or_else(|| headers.get(AUTHORIZATION))
        .ok_or_else(|| unauthorized("Missing API key"))?;

    header
        .to_str()
        .map(str::trim)
        .map_err(|_| unauthorized("Invalid API key header"))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "status_code": StatusCode::UNAUTHORIZED.as_u16(),
            "data": { "message": message }
        })),
    )
        .into_response()
}
