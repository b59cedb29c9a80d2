use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError};

pub const RATER_HEADER: &str = "X-Rater-Id";

/// Guards movie creation with the static `AUTH_TOKEN` bearer token.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = state.config.auth_token.as_deref() else {
        return Err(anyhow::anyhow!("AUTH_TOKEN not configured").into());
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented != Some(token) {
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    }

    Ok(next.run(request).await)
}

pub fn rater_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(RATER_HEADER).and_then(|v| v.to_str().ok())
}
