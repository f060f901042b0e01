use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::rate_limit::client_ip;
use crate::common::AppState;
use crate::error::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret check for `/api`.
///
/// Without a configured key every request passes, with a warning.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        tracing::warn!("API running without authentication (API_KEY not set)");
        return Ok(next.run(req).await);
    };

    let rejection = match req.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        None => Some("Acesso não autorizado. API Key ausente."),
        Some(key) if key != expected => Some("Acesso não autorizado. API Key inválida."),
        Some(_) => None,
    };

    let Some(rejection) = rejection else {
        return Ok(next.run(req).await);
    };

    tracing::warn!(
        client_ip = ?client_ip(&req),
        path = %req.uri().path(),
        reason = rejection,
        "Rejected API request"
    );
    Err(AppError::Unauthorized(rejection.to_string()))
}
