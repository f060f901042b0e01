use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check endpoint
///
/// Returns 200 OK if the service is running.
/// This endpoint is not rate-limited and suitable for Kubernetes probes.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceBanner {
    pub message: String,
    pub version: String,
    pub documentation: String,
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service name and version", body = ServiceBanner),
    ),
    tag = "health"
)]
pub async fn banner() -> Json<ServiceBanner> {
    Json(ServiceBanner {
        message: "Cold Chain Telemetria Sensores API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documentation: "/docs".to_string(),
    })
}
