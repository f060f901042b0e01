use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, HeaderValue, Request, Response};
use axum::response::IntoResponse;
use tower_governor::{key_extractor::KeyExtractor, GovernorError};

use crate::error::AppError;

pub const API_LIMIT_MESSAGE: &str =
    "Muitas requisições deste IP. Tente novamente em alguns minutos.";
pub const REPORT_LIMIT_MESSAGE: &str =
    "Limite de geração de relatórios excedido. Tente novamente em uma hora.";

/// Best-effort client address.
/// Tries X-Forwarded-For, X-Real-IP, then the peer address.
pub fn client_ip<T>(req: &Request<T>) -> Option<IpAddr> {
    forwarded_ip(req.headers()).or_else(|| {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    // First hop of the proxy chain
    let xff: Option<IpAddr> = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());

    xff.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    })
}

/// Buckets requests by client IP.
///
/// Requests without an identifiable address share the localhost bucket,
/// which keeps limiting effective behind Docker port mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req).unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)))
    }
}

/// Render a limiter rejection in the error envelope.
///
/// `message` is what the client sees on 429; other governor failures map to 500.
pub fn rejection(message: &'static str, error: GovernorError) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, .. } => {
            tracing::warn!(wait_seconds = wait_time, "Rate limit exceeded");
            let mut response = AppError::TooManyRequests(message).into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(wait_time));
            response
        }
        other => AppError::Internal(format!("Rate limiter failure: {other}")).into_response(),
    }
}
