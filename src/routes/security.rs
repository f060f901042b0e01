use axum::{
    http::{HeaderName, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::common::AppState;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self';\
base-uri 'self';\
font-src 'self' https: data:;\
form-action 'self';\
frame-ancestors 'self';\
img-src 'self' data: https:;\
object-src 'none';\
script-src 'self';\
script-src-attr 'none';\
style-src 'self' 'unsafe-inline';\
upgrade-insecure-requests";

/// Hardening headers added to every response that does not already set them.
pub const SECURITY_HEADERS: [(&str, &str); 12] = [
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Layer [`SECURITY_HEADERS`] onto every route registered so far.
pub fn with_security_headers(router: Router<AppState>) -> Router<AppState> {
    SECURITY_HEADERS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}
