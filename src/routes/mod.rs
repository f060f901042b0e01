pub mod auth;
pub mod devices;
pub mod doors;
pub mod health;
mod rate_limit;
pub mod reports;
mod response;
mod security;
pub mod sensors;
pub mod validate;

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use rate_limit::{ClientIpKeyExtractor, API_LIMIT_MESSAGE, REPORT_LIMIT_MESSAGE};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::error::AppError;

pub use response::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::banner,
        devices::list_devices,
        devices::update_device,
        sensors::latest_readings,
        sensors::sensor_history,
        sensors::coordinates,
        reports::export_report,
        doors::latest_doors,
    ),
    components(
        schemas(
            health::ServiceBanner,
            devices::DevicePayload,
            crate::domain::DeviceDescriptor,
            crate::domain::SensorConfig,
            crate::domain::TelemetryReading,
            crate::domain::LatestReadingView,
            crate::domain::DoorState,
            crate::domain::SensorInfo,
            crate::domain::SensorHistoryView,
            crate::domain::Coordinate,
            crate::domain::DoorStatusEvent,
            crate::domain::DoorStatusView,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "devices", description = "Device catalog and configuration"),
        (name = "sensors", description = "Latest readings, history and coordinates"),
        (name = "reports", description = "Spreadsheet exports"),
        (name = "doors", description = "Virtual door status"),
    ),
    info(
        title = "Cold Chain API",
        description = "Cold-chain telemetry correlation, downsampling and reporting",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            api_rate = %format!("1 per {}s burst {}", config.rate_limit_api_period_seconds, config.rate_limit_api_burst),
            report_rate = %format!("1 per {}s burst {}", config.rate_limit_report_period_seconds, config.rate_limit_report_burst),
            "Rate limiting configured"
        );
    }

    if config.api_key.is_none() {
        tracing::warn!("API_KEY not set, /api is open");
    }

    let require_key = middleware::from_fn_with_state(state.clone(), auth::require_api_key);

    let api_routes_base = Router::new()
        .route(
            "/dispositivos",
            get(devices::list_devices).patch(devices::update_device),
        )
        .route("/sensores/latest", get(sensors::latest_readings))
        .route("/sensores/{mac}", get(sensors::sensor_history))
        .route("/sensor/coordinates", get(sensors::coordinates))
        .route("/doors/latest", get(doors::latest_doors))
        .route_layer(require_key.clone());

    let report_routes_base = Router::new()
        .route("/sensor/report", get(reports::export_report))
        .route_layer(require_key);

    // Limiters run before auth; reports pass both, the general one first
    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(api_routes_base)
            .merge(report_routes_base)
    } else {
        let api_limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(config.rate_limit_api_period_seconds)
            .burst_size(config.rate_limit_api_burst)
            .error_handler(|e| rate_limit::rejection(API_LIMIT_MESSAGE, e))
            .finish()
            .expect("Failed to create API rate limiter");

        let report_limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(config.rate_limit_report_period_seconds)
            .burst_size(config.rate_limit_report_burst)
            .error_handler(|e| rate_limit::rejection(REPORT_LIMIT_MESSAGE, e))
            .finish()
            .expect("Failed to create report rate limiter");

        Router::new()
            .merge(api_routes_base)
            .merge(report_routes_base.layer(GovernorLayer {
                config: Arc::new(report_limiter),
            }))
            .layer(GovernorLayer {
                config: Arc::new(api_limiter),
            })
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health and banner routes (NO auth, NO rate limiting)
    let health_routes = Router::new()
        .route("/", get(health::banner))
        .route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Docs load the Scalar bundle, so they stay outside the CSP
    let app_routes = Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .fallback(not_found);

    security::with_security_headers(app_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: axum::http::Uri) -> AppError {
    tracing::warn!(path = %uri.path(), "Route not found");
    AppError::NotFound("Rota não encontrada".to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::domain::GatewayDevicePair;
    use crate::services::fixtures::{config, door, reading};
    use crate::store::MockTelemetryStore;

    const MAC: &str = "AA:BB:CC:DD:EE:FF";

    fn app(store: MockTelemetryStore) -> Router {
        build_router(AppState::new(Arc::new(store), Config::for_tests()))
    }

    fn limited_app(api_burst: u32, report_burst: u32) -> Router {
        let mut config = Config::for_tests();
        config.disable_rate_limiting = false;
        config.rate_limit_api_period_seconds = 3600;
        config.rate_limit_api_burst = api_burst;
        config.rate_limit_report_period_seconds = 3600;
        config.rate_limit_report_burst = report_burst;
        build_router(AppState::new(Arc::new(MockTelemetryStore::new()), config))
    }

    fn request_from(ip: &str, key: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-forwarded-for", ip)
            .header("x-api-key", key)
            .body(Body::empty())
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-api-key", "test-key")
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn api_requires_key() {
        let response = app(MockTelemetryStore::new())
            .oneshot(
                Request::builder()
                    .uri("/api/dispositivos")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Acesso não autorizado. API Key ausente.");
    }

    #[tokio::test]
    async fn wrong_key_is_rejected() {
        let response = app(MockTelemetryStore::new())
            .oneshot(
                Request::builder()
                    .uri("/api/doors/latest")
                    .header("x-api-key", "guess")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn open_api_without_configured_key() {
        let mut store = MockTelemetryStore::new();
        store.expect_door_status_latest().return_once(|| Ok(Vec::new()));
        store
            .expect_config_names_and_maintenance()
            .return_once(|| Ok(Vec::new()));

        let mut config = Config::for_tests();
        config.api_key = None;
        let response = build_router(AppState::new(Arc::new(store), config))
            .oneshot(
                Request::builder()
                    .uri("/api/doors/latest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_skips_auth() {
        let response = app(MockTelemetryStore::new())
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_mac_never_reaches_the_store() {
        let response = app(MockTelemetryStore::new())
            .oneshot(get_request("/api/sensores/not-a-mac"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn coordinates_require_mac() {
        let response = app(MockTelemetryStore::new())
            .oneshot(get_request("/api/sensor/coordinates"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"],
            "Parâmetro obrigatório ausente: mac"
        );
    }

    #[tokio::test]
    async fn invalid_period_is_bad_request() {
        let uri = format!("/api/sensores/{MAC}?period=2d");
        let response = app(MockTelemetryStore::new())
            .oneshot(get_request(&uri))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn device_catalog_is_wrapped_in_envelope() {
        let mut store = MockTelemetryStore::new();
        store.expect_readings_projection_all().return_once(|| {
            Ok(vec![GatewayDevicePair {
                gateway_id: "GW1".to_string(),
                device_id: MAC.to_string(),
            }])
        });
        store
            .expect_config_all()
            .return_once(|| Ok(vec![config(MAC, Some("Freezer"))]));

        let response = app(store)
            .oneshot(get_request("/api/dispositivos"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["mac"], MAC);
        assert_eq!(body["data"][0]["display_name"], "Freezer");
        assert_eq!(body["data"][0]["batt_warning"], 20.0);
    }

    #[tokio::test]
    async fn patch_saves_config() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_config_upsert()
            .withf(|u| u.device_id == MAC && u.temp_max == Some(-10.0))
            .times(1)
            .return_once(|u| Ok(config(&u.device_id, None)));

        let response = app(store)
            .oneshot(
                Request::builder()
                    .method(Method::PATCH)
                    .uri("/api/dispositivos")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(format!(
                        r#"{{"mac": "{MAC}", "max_temp": "-10", "min_temp": ""}}"#
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Configuração salva!");
        assert_eq!(body["data"]["mac"], MAC);
    }

    #[tokio::test]
    async fn report_is_an_xlsx_attachment() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_readings_by_device()
            .return_once(|_, _| Ok(vec![reading(MAC, 0)]));
        store
            .expect_door_events_by_device()
            .return_once(|_, _, _| Ok(vec![door(MAC, true, 0)]));

        let uri = format!(
            "/api/sensor/report?mac={MAC}&startDate=2026-05-10T00:00:00Z&endDate=2026-05-11T00:00:00Z"
        );
        let response = app(store).oneshot(get_request(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"relatorio_AABBCCDDEEFF_"));
        assert!(disposition.ends_with(".xlsx\""));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn empty_report_window_is_not_found() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_readings_by_device()
            .return_once(|_, _| Ok(Vec::new()));
        store
            .expect_door_events_by_device()
            .return_once(|_, _, _| Ok(Vec::new()));

        let uri = format!("/api/sensor/report?mac={MAC}&startDate=2026-05-10&endDate=2026-05-11");
        let response = app(store).oneshot(get_request(&uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["error"],
            "Nenhum dado encontrado para este período."
        );
    }

    #[tokio::test]
    async fn reversed_report_window_is_bad_request() {
        let uri = format!("/api/sensor/report?mac={MAC}&startDate=2026-05-11&endDate=2026-05-10");
        let response = app(MockTelemetryStore::new())
            .oneshot(get_request(&uri))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = app(MockTelemetryStore::new())
            .oneshot(get_request("/nowhere"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Rota não encontrada");
    }

    #[tokio::test]
    async fn rotating_api_keys_share_one_ip_bucket() {
        let app = limited_app(1, 10);

        let mut statuses = Vec::new();
        for i in 0..5 {
            let response = app
                .clone()
                .oneshot(request_from(
                    "203.0.113.9",
                    &format!("bogus-{i}"),
                    "/api/doors/latest",
                ))
                .await
                .unwrap();
            statuses.push(response.status());
        }

        assert_eq!(statuses[0], StatusCode::UNAUTHORIZED);
        assert!(statuses[1..]
            .iter()
            .all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
    }

    #[tokio::test]
    async fn rate_limit_rejection_uses_error_envelope() {
        let app = limited_app(1, 10);

        let first = app
            .clone()
            .oneshot(request_from("203.0.113.9", "test-key", "/api/sensores/not-a-mac"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::BAD_REQUEST);

        let limited = app
            .clone()
            .oneshot(request_from("203.0.113.9", "test-key", "/api/sensores/not-a-mac"))
            .await
            .unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(limited.headers().contains_key(header::RETRY_AFTER));
        let body = json_body(limited).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            "Muitas requisições deste IP. Tente novamente em alguns minutos."
        );

        // Another client keeps its own bucket
        let other = app
            .oneshot(request_from("198.51.100.4", "test-key", "/api/sensores/not-a-mac"))
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reports_have_a_stricter_limit() {
        let app = limited_app(100, 10);
        let uri = format!("/api/sensor/report?mac={MAC}&startDate=2026-05-11&endDate=2026-05-10");

        for _ in 0..10 {
            let response = app
                .clone()
                .oneshot(request_from("203.0.113.9", "test-key", &uri))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let limited = app
            .clone()
            .oneshot(request_from("203.0.113.9", "test-key", &uri))
            .await
            .unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            json_body(limited).await["error"],
            "Limite de geração de relatórios excedido. Tente novamente em uma hora."
        );

        // The general limit still has room
        let response = app
            .oneshot(request_from("203.0.113.9", "test-key", "/api/sensores/not-a-mac"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn responses_carry_security_headers() {
        let response = app(MockTelemetryStore::new())
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
        assert_eq!(headers["referrer-policy"], "no-referrer");
        assert!(headers["content-security-policy"]
            .to_str()
            .unwrap()
            .starts_with("default-src 'self'"));
    }

    #[tokio::test]
    async fn invalid_payload_lists_fields() {
        let response = app(MockTelemetryStore::new())
            .oneshot(
                Request::builder()
                    .method(Method::PATCH)
                    .uri("/api/dispositivos")
                    .header("x-api-key", "test-key")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(format!(
                        r#"{{"mac": "{MAC}", "batt_warning": 120, "min_hum": -1}}"#
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Dados de entrada inválidos");
        assert_eq!(body["details"][0]["field"], "batt_warning");
        assert_eq!(body["details"][1]["field"], "min_hum");
    }
}
