use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use super::response::ApiResponse;
use super::validate::{optional_timestamp, parse_limit, parse_window, require_mac};
use crate::common::AppState;
use crate::domain::{Coordinate, LatestReadingView, SensorHistoryView};
use crate::error::AppResult;
use crate::services::sensors;

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryParams {
    /// Look-back window: `1h`, `24h` (default), `7d` or `all`
    pub period: Option<String>,
    /// Maximum raw rows to read, 1..=10000
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateParams {
    /// Device MAC address
    pub mac: Option<String>,
    /// Window start (ISO 8601); the window applies only when both bounds are set
    pub start_date: Option<String>,
    /// Window end (ISO 8601)
    pub end_date: Option<String>,
}

/// Latest reading of every sensor
#[utoipa::path(
    get,
    path = "/api/sensores/latest",
    responses(
        (status = 200, description = "Latest readings sorted by display name", body = Vec<LatestReadingView>),
        (status = 401, description = "Missing or invalid API key"),
    ),
    tag = "sensors"
)]
pub async fn latest_readings(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<LatestReadingView>>>> {
    let views = sensors::latest_readings(state.store.as_ref()).await?;
    Ok(ApiResponse::ok(views))
}

/// Downsampled history of one sensor
#[utoipa::path(
    get,
    path = "/api/sensores/{mac}",
    params(
        ("mac" = String, Path, description = "Device MAC address"),
        HistoryParams,
    ),
    responses(
        (status = 200, description = "Sensor info and history, at most one point per 10 minutes", body = SensorHistoryView),
        (status = 400, description = "Invalid MAC, period or limit"),
    ),
    tag = "sensors"
)]
pub async fn sensor_history(
    State(state): State<AppState>,
    Path(mac): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<ApiResponse<SensorHistoryView>>> {
    let mac = require_mac(Some(&mac))?;
    let window = parse_window(params.period.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;

    let view = sensors::sensor_history(state.store.as_ref(), &mac, window, limit, Utc::now()).await?;
    Ok(ApiResponse::ok(view))
}

/// Map coordinates of one sensor
#[utoipa::path(
    get,
    path = "/api/sensor/coordinates",
    params(CoordinateParams),
    responses(
        (status = 200, description = "Path ordered by time, or the latest point", body = Vec<Coordinate>),
        (status = 400, description = "Missing or invalid MAC or dates"),
    ),
    tag = "sensors"
)]
pub async fn coordinates(
    State(state): State<AppState>,
    Query(params): Query<CoordinateParams>,
) -> AppResult<Json<ApiResponse<Vec<Coordinate>>>> {
    let mac = require_mac(params.mac.as_deref())?;
    let start = optional_timestamp("startDate", params.start_date.as_deref())?;
    let end = optional_timestamp("endDate", params.end_date.as_deref())?;

    let points = sensors::coordinates(state.store.as_ref(), &mac, start, end).await?;
    Ok(ApiResponse::ok(points))
}
