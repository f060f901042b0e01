use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use super::validate::{ensure_ordered, require_mac, required_timestamp};
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::report::XLSX_CONTENT_TYPE;
use crate::services::reports;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    /// Device MAC address
    pub mac: Option<String>,
    /// Window start (ISO 8601, inclusive)
    pub start_date: Option<String>,
    /// Window end (ISO 8601, inclusive)
    pub end_date: Option<String>,
}

/// Export telemetry and door events as an Excel workbook
#[utoipa::path(
    get,
    path = "/api/sensor/report",
    params(ReportParams),
    responses(
        (status = 200, description = "XLSX attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 404, description = "No telemetry in the window"),
        (status = 429, description = "Report rate limit exceeded"),
    ),
    tag = "reports"
)]
pub async fn export_report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> AppResult<Response> {
    let mac = require_mac(params.mac.as_deref())?;
    let start = required_timestamp("startDate", params.start_date.as_deref())?;
    let end = required_timestamp("endDate", params.end_date.as_deref())?;
    ensure_ordered(start, end)?;

    let offset = state.config.report_offset()?;
    let file = reports::export_report(state.store.as_ref(), &mac, start, end, offset, Utc::now())
        .await?;

    let disposition = HeaderValue::from_str(&file.content_disposition())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
