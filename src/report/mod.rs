//! Spreadsheet export of a device's telemetry and door events.
//!
//! Sheet names, header strings and the date layout are consumed by existing
//! downstream spreadsheets and must not change.

mod workbook;

use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::{DoorStatusEvent, TelemetryReading};
use crate::error::{AppError, AppResult};

pub use workbook::{
    format_timestamp, Cell, ReportWorkbook, Sheet, DOOR_HEADERS, DOOR_SHEET, TELEMETRY_HEADERS,
    TELEMETRY_SHEET,
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A rendered report ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ReportFile {
    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// `relatorio_<mac without separators>_<epoch millis>.xlsx`
#[must_use]
pub fn report_filename(device_id: &str, generated_at: DateTime<Utc>) -> String {
    let clean: String = device_id.chars().filter(|c| !matches!(c, ':' | '-')).collect();
    format!("relatorio_{clean}_{}.xlsx", generated_at.timestamp_millis())
}

/// Join a device's telemetry window with its door events into a workbook.
///
/// `readings` is expected newest-first and `door_events` oldest-first, as the
/// store returns them; rows keep that order.
///
/// # Errors
///
/// Returns `AppError::EmptyReportWindow` when there is no telemetry, and
/// `AppError::Report` when rendering fails.
pub fn export_report(
    device_id: &str,
    readings: &[TelemetryReading],
    door_events: &[DoorStatusEvent],
    offset: FixedOffset,
    generated_at: DateTime<Utc>,
) -> AppResult<ReportFile> {
    if readings.is_empty() {
        return Err(AppError::EmptyReportWindow);
    }

    let bytes = ReportWorkbook::build(readings, door_events, offset).render()?;

    Ok(ReportFile {
        filename: report_filename(device_id, generated_at),
        bytes,
    })
}
