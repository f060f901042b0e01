//! Request-parameter validation shared by the handlers.
//!
//! Every check runs before the store is touched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::correlation::{HistoryWindow, MAX_HISTORY_LIMIT};
use crate::error::{AppError, AppResult};

const MAC_FORMAT_MESSAGE: &str = "MAC deve estar no formato válido (ex: AA:BB:CC:DD:EE:FF)";

/// Six hex octets separated by `:` or `-`.
#[must_use]
pub fn is_valid_mac(mac: &str) -> bool {
    let bytes = mac.as_bytes();
    if bytes.len() != 17 {
        return false;
    }

    bytes.iter().enumerate().all(|(i, b)| match i % 3 {
        2 => matches!(b, b':' | b'-'),
        _ => b.is_ascii_hexdigit(),
    })
}

/// Required device identifier.
///
/// # Errors
///
/// `MissingIdentifier` when absent or blank, `Validation` when malformed.
pub fn require_mac(mac: Option<&str>) -> AppResult<String> {
    let mac = mac
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(AppError::MissingIdentifier("mac"))?;

    if !is_valid_mac(mac) {
        return Err(AppError::invalid("mac", MAC_FORMAT_MESSAGE));
    }

    Ok(mac.to_string())
}

/// ISO 8601 timestamp; offset-less values are taken as UTC.
///
/// # Errors
///
/// `Validation` naming `field` when the value does not parse.
pub fn parse_timestamp(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.and_utc());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Ok(ts.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(AppError::invalid(
        field,
        format!("{field} deve ser uma data ISO 8601 válida"),
    ))
}

/// Like [`parse_timestamp`], with absent or blank meaning "not given".
///
/// # Errors
///
/// `Validation` when a non-blank value does not parse.
pub fn optional_timestamp(field: &str, value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_timestamp(field, v).map(Some),
        None => Ok(None),
    }
}

/// Mandatory timestamp parameter.
///
/// # Errors
///
/// `Validation` when absent, blank or unparseable.
pub fn required_timestamp(field: &str, value: Option<&str>) -> AppResult<DateTime<Utc>> {
    optional_timestamp(field, value)?
        .ok_or_else(|| AppError::invalid(field, format!("{field} é obrigatório")))
}

/// Report windows must not run backwards.
///
/// # Errors
///
/// `Validation` on `startDate` when `start` is after `end`.
pub fn ensure_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if start > end {
        return Err(AppError::invalid(
            "startDate",
            "startDate deve ser anterior a endDate",
        ));
    }
    Ok(())
}

/// `period` query parameter, defaulting to the last 24 hours.
///
/// # Errors
///
/// `Validation` for anything outside `1h | 24h | 7d | all`.
pub fn parse_window(period: Option<&str>) -> AppResult<HistoryWindow> {
    match period.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => p.parse().map_err(|msg: String| AppError::invalid("period", msg)),
        None => Ok(HistoryWindow::default()),
    }
}

/// `limit` query parameter.
///
/// # Errors
///
/// `Validation` unless an integer in `1..=10000`.
pub fn parse_limit(limit: Option<&str>) -> AppResult<Option<u64>> {
    let Some(raw) = limit.map(str::trim).filter(|l| !l.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<u64>() {
        Ok(n) if (1..=MAX_HISTORY_LIMIT).contains(&n) => Ok(Some(n)),
        _ => Err(AppError::invalid(
            "limit",
            format!("limit deve ser um inteiro entre 1 e {MAX_HISTORY_LIMIT}"),
        )),
    }
}
