use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::domain::policy::{self, NameFallback};
use crate::domain::{SensorConfig, SensorHistoryView, SensorInfo, TelemetryReading, Timestamped};

/// Minimum spacing between two kept points of a charted series.
pub const MIN_SPACING_MS: i64 = 10 * 60 * 1000;

/// Largest row cap a history request may ask the store for.
pub const MAX_HISTORY_LIMIT: u64 = 10_000;

/// Look-back window of a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryWindow {
    LastHour,
    #[default]
    LastDay,
    LastWeek,
    All,
}

impl HistoryWindow {
    /// Earliest timestamp to request from the store, or `None` for everything.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::LastHour => Some(now - Duration::hours(1)),
            Self::LastDay => Some(now - Duration::hours(24)),
            Self::LastWeek => Some(now - Duration::days(7)),
            Self::All => None,
        }
    }
}

impl FromStr for HistoryWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Self::LastHour),
            "24h" => Ok(Self::LastDay),
            "7d" => Ok(Self::LastWeek),
            "all" => Ok(Self::All),
            other => Err(format!(
                "Invalid period: {other}. Must be one of: 1h, 24h, 7d, all"
            )),
        }
    }
}

/// Minimum-gap decimation.
///
/// Keeps the first point, then every point at least [`MIN_SPACING_MS`] away
/// from the last kept one. On a newest-first series this keeps the newest
/// point of each cluster. The gap is absolute, so direction does not matter,
/// but a mixed-order input gives an arbitrary thinning.
#[must_use]
pub fn downsample<T: Timestamped>(points: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::new();
    let mut last_kept_ms: i64 = 0;

    for point in points {
        let ts_ms = point.timestamp().timestamp_millis();
        if kept.is_empty() || (ts_ms - last_kept_ms).abs() >= MIN_SPACING_MS {
            last_kept_ms = ts_ms;
            kept.push(point);
        }
    }

    kept
}

/// Assemble the history view of one device from its raw newest-first
/// readings and optional stored config.
///
/// Coordinates come from the newest raw reading, before thinning.
#[must_use]
pub fn build_history_view(
    device_id: &str,
    config: Option<SensorConfig>,
    raw: Vec<TelemetryReading>,
) -> SensorHistoryView {
    let config = config.unwrap_or_else(|| unconfigured_sensor(device_id));

    let (latitude, longitude, altitude) = match raw.first() {
        Some(newest) => (
            newest.resolved_latitude(),
            newest.resolved_longitude(),
            Some(newest.resolved_altitude()),
        ),
        None => (None, None, None),
    };

    SensorHistoryView {
        info: SensorInfo {
            config,
            latitude,
            longitude,
            altitude,
        },
        history: downsample(raw),
    }
}

fn unconfigured_sensor(device_id: &str) -> SensorConfig {
    SensorConfig {
        device_id: device_id.to_string(),
        display_name: Some(NameFallback::Unconfigured.resolve(None, device_id)),
        battery_warning_pct: Some(policy::DEFAULT_BATTERY_WARNING_PCT),
        temp_min: None,
        temp_max: None,
        humidity_min: None,
        humidity_max: None,
        linked_door_device_id: None,
        maintenance_mode: false,
        updated_at: None,
    }
}
