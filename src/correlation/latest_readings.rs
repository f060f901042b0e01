use std::collections::HashSet;

use crate::domain::collation::locale_cmp;
use crate::domain::policy::{self, NameFallback};
use crate::domain::{DoorState, LatestReadingView, TelemetryReading};

use super::{ConfigSummaryIndex, DoorStatusIndex};

/// Keep the first reading seen for each device.
///
/// On a newest-first stream the first reading seen is the most recent one.
/// On the store's latest view, which already holds one row per device, this
/// is the identity.
#[must_use]
pub fn latest_per_device(readings: Vec<TelemetryReading>) -> Vec<TelemetryReading> {
    let mut seen: HashSet<String> = HashSet::new();
    readings
        .into_iter()
        .filter(|reading| seen.insert(reading.device_id.clone()))
        .collect()
}

/// Build the dashboard grid: one row per device, with name, maintenance flag
/// and the door state inferred from that same device.
///
/// Door status is joined on the reading's own device id; the configured
/// linked door device is not consulted. Rows are sorted by display name.
#[must_use]
pub fn resolve_latest_readings(
    readings: Vec<TelemetryReading>,
    configs: &ConfigSummaryIndex,
    doors: &DoorStatusIndex,
) -> Vec<LatestReadingView> {
    let mut views: Vec<LatestReadingView> = latest_per_device(readings)
        .into_iter()
        .map(|reading| {
            let config = configs.get(&reading.device_id);
            let door_status = doors.get(&reading.device_id).map(|door| DoorState {
                is_open: door.is_open,
                last_change: door.observed_at,
            });

            LatestReadingView {
                display_name: NameFallback::LatestReading.resolve(
                    config.and_then(|c| c.display_name.as_deref()),
                    &reading.device_id,
                ),
                maintenance_mode: policy::maintenance_flag(
                    config.and_then(|c| c.maintenance_mode),
                ),
                door_status,
                reading,
            }
        })
        .collect();

    views.sort_by(|a, b| locale_cmp(&a.display_name, &b.display_name));
    views
}
