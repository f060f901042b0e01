use chrono::{DateTime, FixedOffset, Utc};

use crate::error::AppResult;
use crate::report::{self, ReportFile};
use crate::store::{ReadingQuery, TelemetryStore};

/// Telemetry and door events of one device over `[start, end]` as a workbook.
///
/// The caller guarantees `start <= end`.
pub async fn export_report(
    store: &dyn TelemetryStore,
    device_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: FixedOffset,
    generated_at: DateTime<Utc>,
) -> AppResult<ReportFile> {
    let (readings, door_events) = tokio::try_join!(
        store.readings_by_device(device_id, ReadingQuery::between(start, end)),
        store.door_events_by_device(device_id, start, end),
    )?;

    let file = report::export_report(device_id, &readings, &door_events, offset, generated_at)?;

    tracing::info!(
        device_id = %device_id,
        readings = readings.len(),
        door_events = door_events.len(),
        bytes = file.bytes.len(),
        filename = %file.filename,
        "Report generated"
    );

    Ok(file)
}
