use chrono::{DateTime, Utc};

use crate::correlation::{
    build_history_view, extract_coordinates, resolve_latest_readings, ConfigSummaryIndex,
    DoorStatusIndex, HistoryWindow,
};
use crate::domain::{Coordinate, LatestReadingView, SensorHistoryView};
use crate::error::AppResult;
use crate::store::{ReadingQuery, TelemetryStore};

/// Latest reading of every device, enriched with name, maintenance and door state.
pub async fn latest_readings(store: &dyn TelemetryStore) -> AppResult<Vec<LatestReadingView>> {
    let (readings, summaries, doors) = tokio::try_join!(
        store.latest_reading_per_device(),
        store.config_names_and_maintenance(),
        store.door_status_latest(),
    )?;

    let views = resolve_latest_readings(
        readings,
        &ConfigSummaryIndex::build(summaries),
        &DoorStatusIndex::build(doors),
    );

    tracing::debug!(devices = views.len(), "Resolved latest readings");
    Ok(views)
}

/// Downsampled history of one device over a look-back window.
pub async fn sensor_history(
    store: &dyn TelemetryStore,
    device_id: &str,
    window: HistoryWindow,
    limit: Option<u64>,
    now: DateTime<Utc>,
) -> AppResult<SensorHistoryView> {
    let query = ReadingQuery::since(window.cutoff(now)).with_limit(limit);

    let (raw, config) = tokio::try_join!(
        store.readings_by_device(device_id, query),
        store.config_by_device(device_id),
    )?;

    let raw_count = raw.len();
    let view = build_history_view(device_id, config, raw);

    tracing::debug!(
        device_id = %device_id,
        ?window,
        raw = raw_count,
        kept = view.history.len(),
        "Downsampled sensor history"
    );

    Ok(view)
}

/// Map points of one device.
///
/// With both bounds the whole window is returned oldest first, as a path;
/// otherwise only the newest reading is considered.
pub async fn coordinates(
    store: &dyn TelemetryStore,
    device_id: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> AppResult<Vec<Coordinate>> {
    let readings = match (start, end) {
        (Some(start), Some(end)) => {
            let mut window = store
                .readings_by_device(device_id, ReadingQuery::between(start, end))
                .await?;
            window.reverse();
            window
        }
        _ => {
            store
                .readings_by_device(device_id, ReadingQuery::default().with_limit(Some(1)))
                .await?
        }
    };

    let points = extract_coordinates(&readings);
    tracing::debug!(
        device_id = %device_id,
        readings = readings.len(),
        points = points.len(),
        "Extracted coordinates"
    );

    Ok(points)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::ConfigSummary;
    use crate::services::fixtures::{config, door, reading};
    use crate::store::MockTelemetryStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn latest_readings_join_names_and_self_keyed_doors() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_latest_reading_per_device()
            .return_once(|| Ok(vec![reading("BB", 0), reading("AA", 0)]));
        store.expect_config_names_and_maintenance().return_once(|| {
            Ok(vec![ConfigSummary {
                device_id: "AA".to_string(),
                display_name: Some("Câmara Fria".to_string()),
                maintenance_mode: Some(true),
            }])
        });
        store
            .expect_door_status_latest()
            .return_once(|| Ok(vec![door("BB", true, 0)]));

        let views = latest_readings(&store).await.unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].display_name, "Câmara Fria");
        assert!(views[0].maintenance_mode);
        assert!(views[0].door_status.is_none());
        assert_eq!(views[1].display_name, "Sensor Sem Nome");
        assert!(views[1].door_status.as_ref().is_some_and(|d| d.is_open));
    }

    #[tokio::test]
    async fn history_queries_window_cutoff_and_limit() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_readings_by_device()
            .withf(|mac, q| {
                mac == "AA"
                    && q.start == Some(now() - Duration::hours(1))
                    && q.end.is_none()
                    && q.limit == Some(50)
            })
            .times(1)
            .return_once(|_, _| {
                Ok(vec![
                    reading("AA", 25),
                    reading("AA", 12),
                    reading("AA", 5),
                    reading("AA", 2),
                    reading("AA", 0),
                ])
            });
        store
            .expect_config_by_device()
            .withf(|mac| mac == "AA")
            .return_once(|_| Ok(Some(config("AA", Some("Freezer")))));

        let view = sensor_history(&store, "AA", HistoryWindow::LastHour, Some(50), now())
            .await
            .unwrap();

        assert_eq!(view.info.config.display_name.as_deref(), Some("Freezer"));
        assert_eq!(view.history.len(), 3);
    }

    #[tokio::test]
    async fn history_of_unknown_device_uses_placeholder_config() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_readings_by_device()
            .withf(|_, q| q.start.is_none())
            .return_once(|_, _| Ok(Vec::new()));
        store.expect_config_by_device().return_once(|_| Ok(None));

        let view = sensor_history(&store, "AA", HistoryWindow::All, None, now())
            .await
            .unwrap();

        assert_eq!(
            view.info.config.display_name.as_deref(),
            Some("Sensor Não Configurado")
        );
        assert!(view.info.latitude.is_none());
        assert!(view.history.is_empty());
    }

    #[tokio::test]
    async fn bounded_coordinates_come_back_oldest_first() {
        let start = now() - Duration::hours(2);
        let end = now();

        let mut store = MockTelemetryStore::new();
        store
            .expect_readings_by_device()
            .withf(move |_, q| q.start == Some(start) && q.end == Some(end) && q.limit.is_none())
            .return_once(|_, _| {
                let mut newest = reading("AA", 30);
                newest.latitude = Some(-23.0);
                newest.longitude = Some(-46.0);
                let mut oldest = reading("AA", 0);
                oldest.latitude = Some(-22.0);
                oldest.longitude = Some(-45.0);
                Ok(vec![newest, reading("AA", 10), oldest])
            });

        let points = coordinates(&store, "AA", Some(start), Some(end)).await.unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].lat, -22.0);
        assert_eq!(points[1].lat, -23.0);
    }

    #[tokio::test]
    async fn unbounded_coordinates_use_newest_reading_only() {
        let mut store = MockTelemetryStore::new();
        store
            .expect_readings_by_device()
            .withf(|_, q| q.start.is_none() && q.limit == Some(1))
            .return_once(|_, _| Ok(vec![reading("AA", 0)]));

        let points = coordinates(&store, "AA", Some(now()), None).await.unwrap();
        assert!(points.is_empty());
    }
}
