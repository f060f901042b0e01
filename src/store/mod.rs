//! Read and write contracts against the hosted telemetry store.
//!
//! Services depend on [`TelemetryStore`] only; [`PgStore`] is wired in
//! `main` and unit tests substitute the generated `MockTelemetryStore`.

mod conversions;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::domain::{
    ConfigSummary, ConfigUpsert, DoorStatusEvent, GatewayDevicePair, SensorConfig,
    TelemetryReading,
};

pub use postgres::PgStore;

/// Bounds of a per-device telemetry query. Both ends are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

impl ReadingQuery {
    #[must_use]
    pub fn since(start: Option<DateTime<Utc>>) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            limit: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Readings of one device, newest first.
    async fn readings_by_device(
        &self,
        device_id: &str,
        query: ReadingQuery,
    ) -> Result<Vec<TelemetryReading>, DbErr>;

    /// `(gateway, device)` of every stored reading, in store order.
    async fn readings_projection_all(&self) -> Result<Vec<GatewayDevicePair>, DbErr>;

    /// One reading per device, from the latest-telemetry view.
    async fn latest_reading_per_device(&self) -> Result<Vec<TelemetryReading>, DbErr>;

    async fn config_all(&self) -> Result<Vec<SensorConfig>, DbErr>;

    async fn config_by_device(&self, device_id: &str) -> Result<Option<SensorConfig>, DbErr>;

    async fn config_names_and_maintenance(&self) -> Result<Vec<ConfigSummary>, DbErr>;

    /// One door state per sensor, from the latest-door-status view.
    async fn door_status_latest(&self) -> Result<Vec<DoorStatusEvent>, DbErr>;

    /// Door events of one device within `[start, end]`, oldest first.
    async fn door_events_by_device(
        &self,
        device_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DoorStatusEvent>, DbErr>;

    /// Insert or overwrite the config keyed by `upsert.device_id`.
    async fn config_upsert(&self, upsert: ConfigUpsert) -> Result<SensorConfig, DbErr>;
}
