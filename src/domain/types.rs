use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::policy;

/// Records addressed by the device (MAC) identifier.
pub trait DeviceKeyed {
    fn device_id(&self) -> &str;
}

/// Records carrying a sampling instant.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// One sampling event from a cold-chain sensor.
///
/// Serialized with the store's column names so dashboard consumers see the
/// same payload the telemetry table holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TelemetryReading {
    #[serde(rename = "mac")]
    pub device_id: String,
    #[serde(rename = "gw")]
    pub gateway_id: String,
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "temp")]
    pub temperature: f64,
    #[serde(rename = "hum")]
    pub humidity: f64,
    #[serde(rename = "batt")]
    pub battery_pct: Option<f64>,
    #[serde(rename = "rssi")]
    pub signal_strength: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    /// Legacy location column, superseded by `latitude`
    #[serde(rename = "lat", default, skip_serializing_if = "Option::is_none")]
    pub legacy_lat: Option<f64>,
    /// Legacy location column, superseded by `longitude`
    #[serde(rename = "lng", default, skip_serializing_if = "Option::is_none")]
    pub legacy_lng: Option<f64>,
}

impl TelemetryReading {
    #[must_use]
    pub fn resolved_latitude(&self) -> Option<f64> {
        policy::first_present(self.latitude, self.legacy_lat)
    }

    #[must_use]
    pub fn resolved_longitude(&self) -> Option<f64> {
        policy::first_present(self.longitude, self.legacy_lng)
    }

    #[must_use]
    pub fn resolved_altitude(&self) -> f64 {
        policy::altitude_or_default(self.altitude)
    }
}

impl DeviceKeyed for TelemetryReading {
    fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl Timestamped for TelemetryReading {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// `(gateway, device)` projection of the telemetry table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GatewayDevicePair {
    pub gateway_id: String,
    pub device_id: String,
}

/// Stored per-device configuration, keyed by MAC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SensorConfig {
    #[serde(rename = "mac")]
    pub device_id: String,
    pub display_name: Option<String>,
    #[serde(rename = "batt_warning")]
    pub battery_warning_pct: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    #[serde(rename = "hum_min")]
    pub humidity_min: Option<f64>,
    #[serde(rename = "hum_max")]
    pub humidity_max: Option<f64>,
    #[serde(rename = "sensor_porta_vinculado")]
    pub linked_door_device_id: Option<String>,
    #[serde(rename = "em_manutencao")]
    pub maintenance_mode: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DeviceKeyed for SensorConfig {
    fn device_id(&self) -> &str {
        &self.device_id
    }
}

/// Name and maintenance projection of [`SensorConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
    pub device_id: String,
    pub display_name: Option<String>,
    pub maintenance_mode: Option<bool>,
}

impl DeviceKeyed for ConfigSummary {
    fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl From<&SensorConfig> for ConfigSummary {
    fn from(config: &SensorConfig) -> Self {
        Self {
            device_id: config.device_id.clone(),
            display_name: config.display_name.clone(),
            maintenance_mode: Some(config.maintenance_mode),
        }
    }
}

/// Door open/closed state inferred upstream from temperature spikes.
///
/// Keyed by the same MAC as the telemetry sensor it was inferred from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DoorStatusEvent {
    #[serde(rename = "sensor_mac")]
    pub device_id: String,
    pub is_open: bool,
    #[serde(rename = "timestamp_read")]
    pub observed_at: DateTime<Utc>,
}

impl DeviceKeyed for DoorStatusEvent {
    fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl Timestamped for DoorStatusEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

/// Normalized config write, upserted on `device_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigUpsert {
    pub device_id: String,
    pub display_name: Option<String>,
    pub battery_warning_pct: Option<f64>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub humidity_max: Option<f64>,
    pub humidity_min: Option<f64>,
    pub linked_door_device_id: Option<String>,
    pub maintenance_mode: bool,
    pub updated_at: DateTime<Utc>,
}

/// One entry of the device catalog: a `(gateway, device)` pair merged with its config.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeviceDescriptor {
    #[serde(rename = "gw")]
    pub gateway_id: String,
    #[serde(rename = "mac")]
    pub device_id: String,
    pub display_name: String,
    #[serde(rename = "batt_warning")]
    pub battery_warning_pct: f64,
    #[serde(rename = "max_temp")]
    pub temp_max: Option<f64>,
    #[serde(rename = "min_temp")]
    pub temp_min: Option<f64>,
    #[serde(rename = "max_hum")]
    pub humidity_max: Option<f64>,
    #[serde(rename = "min_hum")]
    pub humidity_min: Option<f64>,
    #[serde(rename = "sensor_porta_vinculado")]
    pub linked_door_device_id: Option<String>,
    #[serde(rename = "em_manutencao")]
    pub maintenance_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DoorState {
    pub is_open: bool,
    pub last_change: DateTime<Utc>,
}

/// Latest reading of a device, enriched for the dashboard grid.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LatestReadingView {
    #[serde(flatten)]
    pub reading: TelemetryReading,
    pub display_name: String,
    #[serde(rename = "status_porta")]
    pub door_status: Option<DoorState>,
    #[serde(rename = "em_manutencao")]
    pub maintenance_mode: bool,
}

/// Sensor config plus the coordinates of its newest reading.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SensorInfo {
    #[serde(flatten)]
    pub config: SensorConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SensorHistoryView {
    pub info: SensorInfo,
    pub history: Vec<TelemetryReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Coordinate {
    pub ts: DateTime<Utc>,
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
}

/// Latest door state decorated for the door panel.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DoorStatusView {
    #[serde(flatten)]
    pub event: DoorStatusEvent,
    pub display_name: String,
    pub status_text: String,
    pub status_color: String,
    pub is_configured: bool,
}
