use chrono::Utc;
use sea_orm::{FromQueryResult, Set};

use crate::domain::policy;
use crate::domain::{
    ConfigSummary, ConfigUpsert, DoorStatusEvent, GatewayDevicePair, SensorConfig,
    TelemetryReading,
};
use crate::entity::{
    door_logs, latest_door_status, latest_telemetry, sensor_configs, telemetry_logs,
};

#[derive(Debug, FromQueryResult)]
pub(super) struct PairRow {
    pub gw: String,
    pub mac: String,
}

#[derive(Debug, FromQueryResult)]
pub(super) struct ConfigSummaryRow {
    pub mac: String,
    pub display_name: Option<String>,
    pub em_manutencao: Option<bool>,
}

impl From<PairRow> for GatewayDevicePair {
    fn from(row: PairRow) -> Self {
        Self {
            gateway_id: row.gw,
            device_id: row.mac,
        }
    }
}

impl From<ConfigSummaryRow> for ConfigSummary {
    fn from(row: ConfigSummaryRow) -> Self {
        Self {
            device_id: row.mac,
            display_name: row.display_name,
            maintenance_mode: row.em_manutencao,
        }
    }
}

/// The log tables and their latest-value views share a column layout.
macro_rules! reading_from_model {
    ($($model:ty),+) => {$(
        impl From<$model> for TelemetryReading {
            fn from(m: $model) -> Self {
                Self {
                    device_id: m.mac,
                    gateway_id: m.gw,
                    timestamp: m.ts.with_timezone(&Utc),
                    temperature: m.temp,
                    humidity: m.hum,
                    battery_pct: m.batt,
                    signal_strength: m.rssi,
                    latitude: m.latitude,
                    longitude: m.longitude,
                    altitude: m.altitude,
                    legacy_lat: m.lat,
                    legacy_lng: m.lng,
                }
            }
        }
    )+};
}

macro_rules! door_event_from_model {
    ($($model:ty),+) => {$(
        impl From<$model> for DoorStatusEvent {
            fn from(m: $model) -> Self {
                Self {
                    device_id: m.sensor_mac,
                    is_open: m.is_open,
                    observed_at: m.timestamp_read.with_timezone(&Utc),
                }
            }
        }
    )+};
}

reading_from_model!(telemetry_logs::Model, latest_telemetry::Model);
door_event_from_model!(door_logs::Model, latest_door_status::Model);

impl From<sensor_configs::Model> for SensorConfig {
    fn from(m: sensor_configs::Model) -> Self {
        Self {
            device_id: m.mac,
            display_name: m.display_name,
            battery_warning_pct: m.batt_warning,
            temp_min: m.temp_min,
            temp_max: m.temp_max,
            humidity_min: m.hum_min,
            humidity_max: m.hum_max,
            linked_door_device_id: m.sensor_porta_vinculado,
            maintenance_mode: policy::maintenance_flag(m.em_manutencao),
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

impl From<ConfigUpsert> for sensor_configs::ActiveModel {
    fn from(u: ConfigUpsert) -> Self {
        Self {
            mac: Set(u.device_id),
            display_name: Set(u.display_name),
            batt_warning: Set(u.battery_warning_pct),
            temp_max: Set(u.temp_max),
            temp_min: Set(u.temp_min),
            hum_max: Set(u.humidity_max),
            hum_min: Set(u.humidity_min),
            sensor_porta_vinculado: Set(u.linked_door_device_id),
            em_manutencao: Set(Some(u.maintenance_mode)),
            updated_at: Set(Some(u.updated_at.into())),
        }
    }
}
