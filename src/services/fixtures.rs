use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{ConfigUpsert, DoorStatusEvent, SensorConfig, TelemetryReading};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 11, 0, 0).unwrap()
}

/// Reading of `mac` taken `minute` minutes after [`base_time`].
pub(crate) fn reading(mac: &str, minute: i64) -> TelemetryReading {
    TelemetryReading {
        device_id: mac.to_string(),
        gateway_id: "GW1".to_string(),
        timestamp: base_time() + Duration::minutes(minute),
        temperature: -18.0,
        humidity: 45.0,
        battery_pct: Some(90.0),
        signal_strength: Some(-70),
        latitude: None,
        longitude: None,
        altitude: None,
        legacy_lat: None,
        legacy_lng: None,
    }
}

pub(crate) fn door(mac: &str, is_open: bool, minute: i64) -> DoorStatusEvent {
    DoorStatusEvent {
        device_id: mac.to_string(),
        is_open,
        observed_at: base_time() + Duration::minutes(minute),
    }
}

pub(crate) fn config(mac: &str, name: Option<&str>) -> SensorConfig {
    SensorConfig {
        device_id: mac.to_string(),
        display_name: name.map(str::to_string),
        battery_warning_pct: None,
        temp_min: None,
        temp_max: None,
        humidity_min: None,
        humidity_max: None,
        linked_door_device_id: None,
        maintenance_mode: false,
        updated_at: None,
    }
}

pub(crate) fn upsert(mac: &str) -> ConfigUpsert {
    ConfigUpsert {
        device_id: mac.to_string(),
        display_name: None,
        battery_warning_pct: None,
        temp_max: None,
        temp_min: None,
        humidity_max: None,
        humidity_min: None,
        linked_door_device_id: None,
        maintenance_mode: false,
        updated_at: base_time(),
    }
}
