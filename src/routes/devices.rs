use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use super::response::ApiResponse;
use super::validate::require_mac;
use crate::common::AppState;
use crate::domain::policy::{self, loose_number};
use crate::domain::{ConfigUpsert, DeviceDescriptor, SensorConfig};
use crate::error::{AppError, AppResult, FieldError};
use crate::services::devices;

const MAX_DISPLAY_NAME_CHARS: usize = 255;

/// Body of `PATCH /api/dispositivos`.
///
/// Numeric fields accept a number, numeric text, `""` or null.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DevicePayload {
    pub mac: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "loose_number")]
    pub batt_warning: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub max_temp: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub min_temp: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub max_hum: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub min_hum: Option<f64>,
    #[serde(default)]
    pub sensor_porta_vinculado: Option<String>,
    #[serde(default)]
    pub maintenance_mode: Option<bool>,
}

fn check_percent(field: &str, value: Option<f64>, errors: &mut Vec<FieldError>) {
    if value.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
        errors.push(FieldError::new(field, format!("{field} deve estar entre 0 e 100")));
    }
}

impl DevicePayload {
    /// Validate and normalize into a store write stamped at `now`.
    ///
    /// # Errors
    ///
    /// `MissingIdentifier` without a MAC, `Validation` listing every
    /// malformed or out-of-range field otherwise.
    pub fn into_upsert(self, now: DateTime<Utc>) -> AppResult<ConfigUpsert> {
        let mut errors = Vec::new();

        let device_id = match require_mac(self.mac.as_deref()) {
            Ok(mac) => mac,
            Err(AppError::Validation(details)) => {
                errors.extend(details);
                String::new()
            }
            Err(other) => return Err(other),
        };

        let display_name = policy::non_blank(self.display_name);
        if display_name
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_DISPLAY_NAME_CHARS)
        {
            errors.push(FieldError::new(
                "display_name",
                format!("display_name deve ter no máximo {MAX_DISPLAY_NAME_CHARS} caracteres"),
            ));
        }

        check_percent("batt_warning", self.batt_warning, &mut errors);
        check_percent("max_hum", self.max_hum, &mut errors);
        check_percent("min_hum", self.min_hum, &mut errors);

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(ConfigUpsert {
            device_id,
            display_name,
            battery_warning_pct: self.batt_warning,
            temp_max: self.max_temp,
            temp_min: self.min_temp,
            humidity_max: self.max_hum,
            humidity_min: self.min_hum,
            linked_door_device_id: policy::non_blank(self.sensor_porta_vinculado),
            maintenance_mode: policy::maintenance_flag(self.maintenance_mode),
            updated_at: now,
        })
    }
}

/// List every device seen in telemetry with its configuration
#[utoipa::path(
    get,
    path = "/api/dispositivos",
    responses(
        (status = 200, description = "Device catalog inside the success envelope", body = Vec<DeviceDescriptor>),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Store failure"),
    ),
    tag = "devices"
)]
pub async fn list_devices(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<DeviceDescriptor>>>> {
    let catalog = devices::list_devices(state.store.as_ref()).await?;
    Ok(ApiResponse::ok(catalog))
}

/// Create or update a device configuration
#[utoipa::path(
    patch,
    path = "/api/dispositivos",
    request_body = DevicePayload,
    responses(
        (status = 200, description = "Saved configuration inside the success envelope", body = SensorConfig),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid API key"),
    ),
    tag = "devices"
)]
pub async fn update_device(
    State(state): State<AppState>,
    payload: Result<Json<DevicePayload>, JsonRejection>,
) -> AppResult<Json<ApiResponse<SensorConfig>>> {
    let Json(payload) =
        payload.map_err(|e| AppError::BadRequest(format!("Dados de entrada inválidos: {e}")))?;

    let upsert = payload.into_upsert(Utc::now())?;
    let saved = devices::upsert_device(state.store.as_ref(), upsert).await?;

    Ok(ApiResponse::with_message(saved, "Configuração salva!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DevicePayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn loose_fields_are_normalized() {
        let now = Utc::now();
        let upsert = parse(
            r#"{
                "mac": "AA:BB:CC:DD:EE:FF",
                "display_name": "",
                "batt_warning": "15",
                "max_temp": -2.5,
                "min_temp": "",
                "max_hum": null,
                "sensor_porta_vinculado": ""
            }"#,
        )
        .into_upsert(now)
        .unwrap();

        assert_eq!(upsert.display_name, None);
        assert_eq!(upsert.battery_warning_pct, Some(15.0));
        assert_eq!(upsert.temp_max, Some(-2.5));
        assert_eq!(upsert.temp_min, None);
        assert_eq!(upsert.humidity_max, None);
        assert_eq!(upsert.linked_door_device_id, None);
        assert!(!upsert.maintenance_mode);
        assert_eq!(upsert.updated_at, now);
    }

    #[test]
    fn maintenance_flag_is_kept() {
        let upsert = parse(r#"{"mac": "AA:BB:CC:DD:EE:FF", "maintenance_mode": true}"#)
            .into_upsert(Utc::now())
            .unwrap();
        assert!(upsert.maintenance_mode);
    }

    #[test]
    fn rejects_out_of_range_and_missing_mac() {
        let missing = parse(r#"{"display_name": "Freezer"}"#).into_upsert(Utc::now());
        assert!(matches!(missing, Err(AppError::MissingIdentifier("mac"))));

        let battery = parse(r#"{"mac": "AA:BB:CC:DD:EE:FF", "batt_warning": 120}"#)
            .into_upsert(Utc::now());
        assert!(matches!(battery, Err(AppError::Validation(_))));

        let humidity = parse(r#"{"mac": "AA:BB:CC:DD:EE:FF", "min_hum": "-1"}"#)
            .into_upsert(Utc::now());
        assert!(matches!(humidity, Err(AppError::Validation(_))));

        let long_name = DevicePayload {
            mac: Some("AA:BB:CC:DD:EE:FF".to_string()),
            display_name: Some("x".repeat(256)),
            ..DevicePayload::default()
        };
        assert!(long_name.into_upsert(Utc::now()).is_err());
    }

    #[test]
    fn every_bad_field_is_reported() {
        let result = parse(
            r#"{"mac": "AA:BB", "batt_warning": 101, "max_hum": 150, "min_hum": 10}"#,
        )
        .into_upsert(Utc::now());

        let Err(AppError::Validation(details)) = result else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["mac", "batt_warning", "max_hum"]);
    }

    #[test]
    fn non_numeric_text_fails_to_deserialize() {
        assert!(serde_json::from_str::<DevicePayload>(r#"{"batt_warning": "abc"}"#).is_err());
    }
}
