use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `view_latest_telemetry`: newest `telemetry_logs` row per MAC.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "view_latest_telemetry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub mac: String,
    pub gw: String,
    pub ts: DateTimeWithTimeZone,
    pub temp: f64,
    pub hum: f64,
    pub batt: Option<f64>,
    pub rssi: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
