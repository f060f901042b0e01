use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Raw gateway uplinks, one row per sensor sample.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "telemetry_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub gw: String,
    pub mac: String,
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
