use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub mac: String,
    pub display_name: Option<String>,
    pub batt_warning: Option<f64>,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub hum_max: Option<f64>,
    pub hum_min: Option<f64>,
    pub sensor_porta_vinculado: Option<String>,
    pub em_manutencao: Option<bool>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
