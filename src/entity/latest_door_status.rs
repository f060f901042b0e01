use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `view_latest_door_status`: newest `door_logs` row per sensor.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "view_latest_door_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sensor_mac: String,
    pub is_open: bool,
    pub timestamp_read: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
