use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Door transitions inferred upstream from temperature spikes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "door_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sensor_mac: String,
    pub is_open: bool,
    pub timestamp_read: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
