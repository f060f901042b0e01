use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::conversions::{ConfigSummaryRow, PairRow};
use super::{ReadingQuery, TelemetryStore};
use crate::domain::{
    ConfigSummary, ConfigUpsert, DoorStatusEvent, GatewayDevicePair, SensorConfig,
    TelemetryReading,
};
use crate::entity::{
    door_logs, latest_door_status, latest_telemetry, sensor_configs, telemetry_logs,
};

/// [`TelemetryStore`] backed by the hosted Postgres database.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TelemetryStore for PgStore {
    async fn readings_by_device(
        &self,
        device_id: &str,
        query: ReadingQuery,
    ) -> Result<Vec<TelemetryReading>, DbErr> {
        let mut select =
            telemetry_logs::Entity::find().filter(telemetry_logs::Column::Mac.eq(device_id));

        if let Some(start) = query.start {
            select = select.filter(telemetry_logs::Column::Ts.gte(start));
        }
        if let Some(end) = query.end {
            select = select.filter(telemetry_logs::Column::Ts.lte(end));
        }

        select = select.order_by_desc(telemetry_logs::Column::Ts);
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let rows = select.all(&self.db).await?;
        Ok(rows.into_iter().map(TelemetryReading::from).collect())
    }

    async fn readings_projection_all(&self) -> Result<Vec<GatewayDevicePair>, DbErr> {
        let rows = telemetry_logs::Entity::find()
            .select_only()
            .column(telemetry_logs::Column::Gw)
            .column(telemetry_logs::Column::Mac)
            .into_model::<PairRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(GatewayDevicePair::from).collect())
    }

    async fn latest_reading_per_device(&self) -> Result<Vec<TelemetryReading>, DbErr> {
        let rows = latest_telemetry::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(TelemetryReading::from).collect())
    }

    async fn config_all(&self) -> Result<Vec<SensorConfig>, DbErr> {
        let rows = sensor_configs::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(SensorConfig::from).collect())
    }

    async fn config_by_device(&self, device_id: &str) -> Result<Option<SensorConfig>, DbErr> {
        let row = sensor_configs::Entity::find_by_id(device_id.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(SensorConfig::from))
    }

    async fn config_names_and_maintenance(&self) -> Result<Vec<ConfigSummary>, DbErr> {
        let rows = sensor_configs::Entity::find()
            .select_only()
            .column(sensor_configs::Column::Mac)
            .column(sensor_configs::Column::DisplayName)
            .column(sensor_configs::Column::EmManutencao)
            .into_model::<ConfigSummaryRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ConfigSummary::from).collect())
    }

    async fn door_status_latest(&self) -> Result<Vec<DoorStatusEvent>, DbErr> {
        let rows = latest_door_status::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(DoorStatusEvent::from).collect())
    }

    async fn door_events_by_device(
        &self,
        device_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DoorStatusEvent>, DbErr> {
        let rows = door_logs::Entity::find()
            .filter(door_logs::Column::SensorMac.eq(device_id))
            .filter(door_logs::Column::TimestampRead.gte(start))
            .filter(door_logs::Column::TimestampRead.lte(end))
            .order_by_asc(door_logs::Column::TimestampRead)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(DoorStatusEvent::from).collect())
    }

    async fn config_upsert(&self, upsert: ConfigUpsert) -> Result<SensorConfig, DbErr> {
        let model = sensor_configs::Entity::insert(sensor_configs::ActiveModel::from(upsert))
            .on_conflict(
                OnConflict::column(sensor_configs::Column::Mac)
                    .update_columns([
                        sensor_configs::Column::DisplayName,
                        sensor_configs::Column::BattWarning,
                        sensor_configs::Column::TempMax,
                        sensor_configs::Column::TempMin,
                        sensor_configs::Column::HumMax,
                        sensor_configs::Column::HumMin,
                        sensor_configs::Column::SensorPortaVinculado,
                        sensor_configs::Column::EmManutencao,
                        sensor_configs::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        Ok(SensorConfig::from(model))
    }
}
