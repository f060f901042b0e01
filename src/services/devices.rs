use crate::correlation::{build_device_catalog, ConfigIndex};
use crate::domain::{ConfigUpsert, DeviceDescriptor, SensorConfig};
use crate::error::AppResult;
use crate::store::TelemetryStore;

/// Every distinct `(gateway, device)` seen in telemetry, merged with its config.
pub async fn list_devices(store: &dyn TelemetryStore) -> AppResult<Vec<DeviceDescriptor>> {
    let (pairs, configs) =
        tokio::try_join!(store.readings_projection_all(), store.config_all())?;

    let index = ConfigIndex::build(configs);
    let catalog = build_device_catalog(&pairs, &index);

    tracing::debug!(
        rows = pairs.len(),
        configs = index.len(),
        devices = catalog.len(),
        "Built device catalog"
    );

    Ok(catalog)
}

pub async fn upsert_device(
    store: &dyn TelemetryStore,
    upsert: ConfigUpsert,
) -> AppResult<SensorConfig> {
    let device_id = upsert.device_id.clone();
    let saved = store.config_upsert(upsert).await?;

    tracing::info!(device_id = %device_id, "Device configuration saved");
    Ok(saved)
}
