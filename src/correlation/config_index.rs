use std::collections::HashMap;

use crate::domain::{ConfigSummary, DeviceKeyed, DoorStatusEvent, SensorConfig};

/// Lookup from device identifier to a keyed record.
///
/// Built with first-wins semantics: when the input holds several records
/// for one device, the earliest one is kept.
#[derive(Debug, Clone)]
pub struct DeviceIndex<T> {
    entries: HashMap<String, T>,
}

/// Full configs by device.
pub type ConfigIndex = DeviceIndex<SensorConfig>;

/// Name/maintenance projections by device.
pub type ConfigSummaryIndex = DeviceIndex<ConfigSummary>;

/// Latest door state by device.
pub type DoorStatusIndex = DeviceIndex<DoorStatusEvent>;

impl<T: DeviceKeyed> DeviceIndex<T> {
    #[must_use]
    pub fn build(records: impl IntoIterator<Item = T>) -> Self {
        let mut entries = HashMap::new();
        for record in records {
            entries
                .entry(record.device_id().to_string())
                .or_insert(record);
        }
        Self { entries }
    }

    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<&T> {
        self.entries.get(device_id)
    }

    #[must_use]
    pub fn contains(&self, device_id: &str) -> bool {
        self.entries.contains_key(device_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: DeviceKeyed> FromIterator<T> for DeviceIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::build(iter)
    }
}
