use std::collections::HashSet;

use crate::domain::policy::{self, NameFallback};
use crate::domain::{DeviceDescriptor, GatewayDevicePair};

use super::ConfigIndex;

/// Reduce the `(gateway, device)` projection of every reading to one
/// descriptor per distinct pair, merged with the device's config.
///
/// Output order is first-occurrence order of `pairs`; callers wanting a
/// deterministic listing sort the input first. A device reporting through
/// two gateways yields two descriptors.
#[must_use]
pub fn build_device_catalog(
    pairs: &[GatewayDevicePair],
    configs: &ConfigIndex,
) -> Vec<DeviceDescriptor> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut catalog = Vec::new();

    for pair in pairs {
        if !seen.insert((pair.gateway_id.as_str(), pair.device_id.as_str())) {
            continue;
        }

        let config = configs.get(&pair.device_id);
        catalog.push(DeviceDescriptor {
            gateway_id: pair.gateway_id.clone(),
            device_id: pair.device_id.clone(),
            display_name: NameFallback::Catalog.resolve(
                config.and_then(|c| c.display_name.as_deref()),
                &pair.device_id,
            ),
            battery_warning_pct: policy::battery_warning_or_default(
                config.and_then(|c| c.battery_warning_pct),
            ),
            temp_max: config.and_then(|c| c.temp_max),
            temp_min: config.and_then(|c| c.temp_min),
            humidity_max: config.and_then(|c| c.humidity_max),
            humidity_min: config.and_then(|c| c.humidity_min),
            linked_door_device_id: config.and_then(|c| c.linked_door_device_id.clone()),
            maintenance_mode: config.is_some_and(|c| c.maintenance_mode),
        });
    }

    catalog
}
