//! In-memory correlation of the telemetry, config and door-status feeds.
//!
//! Every function here is pure and total: it works on data already fetched
//! from the store and returns an empty result for empty input.

mod config_index;
mod coordinates;
mod device_catalog;
mod door_board;
mod downsample;
mod latest_readings;

pub use config_index::{ConfigIndex, ConfigSummaryIndex, DeviceIndex, DoorStatusIndex};
pub use coordinates::extract_coordinates;
pub use device_catalog::build_device_catalog;
pub use door_board::build_door_board;
pub use downsample::{
    build_history_view, downsample, HistoryWindow, MAX_HISTORY_LIMIT, MIN_SPACING_MS,
};
pub use latest_readings::{latest_per_device, resolve_latest_readings};
