pub mod collation;
pub mod policy;
mod types;

pub use types::{
    ConfigSummary, ConfigUpsert, Coordinate, DeviceDescriptor, DeviceKeyed, DoorState,
    DoorStatusEvent, DoorStatusView, GatewayDevicePair, LatestReadingView, SensorConfig,
    SensorHistoryView, SensorInfo, TelemetryReading, Timestamped,
};
