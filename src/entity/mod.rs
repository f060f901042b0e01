//! sea-orm entities for the hosted telemetry schema.
//!
//! The schema is owned by the ingestion side; these mirror it read-mostly.
//! Views carry their natural key as primary key so sea-orm can address them.

pub mod door_logs;
pub mod latest_door_status;
pub mod latest_telemetry;
pub mod sensor_configs;
pub mod telemetry_logs;
