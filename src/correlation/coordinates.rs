use crate::domain::{Coordinate, TelemetryReading};

/// Project readings to map points, resolving legacy location columns and
/// dropping readings without both latitude and longitude. Order is kept.
#[must_use]
pub fn extract_coordinates(readings: &[TelemetryReading]) -> Vec<Coordinate> {
    readings
        .iter()
        .filter_map(|reading| {
            Some(Coordinate {
                ts: reading.timestamp,
                lat: reading.resolved_latitude()?,
                lng: reading.resolved_longitude()?,
                alt: reading.resolved_altitude(),
            })
        })
        .collect()
}
