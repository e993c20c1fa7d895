use crate::geometry::{ChannelGeometryTable, CHANNEL_INTERVAL, FIRING_INTERVAL};
use crate::output::Point;
use crate::prelude::DecoderConfig;

/// Projects range measurements into Cartesian points.
#[derive(Debug, Clone)]
pub struct PointProjector {
    geometry: ChannelGeometryTable,
    min_range: f64,
    max_range: f64,
}

impl PointProjector {
    pub fn new(geometry: ChannelGeometryTable, config: &DecoderConfig) -> Self {
        Self {
            geometry,
            min_range: config.min_range,
            max_range: config.max_range,
        }
    }

    pub fn geometry(&self) -> &ChannelGeometryTable {
        &self.geometry
    }

    pub fn in_range(&self, distance: f64) -> bool {
        distance >= self.min_range && distance <= self.max_range
    }

    /// Returns `None` when the distance falls outside the configured range.
    ///
    /// The sensor frame has x to the right and y forward; the output frame
    /// is rotated so x points forward and y to the left.
    pub fn project(
        &self,
        firing_index: usize,
        channel: usize,
        distance: f64,
        azimuth: f64,
        intensity: u8,
        packet_start_time: f64,
    ) -> Option<Point> {
        if !self.in_range(distance) {
            return None;
        }

        let geometry = self.geometry.get(channel);
        let horizontal = distance * geometry.cos_altitude;
        let sensor_x = horizontal * azimuth.sin();
        let sensor_y = horizontal * azimuth.cos();
        let sensor_z = distance * geometry.sin_altitude;

        let time = packet_start_time
            + FIRING_INTERVAL * firing_index as f64
            + CHANNEL_INTERVAL * channel as f64;

        Some(Point::new(
            time, sensor_y, -sensor_x, sensor_z, azimuth, distance, intensity,
        ))
    }
}
