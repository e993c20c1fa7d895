use serde::{Deserialize, Serialize};

/// Single decoded lidar return in the output frame (x forward, y left, z up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Seconds since the start of the sweep.
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Radians.
    pub azimuth: f64,
    /// Meters.
    pub distance: f64,
    pub intensity: u8,
}

impl Point {
    pub fn new(
        time: f64,
        x: f64,
        y: f64,
        z: f64,
        azimuth: f64,
        distance: f64,
        intensity: u8,
    ) -> Self {
        Self {
            time,
            x,
            y,
            z,
            azimuth,
            distance,
            intensity,
        }
    }
}
