use std::f64::consts::TAU;

/// Range to the wall of a slightly lobed room, seen from its centre.
pub fn room_range(azimuth: f64, base_range: f64) -> f64 {
    base_range * (1.0 + 0.15 * (3.0 * azimuth).sin())
}

/// Adds a box-shaped obstacle in front of the sensor (around azimuth 0).
pub fn with_obstacle(azimuth: f64, range: f64, obstacle_range: f64) -> f64 {
    let offset = azimuth.min(TAU - azimuth);
    if offset < 0.2 {
        range.min(obstacle_range)
    } else {
        range
    }
}
