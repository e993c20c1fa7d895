//! Fixed per-channel geometry of the 16 lasers.
//!
//! Lasers fire in interleaved order: raw channel 0 points at -15°, channel 1
//! at +1°, channel 2 at -13° and so on. [`ChannelGeometryTable::remap`] turns
//! the raw firing index into the physical bottom-to-top index.

use serde::{Deserialize, Serialize};

/// Number of lasers, which is also the number of returns per firing.
pub const CHANNEL_COUNT: usize = 16;

/// Vertical angle of each laser in firing order (degrees).
const ALTITUDE_DEGREES: [f64; CHANNEL_COUNT] = [
    -15.0, 1.0, -13.0, 3.0, -11.0, 5.0, -9.0, 7.0, -7.0, 9.0, -5.0, 11.0, -3.0, 13.0, -1.0, 15.0,
];

/// Altitude angle of one laser with its precomputed sine and cosine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelGeometry {
    pub altitude: f64,
    pub sin_altitude: f64,
    pub cos_altitude: f64,
}

impl ChannelGeometry {
    fn from_degrees(degrees: f64) -> Self {
        let altitude = degrees.to_radians();
        Self {
            altitude,
            sin_altitude: altitude.sin(),
            cos_altitude: altitude.cos(),
        }
    }
}

/// Immutable lookup table indexed by raw firing channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelGeometryTable {
    channels: [ChannelGeometry; CHANNEL_COUNT],
}

impl ChannelGeometryTable {
    pub fn puck() -> Self {
        Self {
            channels: ALTITUDE_DEGREES.map(ChannelGeometry::from_degrees),
        }
    }

    pub fn get(&self, channel: usize) -> &ChannelGeometry {
        &self.channels[channel]
    }

    /// Altitude of a raw channel in radians.
    pub fn altitude(&self, channel: usize) -> f64 {
        self.channels[channel].altitude
    }

    /// Maps a raw firing channel to its physical vertical index:
    /// even channels go to `idx / 2`, odd channels to `idx / 2 + 8`.
    pub const fn remap(channel: usize) -> usize {
        debug_assert!(channel < CHANNEL_COUNT);
        if channel % 2 == 0 {
            channel / 2
        } else {
            channel / 2 + CHANNEL_COUNT / 2
        }
    }

    /// Altitudes in physical order, lowest beam first.
    pub fn physical_altitudes(&self) -> [f64; CHANNEL_COUNT] {
        let mut altitudes = [0.0; CHANNEL_COUNT];
        for (channel, geometry) in self.channels.iter().enumerate() {
            altitudes[Self::remap(channel)] = geometry.altitude;
        }
        altitudes
    }
}

impl Default for ChannelGeometryTable {
    fn default() -> Self {
        Self::puck()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_is_a_bijection() {
        let mut seen = [false; CHANNEL_COUNT];
        for channel in 0..CHANNEL_COUNT {
            let physical = ChannelGeometryTable::remap(channel);
            assert!(physical < CHANNEL_COUNT);
            assert!(!seen[physical], "physical index {} aliased", physical);
            seen[physical] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn remap_matches_interleaved_order() {
        assert_eq!(ChannelGeometryTable::remap(0), 0);
        assert_eq!(ChannelGeometryTable::remap(1), 8);
        assert_eq!(ChannelGeometryTable::remap(14), 7);
        assert_eq!(ChannelGeometryTable::remap(15), 15);
    }

    #[test]
    fn physical_altitudes_ascend() {
        let altitudes = ChannelGeometryTable::puck().physical_altitudes();
        assert!(altitudes.windows(2).all(|pair| pair[0] < pair[1]));
        assert!((altitudes[0] - (-15.0f64).to_radians()).abs() < 1e-12);
        assert!((altitudes[15] - 15.0f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn trig_values_match_altitude() {
        let table = ChannelGeometryTable::puck();
        let geometry = table.get(3);
        assert!((geometry.altitude - 3.0f64.to_radians()).abs() < 1e-12);
        assert!((geometry.sin_altitude - geometry.altitude.sin()).abs() < 1e-12);
        assert!((geometry.cos_altitude - geometry.altitude.cos()).abs() < 1e-12);
    }
}
