//! Sub-block azimuth recovery.
//!
//! A block carries one azimuth for two firings. The second firing's azimuth
//! is the midpoint towards the next block, and each laser inside a firing is
//! shifted further by its share of the firing interval, assuming constant
//! angular velocity.

use crate::geometry::{CHANNEL_COUNT, CHANNEL_INTERVAL, FIRING_INTERVAL};
use crate::math::AngleHelper;
use crate::packet::layout::{BLOCKS_PER_PACKET, FIRINGS_PER_BLOCK, FIRINGS_PER_PACKET};
use crate::packet::ValidatedBlocks;

/// Azimuth, distance and intensity of every channel in one firing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Firing {
    /// Firing azimuth in radians, within `[0, 2π)`.
    pub azimuth: f64,
    pub channel_azimuth: [f64; CHANNEL_COUNT],
    /// Meters.
    pub distance: [f64; CHANNEL_COUNT],
    pub intensity: [u8; CHANNEL_COUNT],
}

/// The 24 firings of one packet.
#[derive(Debug, Clone, PartialEq)]
pub struct FiringSet {
    firings: [Firing; FIRINGS_PER_PACKET],
}

impl FiringSet {
    pub fn get(&self, firing: usize) -> &Firing {
        &self.firings[firing]
    }

    pub fn azimuth(&self, firing: usize) -> f64 {
        self.firings[firing].azimuth
    }

    pub fn iter(&self) -> impl Iterator<Item = &Firing> {
        self.firings.iter()
    }
}

impl Default for FiringSet {
    fn default() -> Self {
        Self {
            firings: [Firing::default(); FIRINGS_PER_PACKET],
        }
    }
}

/// Owns the per-packet firing scratch so decoding never allocates.
#[derive(Debug, Default)]
pub struct AzimuthInterpolator {
    scratch: FiringSet,
}

impl AzimuthInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the scratch firings from a validated packet and returns them.
    pub fn interpolate(&mut self, blocks: &ValidatedBlocks<'_>) -> &FiringSet {
        let mut block_azimuths = [0.0; BLOCKS_PER_PACKET];
        for (slot, block) in block_azimuths.iter_mut().zip(blocks.blocks()) {
            *slot = block.azimuth();
        }
        let azimuths = Self::firing_azimuths(&block_azimuths);

        for (index, firing) in self.scratch.firings.iter_mut().enumerate() {
            let block = blocks.block(index / FIRINGS_PER_BLOCK);
            let firing_in_block = index % FIRINGS_PER_BLOCK;
            let step = Self::adjacent_diff(&azimuths, index);

            firing.azimuth = azimuths[index];
            for channel in 0..CHANNEL_COUNT {
                let value = block.channel_return(firing_in_block, channel);
                firing.channel_azimuth[channel] = Self::channel_azimuth(azimuths[index], step, channel);
                firing.distance[channel] = value.distance();
                firing.intensity[channel] = value.intensity;
            }
        }

        &self.scratch
    }

    /// Expands 12 block azimuths into 24 firing azimuths.
    ///
    /// Even firings take their block's azimuth. Odd firings sit halfway to
    /// the next block; the last one has no next block and extrapolates from
    /// the spacing of firings 20 and 22 instead.
    pub fn firing_azimuths(
        block_azimuths: &[f64; BLOCKS_PER_PACKET],
    ) -> [f64; FIRINGS_PER_PACKET] {
        let mut azimuths = [0.0; FIRINGS_PER_PACKET];
        for (index, &azimuth) in block_azimuths.iter().enumerate() {
            azimuths[index * FIRINGS_PER_BLOCK] = azimuth;
        }

        for index in (1..FIRINGS_PER_PACKET).step_by(FIRINGS_PER_BLOCK) {
            let (left, right) = if index == FIRINGS_PER_PACKET - 1 {
                (index - 3, index - 1)
            } else {
                (index - 1, index + 1)
            };
            let diff = AngleHelper::forward_diff(azimuths[left], azimuths[right]);
            azimuths[index] = AngleHelper::wrap_once(azimuths[index - 1] + diff / 2.0);
        }

        azimuths
    }

    /// Rotation covered by one firing interval around `index`: towards the
    /// next firing, or from the previous one for the last firing.
    fn adjacent_diff(azimuths: &[f64; FIRINGS_PER_PACKET], index: usize) -> f64 {
        if index < FIRINGS_PER_PACKET - 1 {
            AngleHelper::forward_diff(azimuths[index], azimuths[index + 1])
        } else {
            AngleHelper::forward_diff(azimuths[index - 1], azimuths[index])
        }
    }

    fn channel_azimuth(firing_azimuth: f64, step: f64, channel: usize) -> f64 {
        let fraction = channel as f64 * CHANNEL_INTERVAL / FIRING_INTERVAL;
        AngleHelper::wrap_once(firing_azimuth + fraction * step)
    }
}
