use anyhow::{ensure, Context};
use puckcore::geometry::{ChannelGeometryTable, CHANNEL_COUNT, FIRING_INTERVAL};
use puckcore::packet::layout::{
    BLOCKS_PER_PACKET, DISTANCE_RESOLUTION, FIRINGS_PER_BLOCK, FIRINGS_PER_PACKET, PACKET_SIZE,
};
use puckcore::packet::{PacketBuilder, PacketTrailer};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::generator::template::{room_range, with_obstacle};

const MICROS_PER_HOUR: u64 = 3_600_000_000;
const RETURN_MODE_STRONGEST: u8 = 0x37;
const PRODUCT_ID_PUCK: u8 = 0x22;

/// Configuration for generating a synthetic packet stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub packets: usize,
    /// Rotation rate in Hz.
    pub frequency: f64,
    pub start_azimuth_deg: f64,
    /// Mean distance to the room walls (meters).
    pub base_range: f64,
    /// Distance of the obstacle in front of the sensor (meters).
    pub obstacle_range: f64,
    /// Uniform range noise amplitude (meters).
    pub noise: f64,
    /// Probability of a return being lost.
    pub dropout: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            packets: 754,
            frequency: 10.0,
            start_azimuth_deg: 0.0,
            base_range: 12.0,
            obstacle_range: 4.0,
            noise: 0.02,
            dropout: 0.01,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.frequency.is_finite() && self.frequency > 0.0,
            "generator frequency must be positive, got {}",
            self.frequency
        );
        ensure!(
            (0.0..=1.0).contains(&self.dropout),
            "dropout must be a probability, got {}",
            self.dropout
        );
        ensure!(
            self.noise >= 0.0 && self.base_range > 0.0,
            "noise must be non-negative and base_range positive"
        );
        Ok(())
    }

    /// Degrees turned between two consecutive blocks.
    fn degrees_per_block(&self) -> f64 {
        360.0 * self.frequency * FIRING_INTERVAL * FIRINGS_PER_BLOCK as f64
    }

    /// Packets needed for one revolution at the configured rate.
    pub fn packets_per_revolution(&self) -> f64 {
        1.0 / (self.frequency * FIRING_INTERVAL * FIRINGS_PER_PACKET as f64)
    }
}

fn build_packet(
    config: &GeneratorConfig,
    geometry: &ChannelGeometryTable,
    rng: &mut StdRng,
    index: usize,
) -> [u8; PACKET_SIZE] {
    let step = config.degrees_per_block();
    let mut builder = PacketBuilder::new();

    for block in 0..BLOCKS_PER_PACKET {
        let block_degrees =
            config.start_azimuth_deg + step * (index * BLOCKS_PER_PACKET + block) as f64;
        builder.set_azimuth_degrees(block, block_degrees);

        for firing in 0..FIRINGS_PER_BLOCK {
            let azimuth = (block_degrees + step * firing as f64 / FIRINGS_PER_BLOCK as f64)
                .rem_euclid(360.0)
                .to_radians();
            let wall = room_range(azimuth, config.base_range);
            let horizontal = with_obstacle(azimuth, wall, config.obstacle_range);

            for channel in 0..CHANNEL_COUNT {
                if config.dropout > 0.0 && rng.gen_bool(config.dropout) {
                    builder.set_return(block, firing, channel, 0, 0);
                    continue;
                }
                let mut distance = horizontal / geometry.get(channel).cos_altitude;
                if config.noise > 0.0 {
                    distance += rng.gen_range(-config.noise..config.noise);
                }
                let raw = (distance.max(0.0) / DISTANCE_RESOLUTION)
                    .round()
                    .min(f64::from(u16::MAX)) as u16;
                let intensity = (255.0 * (1.0 - distance / 120.0)).clamp(0.0, 255.0) as u8;
                builder.set_return(block, firing, channel, raw, intensity);
            }
        }
    }

    let elapsed_us = (index as f64 * FIRINGS_PER_PACKET as f64 * FIRING_INTERVAL * 1e6) as u64;
    builder.set_trailer(PacketTrailer {
        timestamp_us: (elapsed_us % MICROS_PER_HOUR) as u32,
        return_mode: RETURN_MODE_STRONGEST,
        product_id: PRODUCT_ID_PUCK,
    });
    builder.build()
}

pub fn build_packets_from_config(
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<[u8; PACKET_SIZE]>> {
    config.validate().context("validating generator config")?;

    let geometry = ChannelGeometryTable::puck();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let packets = (0..config.packets)
        .map(|index| build_packet(config, &geometry, &mut rng, index))
        .collect();
    Ok(packets)
}

#[cfg(test)]
pub fn build_packets(packets: usize, frequency: f64) -> anyhow::Result<Vec<[u8; PACKET_SIZE]>> {
    let config = GeneratorConfig {
        packets,
        frequency,
        ..Default::default()
    };
    build_packets_from_config(&config)
}
