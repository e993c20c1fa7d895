use serde::{Deserialize, Serialize};

use crate::math::AngleHelper;
use crate::packet::layout::{
    block_offset, return_offset, AZIMUTH_UNITS_PER_DEGREE, BLOCKS_PER_PACKET, DISTANCE_RESOLUTION,
    PACKET_SIZE, RETURNS_PER_FIRING, TRAILER_OFFSET, UPPER_BANK,
};
use crate::prelude::PacketError;

/// One laser return as stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelReturn {
    pub distance_raw: u16,
    pub intensity: u8,
}

impl ChannelReturn {
    /// Distance in meters.
    pub fn distance(&self) -> f64 {
        f64::from(self.distance_raw) * DISTANCE_RESOLUTION
    }
}

/// Trailing packet fields following the twelve blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketTrailer {
    /// Microseconds past the top of the hour.
    pub timestamp_us: u32,
    pub return_mode: u8,
    pub product_id: u8,
}

/// Stateless validator over the packet byte layout.
pub struct RawPacketParser;

impl RawPacketParser {
    /// Checks the buffer length and every block header.
    ///
    /// Any failure rejects the whole packet; no partially parsed view is
    /// ever returned.
    pub fn parse(buffer: &[u8]) -> Result<ValidatedBlocks<'_>, PacketError> {
        let bytes: &[u8; PACKET_SIZE] = buffer.try_into().map_err(|_| PacketError::Length {
            expected: PACKET_SIZE,
            actual: buffer.len(),
        })?;

        for block in 0..BLOCKS_PER_PACKET {
            let header = read_u16(bytes, block_offset(block));
            if header != UPPER_BANK {
                return Err(PacketError::InvalidHeader { block, header });
            }
        }

        Ok(ValidatedBlocks { bytes })
    }
}

/// Borrowed view over a packet whose length and headers have been checked.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedBlocks<'a> {
    bytes: &'a [u8; PACKET_SIZE],
}

impl<'a> ValidatedBlocks<'a> {
    pub fn block(&self, block: usize) -> BlockView<'a> {
        let start = block_offset(block);
        BlockView {
            bytes: self.bytes,
            start,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = BlockView<'a>> {
        let view = *self;
        (0..BLOCKS_PER_PACKET).map(move |block| view.block(block))
    }

    pub fn trailer(&self) -> PacketTrailer {
        PacketTrailer {
            timestamp_us: u32::from_le_bytes([
                self.bytes[TRAILER_OFFSET],
                self.bytes[TRAILER_OFFSET + 1],
                self.bytes[TRAILER_OFFSET + 2],
                self.bytes[TRAILER_OFFSET + 3],
            ]),
            return_mode: self.bytes[TRAILER_OFFSET + 4],
            product_id: self.bytes[TRAILER_OFFSET + 5],
        }
    }
}

/// One data block: an azimuth and two firings of 16 returns.
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a> {
    bytes: &'a [u8; PACKET_SIZE],
    start: usize,
}

impl BlockView<'_> {
    /// Azimuth in hundredths of a degree, as sent.
    pub fn raw_azimuth(&self) -> u16 {
        read_u16(self.bytes, self.start + 2)
    }

    /// Azimuth in radians, wrapped into `[0, 2π)`.
    pub fn azimuth(&self) -> f64 {
        let degrees = f64::from(self.raw_azimuth()) / AZIMUTH_UNITS_PER_DEGREE;
        AngleHelper::normalize(degrees.to_radians())
    }

    pub fn channel_return(&self, firing_in_block: usize, channel: usize) -> ChannelReturn {
        debug_assert!(channel < RETURNS_PER_FIRING);
        let offset = self.start + return_offset(firing_in_block, channel);
        ChannelReturn {
            distance_raw: read_u16(self.bytes, offset),
            intensity: self.bytes[offset + 2],
        }
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
