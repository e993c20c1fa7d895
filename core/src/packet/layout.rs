//! Byte layout of a Puck data packet. All multi-byte fields are little-endian.
//!
//! ```text
//! offset  size  field
//! 0       100   block 0: header u16, azimuth u16, 32 x (distance u16, intensity u8)
//! ...
//! 1100    100   block 11
//! 1200    4     timestamp u32 (microseconds past the hour)
//! 1204    1     return mode
//! 1205    1     product id
//! ```

pub const BLOCKS_PER_PACKET: usize = 12;
pub const FIRINGS_PER_BLOCK: usize = 2;
pub const FIRINGS_PER_PACKET: usize = BLOCKS_PER_PACKET * FIRINGS_PER_BLOCK;
pub const RETURNS_PER_FIRING: usize = 16;
pub const RETURNS_PER_BLOCK: usize = FIRINGS_PER_BLOCK * RETURNS_PER_FIRING;

/// Bytes per channel return: distance u16 + intensity u8.
pub const RETURN_SIZE: usize = 3;
pub const BLOCK_HEADER_SIZE: usize = 4;
pub const BLOCK_SIZE: usize = BLOCK_HEADER_SIZE + RETURNS_PER_BLOCK * RETURN_SIZE;
pub const TRAILER_OFFSET: usize = BLOCKS_PER_PACKET * BLOCK_SIZE;
pub const PACKET_SIZE: usize = TRAILER_OFFSET + 6;

/// Block marker of the upper laser bank, `0xFF 0xEE` on the wire.
pub const UPPER_BANK: u16 = 0xEEFF;

/// Meters per raw distance unit.
pub const DISTANCE_RESOLUTION: f64 = 0.002;

/// Raw azimuth units per degree.
pub const AZIMUTH_UNITS_PER_DEGREE: f64 = 100.0;

pub const fn block_offset(block: usize) -> usize {
    block * BLOCK_SIZE
}

/// Offset of a channel return relative to the start of its block.
pub const fn return_offset(firing_in_block: usize, channel: usize) -> usize {
    BLOCK_HEADER_SIZE + (firing_in_block * RETURNS_PER_FIRING + channel) * RETURN_SIZE
}
