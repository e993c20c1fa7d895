use crate::packet::layout::{
    block_offset, return_offset, AZIMUTH_UNITS_PER_DEGREE, BLOCKS_PER_PACKET, PACKET_SIZE,
    TRAILER_OFFSET, UPPER_BANK,
};
use crate::packet::parser::PacketTrailer;

/// Encodes packets in the wire layout the parser reads.
///
/// Starts from a packet with valid headers, zero azimuths, zero returns and
/// a zeroed trailer.
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    bytes: [u8; PACKET_SIZE],
}

impl PacketBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            bytes: [0; PACKET_SIZE],
        };
        for block in 0..BLOCKS_PER_PACKET {
            builder.set_header(block, UPPER_BANK);
        }
        builder
    }

    pub fn set_header(&mut self, block: usize, header: u16) -> &mut Self {
        self.write_u16(block_offset(block), header)
    }

    pub fn set_raw_azimuth(&mut self, block: usize, hundredths: u16) -> &mut Self {
        self.write_u16(block_offset(block) + 2, hundredths)
    }

    /// Sets a block azimuth from degrees, rounded to the wire resolution.
    pub fn set_azimuth_degrees(&mut self, block: usize, degrees: f64) -> &mut Self {
        let hundredths = (degrees.rem_euclid(360.0) * AZIMUTH_UNITS_PER_DEGREE).round() as u32;
        self.set_raw_azimuth(block, (hundredths % 36_000) as u16)
    }

    pub fn set_return(
        &mut self,
        block: usize,
        firing_in_block: usize,
        channel: usize,
        distance_raw: u16,
        intensity: u8,
    ) -> &mut Self {
        let offset = block_offset(block) + return_offset(firing_in_block, channel);
        self.write_u16(offset, distance_raw);
        self.bytes[offset + 2] = intensity;
        self
    }

    pub fn set_trailer(&mut self, trailer: PacketTrailer) -> &mut Self {
        self.bytes[TRAILER_OFFSET..TRAILER_OFFSET + 4]
            .copy_from_slice(&trailer.timestamp_us.to_le_bytes());
        self.bytes[TRAILER_OFFSET + 4] = trailer.return_mode;
        self.bytes[TRAILER_OFFSET + 5] = trailer.product_id;
        self
    }

    pub fn build(&self) -> [u8; PACKET_SIZE] {
        self.bytes
    }

    fn write_u16(&mut self, offset: usize, value: u16) -> &mut Self {
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        self
    }
}

impl Default for PacketBuilder {
    fn default() -> Self {
        Self::new()
    }
}
