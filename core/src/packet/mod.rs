pub mod builder;
pub mod layout;
pub mod parser;

pub use builder::PacketBuilder;
pub use parser::{BlockView, ChannelReturn, PacketTrailer, RawPacketParser, ValidatedBlocks};
