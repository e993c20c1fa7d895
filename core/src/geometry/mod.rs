pub mod channels;
pub mod timing;

pub use channels::{ChannelGeometry, ChannelGeometryTable, CHANNEL_COUNT};
pub use timing::{CHANNEL_INTERVAL, FIRING_INTERVAL};
