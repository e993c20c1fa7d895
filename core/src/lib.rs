//! Decoding core for the 16-channel Puck (VLP-16) spinning lidar.
//!
//! Raw 1206-byte data packets go in one at a time; completed 360° sweeps of
//! time-stamped Cartesian points come out through a [`prelude::SweepSink`].
//! The modules follow the decode pipeline: wire parsing, azimuth
//! interpolation, channel geometry, point projection and sweep assembly.

pub mod geometry;
pub mod math;
pub mod output;
pub mod packet;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{DecodeError, DecodeResult, DecoderConfig, SweepSink};
pub use processing::{DecodeOutcome, SweepAssembler};
