pub mod assembler;
pub mod azimuth;
pub mod projector;

pub use assembler::{AssemblerPhase, DecodeOutcome, DecoderState, Step, SweepAssembler};
pub use azimuth::{AzimuthInterpolator, Firing, FiringSet};
pub use projector::PointProjector;
