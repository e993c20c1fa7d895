//! Firing-cycle timing of the Puck.

/// Time between two consecutive firing sequences (seconds).
pub const FIRING_INTERVAL: f64 = 55.296e-6;

/// Time between two consecutive laser shots within a firing (seconds).
pub const CHANNEL_INTERVAL: f64 = 2.304e-6;
