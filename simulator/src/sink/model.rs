use puckcore::geometry::CHANNEL_COUNT;
use puckcore::output::Sweep;
use serde::{Deserialize, Serialize};

/// Per-sweep record written by the JSON-lines sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub sequence: u64,
    pub point_count: usize,
    pub channel_counts: [usize; CHANNEL_COUNT],
    /// Degrees, over all points.
    pub min_azimuth_deg: Option<f64>,
    pub max_azimuth_deg: Option<f64>,
    /// Seconds from the sweep start to its last point.
    pub duration: f64,
}

impl SweepSummary {
    pub fn from_sweep(sweep: &Sweep) -> Self {
        let channel_counts = std::array::from_fn(|channel| sweep.scans[channel].points.len());
        let azimuths = || sweep.points().map(|point| point.azimuth.to_degrees());
        let min_azimuth_deg = azimuths().reduce(f64::min);
        let max_azimuth_deg = azimuths().reduce(f64::max);
        let duration = sweep.points().map(|point| point.time).fold(0.0, f64::max);

        Self {
            sequence: sweep.sequence,
            point_count: sweep.point_count(),
            channel_counts,
            min_azimuth_deg,
            max_azimuth_deg,
            duration,
        }
    }
}
