use serde::{Deserialize, Serialize};

use crate::geometry::CHANNEL_COUNT;
use crate::output::cloud::PointCloud;
use crate::output::point::Point;

/// Points of one laser over a sweep, in firing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// Altitude angle of the laser (radians).
    pub altitude: f64,
    pub points: Vec<Point>,
}

impl Scan {
    pub fn new(altitude: f64) -> Self {
        Self {
            altitude,
            points: Vec::new(),
        }
    }
}

/// One full revolution of points, indexed by physical channel
/// (lowest beam first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    /// Index of this sweep in the decoded stream, starting at 0.
    pub sequence: u64,
    pub scans: [Scan; CHANNEL_COUNT],
}

impl Sweep {
    pub fn new(sequence: u64, altitudes: [f64; CHANNEL_COUNT]) -> Self {
        Self {
            sequence,
            scans: altitudes.map(Scan::new),
        }
    }

    /// Empty sweep with the same altitudes, reserving what this one used.
    pub fn successor(&self) -> Self {
        let altitudes = std::array::from_fn(|channel| self.scans[channel].altitude);
        let mut next = Self::new(self.sequence + 1, altitudes);
        for (scan, previous) in next.scans.iter_mut().zip(&self.scans) {
            scan.points.reserve(previous.points.len());
        }
        next
    }

    pub fn push(&mut self, physical_channel: usize, point: Point) {
        self.scans[physical_channel].points.push(point);
    }

    pub fn point_count(&self) -> usize {
        self.scans.iter().map(|scan| scan.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.iter().all(|scan| scan.points.is_empty())
    }

    pub fn clear(&mut self) {
        for scan in &mut self.scans {
            scan.points.clear();
        }
    }

    /// All points, channel by channel.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.scans.iter().flat_map(|scan| scan.points.iter())
    }

    pub fn to_point_cloud(&self) -> PointCloud {
        PointCloud::from_sweep(self)
    }
}
