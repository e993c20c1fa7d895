pub mod cloud;
pub mod point;
pub mod sweep;

pub use cloud::{CloudField, PointCloud};
pub use point::Point;
pub use sweep::{Scan, Sweep};
