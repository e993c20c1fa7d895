pub mod angles;

pub use angles::AngleHelper;
