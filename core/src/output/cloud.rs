use ndarray::{Array2, ArrayView1};

use crate::output::sweep::Sweep;

/// Column layout of a flattened point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudField {
    X = 0,
    Y = 1,
    Z = 2,
    Intensity = 3,
    Time = 4,
    Azimuth = 5,
    Distance = 6,
}

impl CloudField {
    pub const COUNT: usize = 7;
}

/// Sweep flattened into a row-per-point `f32` matrix for generic consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    data: Array2<f32>,
}

impl PointCloud {
    /// Rows follow physical channel order, then accumulation order.
    pub fn from_sweep(sweep: &Sweep) -> Self {
        let mut data = Array2::<f32>::zeros((sweep.point_count(), CloudField::COUNT));
        for (row, point) in sweep.points().enumerate() {
            data[[row, CloudField::X as usize]] = point.x as f32;
            data[[row, CloudField::Y as usize]] = point.y as f32;
            data[[row, CloudField::Z as usize]] = point.z as f32;
            data[[row, CloudField::Intensity as usize]] = f32::from(point.intensity);
            data[[row, CloudField::Time as usize]] = point.time as f32;
            data[[row, CloudField::Azimuth as usize]] = point.azimuth as f32;
            data[[row, CloudField::Distance as usize]] = point.distance as f32;
        }
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn column(&self, field: CloudField) -> ArrayView1<'_, f32> {
        self.data.column(field as usize)
    }

    pub fn as_array(&self) -> &Array2<f32> {
        &self.data
    }
}
