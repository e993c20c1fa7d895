use std::f64::consts::TAU;

pub struct AngleHelper;

impl AngleHelper {
    /// Wraps an angle into `[0, 2π)`.
    pub fn normalize(radians: f64) -> f64 {
        let wrapped = radians.rem_euclid(TAU);
        // rem_euclid can round up to TAU for tiny negative inputs
        if wrapped >= TAU {
            0.0
        } else {
            wrapped
        }
    }

    /// Angle swept going forward from `from` to `to`, in `[0, 2π)` for
    /// normalized inputs. A negative raw difference means the rotation
    /// crossed 0°.
    pub fn forward_diff(from: f64, to: f64) -> f64 {
        let diff = to - from;
        if diff < 0.0 {
            diff + TAU
        } else {
            diff
        }
    }

    /// Brings a value that may have reached or overshot 2π by less than one
    /// turn back into `[0, 2π)`.
    pub fn wrap_once(radians: f64) -> f64 {
        if radians >= TAU {
            radians - TAU
        } else {
            radians
        }
    }
}
