use tracing::warn;

use crate::function::functionerror::{
    FunctionError,
    FunctionResult
};
use crate::function::point::Point;

// ─────────────────────────────────────────────
// Accessor capability
// ─────────────────────────────────────────────
//
// Each storage kind exposes only the primitive lookups below; `evaluate`
// owns the exact-match / interpolate / extrapolate decision for all of them.

pub trait InterpolationAccess {
    /// `(left bound, right bound)` of the sampled domain.
    fn domain(&self) -> (f64, f64);

    /// y of the sample whose x equals `x` exactly.
    fn exact_y(&self, x: f64) -> Option<f64>;

    /// Greatest index whose x does not exceed `x`.
    ///
    /// Faults with a bounds error when `x` lies below the left bound.
    fn floor_index(&self, x: f64) -> FunctionResult<usize>;

    fn extrapolate_left(&self, x: f64) -> f64;

    fn extrapolate_right(&self, x: f64) -> f64;

    /// Interpolates inside the bracket `[floor_index, floor_index + 1]`.
    fn interpolate_at(&self, x: f64, floor_index: usize) -> FunctionResult<f64>;
}

/// Linear rule through `left` and `right`, valid for any x.
///
/// A zero-width segment (only produced by sampling a degenerate interval)
/// evaluates to `left.y()`.
pub fn interpolate(x: f64, left: Point, right: Point) -> f64 {
    if right.x() == left.x() {
        return left.y();
    }
    left.y() + (right.y() - left.y()) * (x - left.x()) / (right.x() - left.x())
}

/// Like [`interpolate`] but refuses any x outside `[left.x, right.x]`.
pub fn interpolate_within(x: f64, left: Point, right: Point) -> FunctionResult<f64> {
    if x < left.x() || x > right.x() {
        return Err(FunctionError::InterpolationRange {
            x,
            left_x: left.x(),
            right_x: right.x(),
        });
    }
    Ok(interpolate(x, left, right))
}

pub fn evaluate<A: InterpolationAccess + ?Sized>(access: &A, x: f64) -> FunctionResult<f64> {
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    let (left_bound, right_bound) = access.domain();
    if x < left_bound {
        Ok(access.extrapolate_left(x))
    } else if x > right_bound {
        Ok(access.extrapolate_right(x))
    } else if let Some(y) = access.exact_y(x) {
        Ok(y)
    } else {
        let floor_index = access.floor_index(x)?;
        access.interpolate_at(x, floor_index)
    }
}

/// Total form of [`evaluate`] backing `MathFunction::apply`.
///
/// A fault here means a storage broke its own ordering invariant, so it is
/// logged and mapped to NaN.
pub fn apply_or_nan<A: InterpolationAccess + ?Sized>(access: &A, x: f64) -> f64 {
    evaluate(access, x).unwrap_or_else(|error| {
        warn!(x, %error, "evaluation fault on a sampled function");
        f64::NAN
    })
}
