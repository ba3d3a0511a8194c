use tracing::{
    debug,
    trace
};

use crate::function::functionerror::{
    FunctionError,
    FunctionResult,
    check_index,
    validate_samples
};
use crate::function::mathfunction::MathFunction;
use crate::function::point::Point;
use crate::function::tabulated::interpolation::{
    InterpolationAccess,
    apply_or_nan,
    interpolate,
    interpolate_within
};
use crate::function::tabulated::tabulatedfunction::{
    Insertable,
    Removable,
    StorageKind,
    TabulatedFunction,
    sample_function
};

const SPARE_CAPACITY: usize = 5;

/// Sampled function stored in two parallel buffers.
///
/// Both buffers have the same physical length (the capacity); only the first
/// `count` slots are meaningful and the rest are kept at zero.
#[derive(Debug, Clone)]
pub struct ArrayTabulatedFunction {
    x_values: Vec<f64>,
    y_values: Vec<f64>,
    count: usize,
}

impl ArrayTabulatedFunction {
    pub fn new(x_values: &[f64], y_values: &[f64]) -> FunctionResult<ArrayTabulatedFunction> {
        validate_samples(x_values, y_values)?;
        Ok(Self::with_samples(x_values.to_vec(), y_values.to_vec()))
    }

    pub fn from_function<F: MathFunction + ?Sized>(
        source: &F,
        from: f64,
        to: f64,
        count: usize,
    ) -> FunctionResult<ArrayTabulatedFunction> {
        let (x_values, y_values) = sample_function(source, from, to, count)?;
        Ok(Self::with_samples(x_values, y_values))
    }

    /// One-point table, the same shape an empty linked chain has after its
    /// first insertion. It evaluates to `y` everywhere.
    pub fn single(x: f64, y: f64) -> ArrayTabulatedFunction {
        Self::with_samples(vec![x], vec![y])
    }

    fn with_samples(mut x_values: Vec<f64>, mut y_values: Vec<f64>) -> ArrayTabulatedFunction {
        let count = x_values.len();
        x_values.resize(count + SPARE_CAPACITY, 0.0);
        y_values.resize(count + SPARE_CAPACITY, 0.0);
        ArrayTabulatedFunction { x_values, y_values, count }
    }

    pub fn capacity(&self) -> usize {
        self.x_values.len()
    }

    fn xs(&self) -> &[f64] {
        &self.x_values[..self.count]
    }

    fn point(&self, index: usize) -> Point {
        Point::new(self.x_values[index], self.y_values[index])
    }

    fn grow(&mut self) {
        let capacity = (self.capacity() * 2).max(self.count + 1);
        debug!(from = self.capacity(), to = capacity, "growing sample buffers");
        self.x_values.resize(capacity, 0.0);
        self.y_values.resize(capacity, 0.0);
    }

    /// Greatest index whose x does not exceed `x`, or `count` when `x` is at
    /// or beyond the last sample.
    pub fn floor_index_of_x(&self, x: f64) -> FunctionResult<usize> {
        if x.is_nan() {
            return Err(FunctionError::NanX);
        }
        let xs = self.xs();
        if x < xs[0] {
            return Err(FunctionError::BelowLeftBound { x, left_bound: xs[0] });
        }
        if x >= xs[self.count - 1] {
            return Ok(self.count);
        }
        Ok(xs.partition_point(|&v| v <= x) - 1)
    }
}

impl InterpolationAccess for ArrayTabulatedFunction {
    fn domain(&self) -> (f64, f64) {
        (self.left_bound(), self.right_bound())
    }

    fn exact_y(&self, x: f64) -> Option<f64> {
        self.index_of_x(x).map(|i| self.y_values[i])
    }

    fn floor_index(&self, x: f64) -> FunctionResult<usize> {
        self.floor_index_of_x(x)
    }

    fn extrapolate_left(&self, x: f64) -> f64 {
        trace!(x, "extrapolating left");
        interpolate(x, self.point(0), self.point(1.min(self.count - 1)))
    }

    fn extrapolate_right(&self, x: f64) -> f64 {
        trace!(x, "extrapolating right");
        interpolate(x, self.point(self.count.saturating_sub(2)), self.point(self.count - 1))
    }

    fn interpolate_at(&self, x: f64, floor_index: usize) -> FunctionResult<f64> {
        if floor_index + 1 >= self.count {
            return Err(FunctionError::InterpolationRange {
                x,
                left_x: self.left_bound(),
                right_x: self.right_bound(),
            });
        }
        interpolate_within(x, self.point(floor_index), self.point(floor_index + 1))
    }
}

impl MathFunction for ArrayTabulatedFunction {
    fn apply(&self, x: f64) -> f64 {
        apply_or_nan(self, x)
    }
}

impl TabulatedFunction for ArrayTabulatedFunction {
    fn count(&self) -> usize {
        self.count
    }

    fn get_x(&self, index: usize) -> FunctionResult<f64> {
        check_index(index, self.count)?;
        Ok(self.x_values[index])
    }

    fn get_y(&self, index: usize) -> FunctionResult<f64> {
        check_index(index, self.count)?;
        Ok(self.y_values[index])
    }

    fn set_y(&mut self, index: usize, value: f64) -> FunctionResult<()> {
        check_index(index, self.count)?;
        self.y_values[index] = value;
        Ok(())
    }

    fn index_of_x(&self, x: f64) -> Option<usize> {
        let xs = self.xs();
        let position = xs.partition_point(|&v| v < x);
        (position < xs.len() && xs[position] == x).then_some(position)
    }

    fn index_of_y(&self, y: f64) -> Option<usize> {
        self.y_values[..self.count].iter().position(|&v| v == y)
    }

    fn left_bound(&self) -> f64 {
        self.x_values[0]
    }

    fn right_bound(&self) -> f64 {
        self.x_values[self.count - 1]
    }

    fn storage_kind(&self) -> StorageKind {
        StorageKind::Array
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        Box::new(
            self.xs()
                .iter()
                .zip(&self.y_values[..self.count])
                .map(|(&x, &y)| Point::new(x, y))
        )
    }
}

impl Insertable for ArrayTabulatedFunction {
    fn insert(&mut self, x: f64, y: f64) -> FunctionResult<()> {
        if x.is_nan() {
            return Err(FunctionError::NanX);
        }
        if let Some(index) = self.index_of_x(x) {
            self.y_values[index] = y;
            return Ok(());
        }
        let position = self.xs().partition_point(|&v| v < x);
        if self.count == self.capacity() {
            self.grow();
        }
        self.x_values.copy_within(position..self.count, position + 1);
        self.y_values.copy_within(position..self.count, position + 1);
        self.x_values[position] = x;
        self.y_values[position] = y;
        self.count += 1;
        debug!(x, position, count = self.count, "inserted point");
        Ok(())
    }
}

impl Removable for ArrayTabulatedFunction {
    fn remove(&mut self, index: usize) -> FunctionResult<()> {
        check_index(index, self.count)?;
        if self.count <= 2 {
            return Err(FunctionError::MinimumPointCount { count: self.count });
        }
        self.x_values.copy_within(index + 1..self.count, index);
        self.y_values.copy_within(index + 1..self.count, index);
        self.count -= 1;
        self.x_values[self.count] = 0.0;
        self.y_values[self.count] = 0.0;
        debug!(index, count = self.count, "removed point");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::functionerror::FaultKind;
    use crate::function::simplefunction::SqrFunction;

    fn squares() -> ArrayTabulatedFunction {
        ArrayTabulatedFunction::new(
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            &[0.0, 1.0, 4.0, 9.0, 16.0, 25.0],
        )
        .unwrap()
    }

    #[test]
    fn construction_keeps_order_and_reserves_capacity() {
        let f = squares();
        assert_eq!(f.count(), 6);
        assert_eq!(f.capacity(), 11);
        for i in 0..6 {
            assert_eq!(f.get_x(i).unwrap(), i as f64);
        }
        assert_eq!(f.left_bound(), 0.0);
        assert_eq!(f.right_bound(), 5.0);
    }

    #[test]
    fn construction_validates_input() {
        let err = ArrayTabulatedFunction::new(&[1.0, 0.0], &[0.0, 0.0]).unwrap_err();
        assert_eq!(err.kind(), FaultKind::Validation);
        assert!(ArrayTabulatedFunction::new(&[1.0], &[0.0]).is_err());
        assert!(ArrayTabulatedFunction::new(&[1.0, 2.0], &[0.0]).is_err());
    }

    #[test]
    fn apply_is_exact_at_samples_and_linear_between() {
        let f = squares();
        assert_eq!(f.apply(3.0), 9.0);
        let mid = f.apply(1.5);
        assert!(mid > 1.0 && mid < 4.0);
        assert_eq!(mid, 2.5);
        assert_eq!(f.apply(-1.0), -1.0);
        assert_eq!(f.apply(6.0), 34.0);
    }

    #[test]
    fn from_function_samples_evenly() {
        let f = ArrayTabulatedFunction::from_function(&SqrFunction, 0.0, 10.0, 11).unwrap();
        assert_eq!(f.count(), 11);
        assert_eq!(f.get_y(7).unwrap(), 49.0);
        assert_eq!(f.right_bound(), 10.0);
    }

    #[test]
    fn degenerate_interval_is_constant() {
        let f = ArrayTabulatedFunction::from_function(&SqrFunction, 2.0, 2.0, 3).unwrap();
        assert_eq!(f.count(), 3);
        assert_eq!(f.apply(2.0), 4.0);
        assert_eq!(f.apply(-5.0), 4.0);
        assert_eq!(f.apply(9.0), 4.0);
    }

    #[test]
    fn lookups_report_sentinels() {
        let f = squares();
        assert_eq!(f.index_of_x(4.0), Some(4));
        assert_eq!(f.index_of_x(4.5), None);
        assert_eq!(f.index_of_y(25.0), Some(5));
        assert_eq!(f.index_of_y(2.0), None);
        assert_eq!(f.floor_index_of_x(2.5).unwrap(), 2);
        assert_eq!(f.floor_index_of_x(5.0).unwrap(), 6);
        assert_eq!(f.floor_index_of_x(7.0).unwrap(), 6);
        assert_eq!(f.floor_index_of_x(-0.1).unwrap_err().kind(), FaultKind::Bounds);
    }

    #[test]
    fn index_accessors_check_bounds() {
        let mut f = squares();
        assert_eq!(f.get_x(6).unwrap_err().kind(), FaultKind::Bounds);
        assert_eq!(f.get_y(10).unwrap_err().kind(), FaultKind::Bounds);
        assert!(f.set_y(6, 1.0).is_err());
        f.set_y(2, -4.0).unwrap();
        assert_eq!(f.apply(2.0), -4.0);
    }

    #[test]
    fn insert_replaces_existing_x() {
        let mut f = squares();
        f.insert(2.0, 100.0).unwrap();
        assert_eq!(f.count(), 6);
        assert_eq!(f.get_y(2).unwrap(), 100.0);
    }

    #[test]
    fn insert_keeps_order_and_grows() {
        let mut f = squares();
        for (i, x) in [2.5, -1.0, 10.0, 0.5, 4.5, 7.0].iter().enumerate() {
            f.insert(*x, 0.0).unwrap();
            assert_eq!(f.count(), 7 + i);
        }
        assert_eq!(f.count(), 12);
        assert!(f.capacity() >= 12);
        let xs = f.x_values();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(f.left_bound(), -1.0);
        assert_eq!(f.right_bound(), 10.0);
        assert!(f.insert(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn remove_shifts_and_keeps_two_points() {
        let mut f = squares();
        f.remove(0).unwrap();
        assert_eq!(f.count(), 5);
        assert_eq!(f.left_bound(), 1.0);
        f.remove(4).unwrap();
        assert_eq!(f.right_bound(), 4.0);
        f.remove(1).unwrap();
        assert_eq!(f.x_values(), vec![1.0, 3.0, 4.0]);
        f.remove(1).unwrap();
        assert_eq!(f.count(), 2);

        let err = f.remove(0).unwrap_err();
        assert!(matches!(err, FunctionError::MinimumPointCount { count: 2 }));
        assert_eq!(f.count(), 2);
        assert_eq!(f.remove(5).unwrap_err().kind(), FaultKind::Bounds);
    }

    #[test]
    fn iteration_follows_sample_order() {
        let f = squares();
        let points: Vec<Point> = f.iter().collect();
        assert_eq!(points.len(), 6);
        assert_eq!(points[3], Point::new(3.0, 9.0));
    }
}
