use std::fmt;

use serde::{
    Deserialize,
    Serialize
};

use crate::function::functionerror::{
    FunctionError,
    FunctionResult
};
use crate::function::mathfunction::MathFunction;
use crate::function::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    Array,
    LinkedList
}

/// A function known through a finite set of samples with strictly increasing x.
///
/// The one exception is the degenerate table sampled over a zero-width
/// interval, where every x is equal.
///
/// Index based accessors fault with a bounds error outside `[0, count)`;
/// search accessors return `None` instead of faulting.
pub trait TabulatedFunction: MathFunction {
    fn count(&self) -> usize;

    fn get_x(&self, index: usize) -> FunctionResult<f64>;

    fn get_y(&self, index: usize) -> FunctionResult<f64>;

    fn set_y(&mut self, index: usize, value: f64) -> FunctionResult<()>;

    fn index_of_x(&self, x: f64) -> Option<usize>;

    fn index_of_y(&self, y: f64) -> Option<usize>;

    fn left_bound(&self) -> f64;

    fn right_bound(&self) -> f64;

    fn storage_kind(&self) -> StorageKind;

    fn iter(&self) -> Box<dyn Iterator<Item = Point> + '_>;

    fn points(&self) -> Vec<Point> {
        self.iter().collect()
    }

    fn x_values(&self) -> Vec<f64> {
        self.iter().map(|pt| pt.x()).collect()
    }

    fn y_values(&self) -> Vec<f64> {
        self.iter().map(|pt| pt.y()).collect()
    }
}

impl fmt::Debug for dyn TabulatedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabulatedFunction")
            .field("storage", &self.storage_kind())
            .field("points", &self.points())
            .finish()
    }
}

/// Upserts a sample while keeping x strictly increasing.
pub trait Insertable {
    fn insert(&mut self, x: f64, y: f64) -> FunctionResult<()>;
}

/// Deletes a sample; never lets a function drop below 2 samples.
pub trait Removable {
    fn remove(&mut self, index: usize) -> FunctionResult<()>;
}

impl<T: TabulatedFunction + ?Sized> TabulatedFunction for Box<T> {
    fn count(&self) -> usize { (**self).count() }
    fn get_x(&self, index: usize) -> FunctionResult<f64> { (**self).get_x(index) }
    fn get_y(&self, index: usize) -> FunctionResult<f64> { (**self).get_y(index) }
    fn set_y(&mut self, index: usize, value: f64) -> FunctionResult<()> { (**self).set_y(index, value) }
    fn index_of_x(&self, x: f64) -> Option<usize> { (**self).index_of_x(x) }
    fn index_of_y(&self, y: f64) -> Option<usize> { (**self).index_of_y(y) }
    fn left_bound(&self) -> f64 { (**self).left_bound() }
    fn right_bound(&self) -> f64 { (**self).right_bound() }
    fn storage_kind(&self) -> StorageKind { (**self).storage_kind() }
    fn iter(&self) -> Box<dyn Iterator<Item = Point> + '_> { (**self).iter() }
}

impl<T: Insertable + ?Sized> Insertable for Box<T> {
    fn insert(&mut self, x: f64, y: f64) -> FunctionResult<()> {
        (**self).insert(x, y)
    }
}

impl<T: Removable + ?Sized> Removable for Box<T> {
    fn remove(&mut self, index: usize) -> FunctionResult<()> {
        (**self).remove(index)
    }
}

/// Discretizes `source` into `count` equally spaced samples over `[from, to]`.
///
/// Reversed bounds are swapped. `from == to` yields `count` copies of the
/// same sample, which is the only way to obtain repeated x.
pub fn sample_function<F: MathFunction + ?Sized>(
    source: &F,
    from: f64,
    to: f64,
    count: usize,
) -> FunctionResult<(Vec<f64>, Vec<f64>)> {
    if count < 2 {
        return Err(FunctionError::InvalidCount(count));
    }
    if !from.is_finite() || !to.is_finite() {
        return Err(FunctionError::InvalidInterval { from, to });
    }
    let (from, to) = if from > to { (to, from) } else { (from, to) };
    let step = (to - from) / (count - 1) as f64;
    let x_values: Vec<f64> = (0..count)
        .map(|i| if i == count - 1 { to } else { from + step * i as f64 })
        .collect();
    let y_values = x_values.iter().map(|&x| source.apply(x)).collect();
    Ok((x_values, y_values))
}
