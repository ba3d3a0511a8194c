use std::sync::Arc;

use crate::function::functionerror::{
    FunctionError,
    FunctionResult
};
use crate::function::point::Point;
use crate::function::tabulated::tabulatedfunction::TabulatedFunction;
use crate::function::tabulated::tabulatedfunctionfactory::{
    ArrayTabulatedFunctionFactory,
    TabulatedFunctionFactory
};

pub fn as_points<F: TabulatedFunction + ?Sized>(function: &F) -> Vec<Point> {
    function.points()
}

/// Sample-by-sample arithmetic between two functions on the same x grid.
#[derive(Clone)]
pub struct TabulatedFunctionOperationService {
    factory: Arc<dyn TabulatedFunctionFactory>,
}

impl TabulatedFunctionOperationService {
    pub fn new(factory: Arc<dyn TabulatedFunctionFactory>) -> TabulatedFunctionOperationService {
        TabulatedFunctionOperationService { factory }
    }

    pub fn factory(&self) -> &Arc<dyn TabulatedFunctionFactory> {
        &self.factory
    }

    pub fn set_factory(&mut self, factory: Arc<dyn TabulatedFunctionFactory>) {
        self.factory = factory;
    }

    fn combine<A, B>(
        &self,
        lhs: &A,
        rhs: &B,
        operation: impl Fn(f64, f64) -> f64,
    ) -> FunctionResult<Box<dyn TabulatedFunction>>
    where
        A: TabulatedFunction + ?Sized,
        B: TabulatedFunction + ?Sized,
    {
        let lhs_points = lhs.points();
        let rhs_points = rhs.points();
        if lhs_points.len() != rhs_points.len() {
            return Err(FunctionError::InconsistentCount {
                left: lhs_points.len(),
                right: rhs_points.len(),
            });
        }
        let mut x_values = Vec::with_capacity(lhs_points.len());
        let mut y_values = Vec::with_capacity(lhs_points.len());
        for (index, (l, r)) in lhs_points.iter().zip(&rhs_points).enumerate() {
            if l.x() != r.x() {
                return Err(FunctionError::InconsistentX {
                    index,
                    left_x: l.x(),
                    right_x: r.x(),
                });
            }
            x_values.push(l.x());
            y_values.push(operation(l.y(), r.y()));
        }
        self.factory.create(&x_values, &y_values)
    }

    pub fn add<A, B>(&self, lhs: &A, rhs: &B) -> FunctionResult<Box<dyn TabulatedFunction>>
    where
        A: TabulatedFunction + ?Sized,
        B: TabulatedFunction + ?Sized,
    {
        self.combine(lhs, rhs, |l, r| l + r)
    }

    pub fn subtract<A, B>(&self, lhs: &A, rhs: &B) -> FunctionResult<Box<dyn TabulatedFunction>>
    where
        A: TabulatedFunction + ?Sized,
        B: TabulatedFunction + ?Sized,
    {
        self.combine(lhs, rhs, |l, r| l - r)
    }

    pub fn multiply<A, B>(&self, lhs: &A, rhs: &B) -> FunctionResult<Box<dyn TabulatedFunction>>
    where
        A: TabulatedFunction + ?Sized,
        B: TabulatedFunction + ?Sized,
    {
        self.combine(lhs, rhs, |l, r| l * r)
    }

    /// Division by a zero sample yields an infinite or NaN y, as in plain `f64` arithmetic.
    pub fn divide<A, B>(&self, lhs: &A, rhs: &B) -> FunctionResult<Box<dyn TabulatedFunction>>
    where
        A: TabulatedFunction + ?Sized,
        B: TabulatedFunction + ?Sized,
    {
        self.combine(lhs, rhs, |l, r| l / r)
    }
}

impl Default for TabulatedFunctionOperationService {
    fn default() -> Self {
        TabulatedFunctionOperationService::new(Arc::new(ArrayTabulatedFunctionFactory))
    }
}
