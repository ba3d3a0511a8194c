use std::sync::Arc;

use crate::function::functionerror::FunctionResult;
use crate::function::mathfunction::MathFunction;
use crate::function::tabulated::arraytabulatedfunction::ArrayTabulatedFunction;
use crate::function::tabulated::linkedlisttabulatedfunction::LinkedListTabulatedFunction;
use crate::function::tabulated::tabulatedfunction::{
    StorageKind,
    TabulatedFunction
};

/// Chooses the storage of newly created sampled functions.
///
/// Algorithms that produce sampled output take a factory instead of naming
/// a concrete storage type.
pub trait TabulatedFunctionFactory: Send + Sync {
    fn storage_kind(&self) -> StorageKind;

    fn create(
        &self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> FunctionResult<Box<dyn TabulatedFunction>>;

    /// One-point table, below the two-point minimum `create` enforces.
    fn create_single(&self, x: f64, y: f64) -> Box<dyn TabulatedFunction>;

    fn create_from_function(
        &self,
        source: &dyn MathFunction,
        from: f64,
        to: f64,
        count: usize,
    ) -> FunctionResult<Box<dyn TabulatedFunction>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayTabulatedFunctionFactory;

impl TabulatedFunctionFactory for ArrayTabulatedFunctionFactory {
    fn storage_kind(&self) -> StorageKind {
        StorageKind::Array
    }

    fn create(
        &self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> FunctionResult<Box<dyn TabulatedFunction>> {
        Ok(Box::new(ArrayTabulatedFunction::new(x_values, y_values)?))
    }

    fn create_single(&self, x: f64, y: f64) -> Box<dyn TabulatedFunction> {
        Box::new(ArrayTabulatedFunction::single(x, y))
    }

    fn create_from_function(
        &self,
        source: &dyn MathFunction,
        from: f64,
        to: f64,
        count: usize,
    ) -> FunctionResult<Box<dyn TabulatedFunction>> {
        Ok(Box::new(ArrayTabulatedFunction::from_function(source, from, to, count)?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedListTabulatedFunctionFactory;

impl TabulatedFunctionFactory for LinkedListTabulatedFunctionFactory {
    fn storage_kind(&self) -> StorageKind {
        StorageKind::LinkedList
    }

    fn create(
        &self,
        x_values: &[f64],
        y_values: &[f64],
    ) -> FunctionResult<Box<dyn TabulatedFunction>> {
        Ok(Box::new(LinkedListTabulatedFunction::new(x_values, y_values)?))
    }

    fn create_single(&self, x: f64, y: f64) -> Box<dyn TabulatedFunction> {
        Box::new(LinkedListTabulatedFunction::single(x, y))
    }

    fn create_from_function(
        &self,
        source: &dyn MathFunction,
        from: f64,
        to: f64,
        count: usize,
    ) -> FunctionResult<Box<dyn TabulatedFunction>> {
        Ok(Box::new(LinkedListTabulatedFunction::from_function(source, from, to, count)?))
    }
}

impl StorageKind {
    pub fn factory(&self) -> Arc<dyn TabulatedFunctionFactory> {
        match self {
            StorageKind::Array => Arc::new(ArrayTabulatedFunctionFactory),
            StorageKind::LinkedList => Arc::new(LinkedListTabulatedFunctionFactory),
        }
    }
}
