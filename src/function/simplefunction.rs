use serde::{
    Deserialize,
    Serialize
};

use super::mathfunction::MathFunction;

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFunction;

impl MathFunction for IdentityFunction {
    fn apply(&self, x: f64) -> f64 {
        x
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqrFunction;

impl MathFunction for SqrFunction {
    fn apply(&self, x: f64) -> f64 {
        x * x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantFunction {
    value: f64
}

impl ConstantFunction {
    pub fn new(value: f64) -> ConstantFunction {
        ConstantFunction { value }
    }

    pub fn zero() -> ConstantFunction {
        ConstantFunction::new(0.0)
    }

    pub fn unit() -> ConstantFunction {
        ConstantFunction::new(1.0)
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl MathFunction for ConstantFunction {
    fn apply(&self, _x: f64) -> f64 {
        self.value
    }
}

pub type ZeroFunction = ConstantFunction;
pub type UnitFunction = ConstantFunction;
