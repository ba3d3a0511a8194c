use serde::{
    Deserialize,
    Serialize
};

use crate::function::functionerror::{
    FunctionError,
    FunctionResult
};
use crate::function::mathfunction::MathFunction;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stencil {
    /// `(f(x) - f(x - h)) / h`
    Left,
    /// `(f(x + h) - f(x)) / h`
    Right,
    /// `(f(x + h) - f(x - h)) / 2h`
    Middle,
}

fn validate_step(step: f64) -> FunctionResult<f64> {
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(FunctionError::InvalidStep(step))
    }
}

/// Finite-difference operator with a fixed step.
///
/// `derive` composes instead of sampling: the result evaluates the source
/// function lazily at `x ± h` on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteppingDifferentialOperator {
    stencil: Stencil,
    step: f64,
}

impl SteppingDifferentialOperator {
    pub fn new(stencil: Stencil, step: f64) -> FunctionResult<SteppingDifferentialOperator> {
        Ok(SteppingDifferentialOperator { stencil, step: validate_step(step)? })
    }

    pub fn left(step: f64) -> FunctionResult<SteppingDifferentialOperator> {
        Self::new(Stencil::Left, step)
    }

    pub fn right(step: f64) -> FunctionResult<SteppingDifferentialOperator> {
        Self::new(Stencil::Right, step)
    }

    pub fn middle(step: f64) -> FunctionResult<SteppingDifferentialOperator> {
        Self::new(Stencil::Middle, step)
    }

    pub fn stencil(&self) -> Stencil {
        self.stencil
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Leaves the current step in place when `step` is rejected.
    pub fn set_step(&mut self, step: f64) -> FunctionResult<()> {
        self.step = validate_step(step)?;
        Ok(())
    }

    pub fn derive<F: MathFunction>(&self, function: F) -> SteppingDerivative<F> {
        SteppingDerivative {
            function,
            stencil: self.stencil,
            step: self.step,
        }
    }
}

pub struct SteppingDerivative<F> {
    function: F,
    stencil: Stencil,
    step: f64,
}

impl<F> SteppingDerivative<F> {
    pub fn stencil(&self) -> Stencil {
        self.stencil
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl<F: MathFunction> MathFunction for SteppingDerivative<F> {
    fn apply(&self, x: f64) -> f64 {
        let h = self.step;
        let f = &self.function;
        match self.stencil {
            Stencil::Left => (f.apply(x) - f.apply(x - h)) / h,
            Stencil::Right => (f.apply(x + h) - f.apply(x)) / h,
            Stencil::Middle => (f.apply(x + h) - f.apply(x - h)) / (2.0 * h),
        }
    }
}
