use std::sync::Arc;

/// A real function of one real argument.
///
/// `Send + Sync` is a supertrait so that any function can be shared across
/// threads behind an `Arc<dyn MathFunction>`.
pub trait MathFunction: Send + Sync {
    fn apply(&self, x: f64) -> f64;

    /// Builds `after(self(x))`.
    fn and_then<G>(self, after: G) -> CompositeFunction<Self, G>
    where
        Self: Sized,
        G: MathFunction,
    {
        CompositeFunction::new(self, after)
    }
}

impl<F: MathFunction + ?Sized> MathFunction for &F {
    fn apply(&self, x: f64) -> f64 {
        (**self).apply(x)
    }
}

impl<F: MathFunction + ?Sized> MathFunction for Box<F> {
    fn apply(&self, x: f64) -> f64 {
        (**self).apply(x)
    }
}

impl<F: MathFunction + ?Sized> MathFunction for Arc<F> {
    fn apply(&self, x: f64) -> f64 {
        (**self).apply(x)
    }
}

pub struct CompositeFunction<F, G> {
    first: F,
    second: G,
}

impl<F, G> CompositeFunction<F, G>
where
    F: MathFunction,
    G: MathFunction,
{
    pub fn new(first: F, second: G) -> CompositeFunction<F, G> {
        CompositeFunction { first, second }
    }
}

impl<F, G> MathFunction for CompositeFunction<F, G>
where
    F: MathFunction,
    G: MathFunction,
{
    fn apply(&self, x: f64) -> f64 {
        self.second.apply(self.first.apply(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::simplefunction::{
        ConstantFunction,
        IdentityFunction,
        SqrFunction
    };

    #[test]
    fn composition_applies_left_to_right() {
        let f = SqrFunction.and_then(ConstantFunction::new(2.0)).and_then(SqrFunction);
        assert_eq!(f.apply(10.0), 4.0);

        let g = IdentityFunction.and_then(SqrFunction);
        assert_eq!(g.apply(-3.0), 9.0);
    }

    #[test]
    fn trait_objects_compose() {
        let boxed: Box<dyn MathFunction> = Box::new(SqrFunction);
        let shared: Arc<dyn MathFunction> = Arc::new(ConstantFunction::new(1.5));
        let f = boxed.and_then(shared);
        assert_eq!(f.apply(7.0), 1.5);
    }
}
