use std::sync::Arc;

use tracing::debug;

use crate::concurrent::synchronizedtabulatedfunction::SynchronizedTabulatedFunction;
use crate::function::functionerror::FunctionResult;
use crate::function::tabulated::tabulatedfunction::TabulatedFunction;
use crate::function::tabulated::tabulatedfunctionfactory::{
    ArrayTabulatedFunctionFactory,
    TabulatedFunctionFactory
};

/// Discrete derivative of samples on an arbitrary (non-uniform) grid.
///
/// End points use one-sided differences, interior points the central
/// difference over their two neighbours. A single sample, and any span of
/// zero width, has derivative 0.
pub fn discrete_derivative(x_values: &[f64], y_values: &[f64]) -> Vec<f64> {
    let n = x_values.len().min(y_values.len());
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                let lhs = i.saturating_sub(1);
                let rhs = (i + 1).min(n - 1);
                let width = x_values[rhs] - x_values[lhs];
                if width == 0.0 {
                    0.0
                } else {
                    (y_values[rhs] - y_values[lhs]) / width
                }
            })
            .collect()
    }
}

/// Maps a sampled function to the sampled function of its discrete
/// derivative on the same x grid.
#[derive(Clone)]
pub struct TabulatedDifferentialOperator {
    factory: Arc<dyn TabulatedFunctionFactory>,
}

impl TabulatedDifferentialOperator {
    pub fn new(factory: Arc<dyn TabulatedFunctionFactory>) -> TabulatedDifferentialOperator {
        TabulatedDifferentialOperator { factory }
    }

    pub fn factory(&self) -> &Arc<dyn TabulatedFunctionFactory> {
        &self.factory
    }

    pub fn set_factory(&mut self, factory: Arc<dyn TabulatedFunctionFactory>) {
        self.factory = factory;
    }

    pub fn derive<F: TabulatedFunction + ?Sized>(
        &self,
        function: &F,
    ) -> FunctionResult<Box<dyn TabulatedFunction>> {
        let x_values = function.x_values();
        let y_values = function.y_values();
        let derivative = discrete_derivative(&x_values, &y_values);
        debug!(
            count = x_values.len(),
            storage = ?self.factory.storage_kind(),
            "derived sampled function"
        );
        match (x_values.as_slice(), derivative.as_slice()) {
            (&[x], &[slope]) => Ok(self.factory.create_single(x, slope)),
            _ => self.factory.create(&x_values, &derivative),
        }
    }

    /// Reads and derives `function` inside one exclusive-access window.
    pub fn derive_synchronously<F: TabulatedFunction>(
        &self,
        function: &SynchronizedTabulatedFunction<F>,
    ) -> FunctionResult<Box<dyn TabulatedFunction>> {
        function.do_synchronously(|inner| self.derive(&*inner))
    }
}

impl Default for TabulatedDifferentialOperator {
    fn default() -> Self {
        TabulatedDifferentialOperator::new(Arc::new(ArrayTabulatedFunctionFactory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::functionerror::FunctionError;
    use crate::function::mathfunction::MathFunction;
    use crate::function::point::Point;
    use crate::function::simplefunction::SqrFunction;
    use crate::function::tabulated::arraytabulatedfunction::ArrayTabulatedFunction;
    use crate::function::tabulated::linkedlisttabulatedfunction::LinkedListTabulatedFunction;
    use crate::function::tabulated::tabulatedfunction::{
        Insertable,
        StorageKind
    };
    use crate::function::tabulated::tabulatedfunctionfactory::LinkedListTabulatedFunctionFactory;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "expected {e}, got {a}");
        }
    }

    #[test]
    fn derivative_of_square_uses_one_sided_ends() {
        let f = LinkedListTabulatedFunction::from_function(&SqrFunction, 0.0, 5.0, 6).unwrap();
        let d = TabulatedDifferentialOperator::default().derive(&f).unwrap();
        assert_eq!(d.storage_kind(), StorageKind::Array);
        assert_eq!(d.x_values(), f.x_values());
        assert_close(&d.y_values(), &[1.0, 2.0, 4.0, 6.0, 8.0, 9.0]);
    }

    #[test]
    fn non_uniform_grid_uses_true_spacing() {
        let derivative = discrete_derivative(&[0.0, 1.0, 3.0], &[0.0, 2.0, 6.0]);
        assert_close(&derivative, &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(discrete_derivative(&[], &[]).is_empty());
        assert_eq!(discrete_derivative(&[1.0], &[5.0]), vec![0.0]);
        assert_eq!(discrete_derivative(&[2.0, 2.0, 2.0], &[4.0, 4.0, 4.0]), vec![0.0; 3]);
    }

    #[test]
    fn single_sample_derives_to_zero() {
        let mut f = LinkedListTabulatedFunction::default();
        f.insert(1.0, 5.0).unwrap();
        let d = TabulatedDifferentialOperator::default().derive(&f).unwrap();
        assert_eq!(d.storage_kind(), StorageKind::Array);
        assert_eq!(d.count(), 1);
        assert_eq!(d.points(), vec![Point::new(1.0, 0.0)]);
        assert_eq!(d.apply(-4.0), 0.0);
    }

    #[test]
    fn empty_input_has_no_derivative() {
        let f = LinkedListTabulatedFunction::default();
        assert!(matches!(
            TabulatedDifferentialOperator::default().derive(&f),
            Err(FunctionError::TooFewPoints { count: 0 })
        ));
    }

    #[test]
    fn zero_width_interval_derives_to_zero() {
        let f = ArrayTabulatedFunction::from_function(&SqrFunction, 2.0, 2.0, 3).unwrap();
        let d = TabulatedDifferentialOperator::default().derive(&f).unwrap();
        assert_eq!(d.x_values(), vec![2.0; 3]);
        assert_eq!(d.y_values(), vec![0.0; 3]);
    }

    #[test]
    fn factory_selects_output_storage() {
        let operator = TabulatedDifferentialOperator::new(Arc::new(LinkedListTabulatedFunctionFactory));
        let f = ArrayTabulatedFunction::new(&[0.0, 1.0], &[0.0, 3.0]).unwrap();
        let d = operator.derive(&f).unwrap();
        assert_eq!(d.storage_kind(), StorageKind::LinkedList);
        assert_close(&d.y_values(), &[3.0, 3.0]);

        let dd = operator.derive(&d).unwrap();
        assert_close(&dd.y_values(), &[0.0, 0.0]);
    }
}
