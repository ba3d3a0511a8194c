use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError
};

use crate::function::functionerror::FunctionResult;
use crate::function::mathfunction::MathFunction;
use crate::function::point::Point;
use crate::function::tabulated::tabulatedfunction::{
    Insertable,
    Removable,
    StorageKind,
    TabulatedFunction
};

/// Serializes all access to one sampled function behind a single mutex.
///
/// Each accessor locks for exactly one call, so consecutive calls may be
/// interleaved with other threads. Composite sequences that must not be
/// interleaved go through [`do_synchronously`](Self::do_synchronously).
/// Share it between threads with an `Arc`.
pub struct SynchronizedTabulatedFunction<F> {
    inner: Mutex<F>,
}

impl<F: TabulatedFunction> SynchronizedTabulatedFunction<F> {
    pub fn new(function: F) -> SynchronizedTabulatedFunction<F> {
        SynchronizedTabulatedFunction { inner: Mutex::new(function) }
    }

    // A panic inside `do_synchronously` poisons the mutex; the function
    // itself is still structurally valid since every mutation is atomic.
    fn lock(&self) -> MutexGuard<'_, F> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn into_inner(self) -> F {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `operation` with the wrapped function locked for its whole duration.
    pub fn do_synchronously<R>(&self, operation: impl FnOnce(&mut F) -> R) -> R {
        let mut guard = self.lock();
        operation(&mut *guard)
    }

    pub fn count(&self) -> usize {
        self.lock().count()
    }

    pub fn get_x(&self, index: usize) -> FunctionResult<f64> {
        self.lock().get_x(index)
    }

    pub fn get_y(&self, index: usize) -> FunctionResult<f64> {
        self.lock().get_y(index)
    }

    pub fn set_y(&self, index: usize, value: f64) -> FunctionResult<()> {
        self.lock().set_y(index, value)
    }

    pub fn index_of_x(&self, x: f64) -> Option<usize> {
        self.lock().index_of_x(x)
    }

    pub fn index_of_y(&self, y: f64) -> Option<usize> {
        self.lock().index_of_y(y)
    }

    pub fn left_bound(&self) -> f64 {
        self.lock().left_bound()
    }

    pub fn right_bound(&self) -> f64 {
        self.lock().right_bound()
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.lock().storage_kind()
    }

    pub fn apply(&self, x: f64) -> f64 {
        self.lock().apply(x)
    }

    /// Copies every point under one lock; the returned iterator never
    /// observes later mutations.
    pub fn snapshot(&self) -> std::vec::IntoIter<Point> {
        self.lock().points().into_iter()
    }
}

impl<F: TabulatedFunction + Insertable> SynchronizedTabulatedFunction<F> {
    pub fn insert(&self, x: f64, y: f64) -> FunctionResult<()> {
        self.lock().insert(x, y)
    }
}

impl<F: TabulatedFunction + Removable> SynchronizedTabulatedFunction<F> {
    pub fn remove(&self, index: usize) -> FunctionResult<()> {
        self.lock().remove(index)
    }
}

impl<F: TabulatedFunction> MathFunction for SynchronizedTabulatedFunction<F> {
    fn apply(&self, x: f64) -> f64 {
        SynchronizedTabulatedFunction::apply(self, x)
    }
}

impl<F: TabulatedFunction> TabulatedFunction for SynchronizedTabulatedFunction<F> {
    fn count(&self) -> usize {
        SynchronizedTabulatedFunction::count(self)
    }

    fn get_x(&self, index: usize) -> FunctionResult<f64> {
        SynchronizedTabulatedFunction::get_x(self, index)
    }

    fn get_y(&self, index: usize) -> FunctionResult<f64> {
        SynchronizedTabulatedFunction::get_y(self, index)
    }

    fn set_y(&mut self, index: usize, value: f64) -> FunctionResult<()> {
        SynchronizedTabulatedFunction::set_y(self, index, value)
    }

    fn index_of_x(&self, x: f64) -> Option<usize> {
        SynchronizedTabulatedFunction::index_of_x(self, x)
    }

    fn index_of_y(&self, y: f64) -> Option<usize> {
        SynchronizedTabulatedFunction::index_of_y(self, y)
    }

    fn left_bound(&self) -> f64 {
        SynchronizedTabulatedFunction::left_bound(self)
    }

    fn right_bound(&self) -> f64 {
        SynchronizedTabulatedFunction::right_bound(self)
    }

    fn storage_kind(&self) -> StorageKind {
        SynchronizedTabulatedFunction::storage_kind(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = Point> + '_> {
        Box::new(self.snapshot())
    }
}

impl<F: TabulatedFunction + Insertable> Insertable for SynchronizedTabulatedFunction<F> {
    fn insert(&mut self, x: f64, y: f64) -> FunctionResult<()> {
        SynchronizedTabulatedFunction::insert(self, x, y)
    }
}

impl<F: TabulatedFunction + Removable> Removable for SynchronizedTabulatedFunction<F> {
    fn remove(&mut self, index: usize) -> FunctionResult<()> {
        SynchronizedTabulatedFunction::remove(self, index)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::function::simplefunction::{
        ConstantFunction,
        SqrFunction
    };
    use crate::function::tabulated::arraytabulatedfunction::ArrayTabulatedFunction;
    use crate::function::tabulated::linkedlisttabulatedfunction::LinkedListTabulatedFunction;
    use crate::operator::tabulateddifferentialoperator::TabulatedDifferentialOperator;

    #[test]
    fn accessors_delegate() {
        let f = SynchronizedTabulatedFunction::new(
            ArrayTabulatedFunction::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap(),
        );
        assert_eq!(f.count(), 3);
        assert_eq!(f.get_x(2).unwrap(), 2.0);
        assert_eq!(f.index_of_y(4.0), Some(2));
        f.set_y(1, 2.0).unwrap();
        assert_eq!(f.apply(0.5), 1.0);
        f.insert(3.0, 9.0).unwrap();
        f.remove(0).unwrap();
        assert_eq!(f.left_bound(), 1.0);
        assert_eq!(f.right_bound(), 3.0);
        assert!(f.get_y(3).is_err());
        assert_eq!(f.storage_kind(), StorageKind::Array);
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let f = SynchronizedTabulatedFunction::new(
            LinkedListTabulatedFunction::from_function(&SqrFunction, 0.0, 3.0, 4).unwrap(),
        );
        let mut first = f.snapshot();
        let second = f.snapshot();
        assert_eq!(first.next(), Some(Point::new(0.0, 0.0)));

        f.set_y(1, -1.0).unwrap();
        f.insert(10.0, 0.0).unwrap();

        let rest: Vec<Point> = first.collect();
        assert_eq!(rest.len(), 3);
        assert_eq!(rest[0], Point::new(1.0, 1.0));
        assert_eq!(second.count(), 4);
        assert_eq!(f.snapshot().count(), 5);
    }

    #[test]
    fn concurrent_writers_and_reader_never_fault() {
        let f = Arc::new(SynchronizedTabulatedFunction::new(
            ArrayTabulatedFunction::from_function(&ConstantFunction::new(1.0), 0.0, 99.0, 100).unwrap(),
        ));
        thread::scope(|scope| {
            for t in 0..4 {
                let f = Arc::clone(&f);
                scope.spawn(move || {
                    for i in 0..f.count() {
                        f.set_y(i, t as f64).unwrap();
                    }
                });
            }
            let reader = Arc::clone(&f);
            scope.spawn(move || {
                for _ in 0..20 {
                    let points: Vec<Point> = reader.snapshot().collect();
                    assert_eq!(points.len(), 100);
                    assert!(points.windows(2).all(|w| w[0].x() < w[1].x()));
                }
            });
        });
        let y = f.get_y(0).unwrap();
        assert!((0.0..4.0).contains(&y));
    }

    #[test]
    fn composite_operation_is_not_interleaved() {
        let f = Arc::new(SynchronizedTabulatedFunction::new(
            ArrayTabulatedFunction::from_function(&SqrFunction, 0.0, 10.0, 11).unwrap(),
        ));
        let operator = TabulatedDifferentialOperator::default();
        thread::scope(|scope| {
            let writer = Arc::clone(&f);
            scope.spawn(move || {
                for _ in 0..200 {
                    writer.set_y(5, 0.0).unwrap();
                }
            });
            for _ in 0..200 {
                f.do_synchronously(|inner| {
                    let before = inner.y_values();
                    let derivative = operator.derive(&*inner).unwrap();
                    for i in 0..inner.count() {
                        inner.set_y(i, derivative.get_y(i).unwrap() + before[i]).unwrap();
                    }
                    let after: Vec<f64> = inner.y_values();
                    let expected: Vec<f64> = before
                        .iter()
                        .zip(derivative.y_values())
                        .map(|(b, d)| b + d)
                        .collect();
                    assert_eq!(after, expected);
                    for i in 0..inner.count() {
                        inner.set_y(i, before[i]).unwrap();
                    }
                });
            }
        });
    }

    #[test]
    fn synchronized_derivation() {
        let f = SynchronizedTabulatedFunction::new(
            ArrayTabulatedFunction::from_function(&SqrFunction, 0.0, 5.0, 6).unwrap(),
        );
        let d = TabulatedDifferentialOperator::default().derive_synchronously(&f).unwrap();
        assert_eq!(d.y_values(), vec![1.0, 2.0, 4.0, 6.0, 8.0, 9.0]);
    }
}
