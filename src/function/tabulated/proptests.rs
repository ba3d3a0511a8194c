use std::io::Cursor;

use proptest::prelude::*;

use crate::function::mathfunction::MathFunction;
use crate::function::tabulated::arraytabulatedfunction::ArrayTabulatedFunction;
use crate::function::tabulated::linkedlisttabulatedfunction::LinkedListTabulatedFunction;
use crate::function::tabulated::tabulatedfunction::{
    Insertable,
    Removable,
    TabulatedFunction
};
use crate::function::simplefunction::SqrFunction;
use crate::function::tabulated::tabulatedfunctionfactory::{
    ArrayTabulatedFunctionFactory,
    LinkedListTabulatedFunctionFactory
};
use crate::io::functionsio;
use crate::operator::tabulateddifferentialoperator::TabulatedDifferentialOperator;

/// Strictly increasing x grid with matching y values.
fn samples() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.01f64..10.0, -1e3f64..1e3), 2..40).prop_map(|pairs| {
        let mut x = -50.0;
        let mut xs = Vec::with_capacity(pairs.len());
        let mut ys = Vec::with_capacity(pairs.len());
        for (gap, y) in pairs {
            x += gap;
            xs.push(x);
            ys.push(y);
        }
        (xs, ys)
    })
}

/// Like `samples`, but y may also be NaN or infinite.
fn samples_with_non_finite_y() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    let y = prop_oneof![
        4 => -1e3f64..1e3,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ];
    (samples(), prop::collection::vec(y, 40)).prop_map(|((xs, _), ys)| {
        let ys = ys[..xs.len()].to_vec();
        (xs, ys)
    })
}

fn same_values(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(u, v)| u == v || (u.is_nan() && v.is_nan()))
}

proptest! {
    #[test]
    fn construction_preserves_samples((xs, ys) in samples()) {
        let array = ArrayTabulatedFunction::new(&xs, &ys).unwrap();
        let linked = LinkedListTabulatedFunction::new(&xs, &ys).unwrap();
        prop_assert_eq!(array.count(), xs.len());
        prop_assert_eq!(linked.count(), xs.len());
        prop_assert_eq!(array.x_values(), xs.clone());
        prop_assert_eq!(linked.x_values(), xs.clone());
        for (i, &x) in xs.iter().enumerate() {
            prop_assert_eq!(array.apply(x), ys[i]);
            prop_assert_eq!(linked.apply(x), ys[i]);
        }
    }

    #[test]
    fn storages_evaluate_identically((xs, ys) in samples(), probe in -80.0f64..500.0) {
        let array = ArrayTabulatedFunction::new(&xs, &ys).unwrap();
        let linked = LinkedListTabulatedFunction::new(&xs, &ys).unwrap();
        prop_assert_eq!(array.apply(probe), linked.apply(probe));
    }

    #[test]
    fn insert_and_remove_keep_order(
        (xs, ys) in samples(),
        inserts in prop::collection::vec((-100.0f64..400.0, -10.0f64..10.0), 0..20),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
    ) {
        let mut array = ArrayTabulatedFunction::new(&xs, &ys).unwrap();
        let mut linked = LinkedListTabulatedFunction::new(&xs, &ys).unwrap();
        for (x, y) in inserts {
            let existed = array.index_of_x(x).is_some();
            let before = array.count();
            array.insert(x, y).unwrap();
            linked.insert(x, y).unwrap();
            prop_assert_eq!(array.count(), if existed { before } else { before + 1 });
            prop_assert_eq!(array.get_y(array.index_of_x(x).unwrap()).unwrap(), y);
        }
        for index in removals {
            let count = array.count();
            let i = index.index(count);
            if count > 2 {
                array.remove(i).unwrap();
                linked.remove(i).unwrap();
                prop_assert_eq!(array.count(), count - 1);
            } else {
                prop_assert!(array.remove(i).is_err());
                prop_assert!(linked.remove(i).is_err());
            }
        }
        let array_xs = array.x_values();
        prop_assert!(array_xs.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(array.points(), linked.points());
    }

    #[test]
    fn text_and_binary_round_trip((xs, ys) in samples()) {
        let f = LinkedListTabulatedFunction::new(&xs, &ys).unwrap();

        let mut text = Vec::new();
        functionsio::write_text(&mut text, &f).unwrap();
        let from_text = functionsio::read_text(Cursor::new(text), &ArrayTabulatedFunctionFactory).unwrap();
        prop_assert_eq!(from_text.points(), f.points());

        let mut binary = Vec::new();
        functionsio::write_binary(&mut binary, &f).unwrap();
        let from_binary = functionsio::read_binary(&mut Cursor::new(binary), &ArrayTabulatedFunctionFactory).unwrap();
        prop_assert_eq!(from_binary.points(), f.points());
    }

    #[test]
    fn non_finite_y_round_trips((xs, ys) in samples_with_non_finite_y()) {
        let f = ArrayTabulatedFunction::new(&xs, &ys).unwrap();

        let mut text = Vec::new();
        functionsio::write_text(&mut text, &f).unwrap();
        let from_text = functionsio::read_text(Cursor::new(text), &LinkedListTabulatedFunctionFactory).unwrap();
        prop_assert_eq!(from_text.x_values(), xs.clone());
        prop_assert!(same_values(&from_text.y_values(), &ys));

        let mut binary = Vec::new();
        functionsio::write_binary(&mut binary, &f).unwrap();
        let from_binary = functionsio::read_binary(&mut Cursor::new(binary), &ArrayTabulatedFunctionFactory).unwrap();
        prop_assert!(same_values(&from_binary.y_values(), &ys));

        let mut json = Vec::new();
        functionsio::serialize(&mut json, &f).unwrap();
        let from_json = functionsio::deserialize(Cursor::new(json)).unwrap();
        prop_assert_eq!(from_json.x_values(), xs.clone());
        prop_assert!(same_values(&from_json.y_values(), &ys));
    }

    #[test]
    fn zero_width_tables_round_trip_and_derive(at in -100.0f64..100.0, count in 2usize..20) {
        let f = LinkedListTabulatedFunction::from_function(&SqrFunction, at, at, count).unwrap();
        prop_assert_eq!(f.count(), count);

        let mut text = Vec::new();
        functionsio::write_text(&mut text, &f).unwrap();
        let from_text = functionsio::read_text(Cursor::new(text), &ArrayTabulatedFunctionFactory).unwrap();
        prop_assert_eq!(from_text.points(), f.points());

        let mut binary = Vec::new();
        functionsio::write_binary(&mut binary, &f).unwrap();
        let from_binary = functionsio::read_binary(&mut Cursor::new(binary), &ArrayTabulatedFunctionFactory).unwrap();
        prop_assert_eq!(from_binary.points(), f.points());

        let mut json = Vec::new();
        functionsio::serialize(&mut json, &f).unwrap();
        let from_json = functionsio::deserialize(Cursor::new(json)).unwrap();
        prop_assert_eq!(from_json.points(), f.points());

        let derivative = TabulatedDifferentialOperator::default().derive(&f).unwrap();
        prop_assert_eq!(derivative.y_values(), vec![0.0; count]);
    }
}
