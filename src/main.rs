use std::io::{
    self,
    Write
};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use tabfunc::configuration::Configuration;
use tabfunc::function::mathfunction::MathFunction;
use tabfunc::io::functionsio;
use tabfunc::operator::steppingdifferentialoperator::Stencil;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match std::env::args().nth(1) {
        Some(config_path) => Configuration::from_path(config_path).unwrap(),
        None => Configuration::new(),
    };

    let factory = config.factory();
    let sqr = config.function_registry()
        .tabulate("sqr", factory.as_ref(), 0.0, 5.0, 6)
        .unwrap();
    let derivative = config.differential_operator()
        .derive(&sqr)
        .unwrap();
    let middle = config.stepping_operator(Stencil::Middle)
        .unwrap()
        .derive(&sqr);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    functionsio::write_text(&mut out, &sqr).unwrap();
    functionsio::write_text(&mut out, &derivative).unwrap();
    for x in [0.5, 2.0, 4.5] {
        writeln!(out, "f({}) = {}, f'({}) ~ {}", x, sqr.apply(x), x, middle.apply(x)).unwrap();
    }
}
