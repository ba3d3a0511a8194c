use std::collections::HashMap;
use std::io::Read;
use std::sync::{
    Arc,
    PoisonError,
    RwLock
};

use tracing::debug;

use crate::function::mathfunction::{
    CompositeFunction,
    MathFunction
};
use crate::function::simplefunction::{
    ConstantFunction,
    IdentityFunction,
    SqrFunction
};
use crate::function::tabulated::tabulatedfunction::TabulatedFunction;
use crate::function::tabulated::tabulatedfunctionfactory::TabulatedFunctionFactory;

use super::namedfunction::{
    FunctionDescription,
    NamedJsonObject
};
use super::registryerror::{
    RegistryError,
    parse_json_value
};

/// Name → function lookup used to pick the source of a tabulation.
pub struct FunctionRegistry {
    map: RwLock<HashMap<String, Arc<dyn MathFunction>>>,
}

impl FunctionRegistry {
    pub fn empty() -> FunctionRegistry {
        FunctionRegistry { map: RwLock::new(HashMap::new()) }
    }

    /// Registry preloaded with `identity`, `sqr`, `zero` and `unit`.
    pub fn new() -> FunctionRegistry {
        let registry = FunctionRegistry::empty();
        registry.insert("identity", Arc::new(IdentityFunction));
        registry.insert("sqr", Arc::new(SqrFunction));
        registry.insert("zero", Arc::new(ConstantFunction::zero()));
        registry.insert("unit", Arc::new(ConstantFunction::unit()));
        registry
    }

    pub fn insert(&self, name: &str, function: Arc<dyn MathFunction>) {
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), function);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn MathFunction>, RegistryError> {
        self.map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NameNotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.read().unwrap_or_else(PoisonError::into_inner).contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn build(&self, description: &FunctionDescription) -> Result<Arc<dyn MathFunction>, RegistryError> {
        let function: Arc<dyn MathFunction> = match description {
            FunctionDescription::Identity => Arc::new(IdentityFunction),
            FunctionDescription::Sqr => Arc::new(SqrFunction),
            FunctionDescription::Constant { value } => Arc::new(ConstantFunction::new(*value)),
            FunctionDescription::Composite { first, then } => {
                Arc::new(CompositeFunction::new(self.get(first)?, self.get(then)?))
            }
        };
        Ok(function)
    }

    pub fn insert_obj_from_json(&self, json_value: serde_json::Value) -> Result<(), RegistryError> {
        let named_object: NamedJsonObject = parse_json_value(json_value.clone())?;
        let description: FunctionDescription = parse_json_value(json_value)?;
        let function = self.build(&description)?;
        debug!(name = %named_object.name(), ?description, "registered function");
        self.insert(named_object.name(), function);
        Ok(())
    }

    pub fn insert_obj_from_json_vec(&self, json_vec: &[serde_json::Value]) -> Result<(), RegistryError> {
        for j in json_vec {
            self.insert_obj_from_json(j.clone())?;
        }
        Ok(())
    }

    /// Accepts either one description object or an array of them.
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<(), RegistryError> {
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        match json_value {
            serde_json::Value::Array(json_vec) => self.insert_obj_from_json_vec(&json_vec),
            other => self.insert_obj_from_json(other),
        }
    }

    /// Samples the function registered as `name`.
    pub fn tabulate(
        &self,
        name: &str,
        factory: &dyn TabulatedFunctionFactory,
        from: f64,
        to: f64,
        count: usize,
    ) -> Result<Box<dyn TabulatedFunction>, RegistryError> {
        let source = self.get(name)?;
        Ok(factory.create_from_function(source.as_ref(), from, to, count)?)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        FunctionRegistry::new()
    }
}
