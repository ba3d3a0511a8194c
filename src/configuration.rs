use std::fs::File;
use std::io::{
    BufReader,
    Read
};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::function::functionerror::{
    FunctionError,
    FunctionResult
};
use crate::function::tabulated::tabulatedfunction::StorageKind;
use crate::function::tabulated::tabulatedfunctionfactory::TabulatedFunctionFactory;
use crate::operator::steppingdifferentialoperator::{
    Stencil,
    SteppingDifferentialOperator
};
use crate::operator::tabulateddifferentialoperator::TabulatedDifferentialOperator;
use crate::operator::tabulatedfunctionoperationservice::TabulatedFunctionOperationService;
use crate::registry::functionregistry::FunctionRegistry;
use crate::registry::registryerror::RegistryError;

const DEFAULT_STEP: f64 = 1e-3;

fn default_step() -> f64 {
    DEFAULT_STEP
}

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    storage: StorageKind,
    #[serde(default = "default_step")]
    step: f64,
    #[serde(default)]
    functions: Vec<serde_json::Value>
}

/// Runtime settings: default storage, default differentiation step and
/// the named functions available for tabulation.
pub struct Configuration {
    storage: StorageKind,
    step: f64,
    function_registry: FunctionRegistry
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            storage: StorageKind::default(),
            step: DEFAULT_STEP,
            function_registry: FunctionRegistry::new()
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Configuration, RegistryError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        if !(json_prop.step.is_finite() && json_prop.step > 0.0) {
            return Err(FunctionError::InvalidStep(json_prop.step).into());
        }
        let function_registry = FunctionRegistry::new();
        function_registry.insert_obj_from_json_vec(&json_prop.functions)?;
        info!(
            storage = ?json_prop.storage,
            step = json_prop.step,
            functions = json_prop.functions.len(),
            "configuration loaded"
        );
        Ok(Configuration {
            storage: json_prop.storage,
            step: json_prop.step,
            function_registry
        })
    }

    pub fn from_path(file_path: impl AsRef<Path>) -> Result<Configuration, RegistryError> {
        let file = File::open(file_path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn function_registry(&self) -> &FunctionRegistry {
        &self.function_registry
    }

    pub fn factory(&self) -> Arc<dyn TabulatedFunctionFactory> {
        self.storage.factory()
    }

    pub fn stepping_operator(&self, stencil: Stencil) -> FunctionResult<SteppingDifferentialOperator> {
        SteppingDifferentialOperator::new(stencil, self.step)
    }

    pub fn differential_operator(&self) -> TabulatedDifferentialOperator {
        TabulatedDifferentialOperator::new(self.factory())
    }

    pub fn operation_service(&self) -> TabulatedFunctionOperationService {
        TabulatedFunctionOperationService::new(self.factory())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::functionerror::FaultKind;
    use crate::function::mathfunction::MathFunction;

    #[test]
    fn defaults_apply_to_empty_document() {
        let config = Configuration::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(config.storage(), StorageKind::Array);
        assert_eq!(config.step(), DEFAULT_STEP);
        assert!(config.function_registry().contains("sqr"));
    }

    #[test]
    fn document_selects_storage_step_and_functions() {
        let document = r#"{
            "storage": "linked_list",
            "step": 0.5,
            "functions": [{"name": "two", "type": "constant", "value": 2.0}]
        }"#;
        let config = Configuration::from_reader(document.as_bytes()).unwrap();
        assert_eq!(config.storage(), StorageKind::LinkedList);
        assert_eq!(config.factory().storage_kind(), StorageKind::LinkedList);
        assert_eq!(config.differential_operator().factory().storage_kind(), StorageKind::LinkedList);
        assert_eq!(config.operation_service().factory().storage_kind(), StorageKind::LinkedList);

        let operator = config.stepping_operator(Stencil::Right).unwrap();
        assert_eq!(operator.step(), 0.5);
        assert_eq!(config.function_registry().get("two").unwrap().apply(9.0), 2.0);
    }

    #[test]
    fn invalid_documents_are_rejected() {
        assert!(matches!(
            Configuration::from_reader(r#"{"step": -1}"#.as_bytes()),
            Err(RegistryError::Function(ref e)) if e.kind() == FaultKind::Validation
        ));
        assert!(matches!(
            Configuration::from_reader(r#"{"storage": "tree"}"#.as_bytes()),
            Err(RegistryError::JsonParseError(_))
        ));

        assert!(Configuration::from_path("/nonexistent/tabfunc.json").is_err());
    }
}
