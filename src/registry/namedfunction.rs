use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct NamedJsonObject {
    name: String
}

impl NamedJsonObject {
    pub fn name(&self) -> &String {
        &self.name
    }
}

/// Function description as it appears in configuration files.
///
/// Composite entries refer to names registered before them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FunctionDescription {
    Identity,
    Sqr,
    Constant { value: f64 },
    Composite { first: String, then: String },
}
