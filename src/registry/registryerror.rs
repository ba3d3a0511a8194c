use serde::Deserialize;
use thiserror::Error;

use crate::function::functionerror::FunctionError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("key '{0}' not found")]
    NameNotFound(String),

    #[error(transparent)]
    Function(#[from] FunctionError),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),
}

pub fn parse_json_value<T>(json_value: serde_json::Value) -> Result<T, RegistryError>
where
    T: for<'a> Deserialize<'a>,
{
    serde_json::from_value(json_value).map_err(RegistryError::JsonParseError)
}
