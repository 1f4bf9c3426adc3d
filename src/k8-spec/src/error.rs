use serde_json::Error as SerdeJsonError;
use serde_yaml::Error as SerdeYamlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecError {
    /// spec is missing a field the operation needs, or asks for something unsupported
    #[error("{0}")]
    Validation(String),
    #[error("Json error: {0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("Yaml error: {0}")]
    YamlError(#[from] SerdeYamlError),
    #[error("Secret error: {0}")]
    Secret(String),
}

impl SpecError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
