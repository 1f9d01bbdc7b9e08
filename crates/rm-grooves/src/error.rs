use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrooveError {
    #[error("Unknown groove family: {0}")]
    UnknownFamily(String),

    #[error("Unknown groove parameter: {0}")]
    UnknownParam(String),

    #[error("Parameter '{key}' is not defined for {family}")]
    IllegalParam { family: String, key: String },
}
