//! Error types for the rm-app service layer.

use std::path::PathBuf;

use rm_core::UnitId;
use rm_project::SubmitIssue;

/// Application error shared by every front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Design validation failed: {0}")]
    Validation(String),

    #[error("Design has {} blocking issue(s)", .0.len())]
    NotSubmittable(Vec<SubmitIssue>),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("The pass sequence needs at least one unit")]
    LastUnit,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Simulation engine error: {0}")]
    Engine(String),

    /// Error text returned by the engine, unchanged.
    #[error("Simulation rejected: {0}")]
    EngineRejected(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Core error: {0}")]
    Core(String),
}

/// Result type for rm-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<rm_project::ProjectError> for AppError {
    fn from(err: rm_project::ProjectError) -> Self {
        match err {
            rm_project::ProjectError::Validation(inner) => inner.into(),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<rm_project::ValidationError> for AppError {
    fn from(err: rm_project::ValidationError) -> Self {
        match err {
            rm_project::ValidationError::NotSubmittable { issues } => {
                AppError::NotSubmittable(issues)
            }
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<rm_core::CoreError> for AppError {
    fn from(err: rm_core::CoreError) -> Self {
        AppError::Core(err.to_string())
    }
}

impl From<crate::engine::EngineError> for AppError {
    fn from(err: crate::engine::EngineError) -> Self {
        AppError::Engine(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
