//! rm-project: pass-design documents, unit schemas and validation.

pub mod pass_unit;
pub mod profile;
pub mod schema;
pub mod sequence;
pub mod solve;
pub mod unit_schema;
pub mod validate;

use std::path::Path;

pub use pass_unit::{
    CoolingPipeFields, DefineBy, FieldValue, NumericInput, PassUnit, Span, ThreeRollOrientation,
    ThreeRollPassFields, TransportFields, TwoRollOrientation, TwoRollPassFields, UnitBody,
};
pub use profile::{FreibergParams, InProfile, Material, ProfileShape};
pub use schema::PassDesign;
pub use sequence::PassSequence;
pub use solve::SolveMethod;
pub use unit_schema::{FieldKind, FieldLink, FieldSpec, UnitSchema, UnitType, unit_schema_for};
pub use validate::{
    IssueKind, SubmitIssue, ValidationError, check_submittable, submit_issues, validate_design,
};

/// Document format version written by this crate.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown unit type: {0}")]
    UnknownUnitType(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<PassDesign> {
    let content = std::fs::read_to_string(path)?;
    let design: PassDesign = serde_yaml::from_str(&content)?;
    validate_design(&design)?;
    tracing::info!(path = %path.display(), units = design.units.len(), "loaded pass design");
    Ok(design)
}

pub fn save_yaml(path: &Path, design: &PassDesign) -> ProjectResult<()> {
    validate_design(design)?;
    let content = serde_yaml::to_string(design)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "saved pass design");
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<PassDesign> {
    let content = std::fs::read_to_string(path)?;
    let design: PassDesign = serde_json::from_str(&content)?;
    validate_design(&design)?;
    tracing::info!(path = %path.display(), units = design.units.len(), "loaded pass design");
    Ok(design)
}

pub fn save_json(path: &Path, design: &PassDesign) -> ProjectResult<()> {
    validate_design(design)?;
    let content = serde_json::to_string_pretty(design)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "saved pass design");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> ProjectResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        other => Err(ProjectError::UnsupportedFormat(
            other.unwrap_or_default().to_string(),
        )),
    }
}

/// Load a design, picking the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<PassDesign> {
    match format_of(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

/// Save a design, picking the format from the file extension.
pub fn save(path: &Path, design: &PassDesign) -> ProjectResult<()> {
    match format_of(path)? {
        Format::Yaml => save_yaml(path, design),
        Format::Json => save_json(path, design),
    }
}
