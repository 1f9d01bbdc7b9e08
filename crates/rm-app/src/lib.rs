//! Application service layer for rollmill.
//!
//! Row edits, the editing session, the simulation-engine boundary and design
//! file handling, shared by every front end.

pub mod engine;
pub mod error;
pub mod normalizer;
pub mod project_service;
pub mod session;

pub use engine::{
    EngineError, EngineRequest, EngineResponse, SimulationEngine, SimulationOutcome,
    build_request, submit,
};
pub use error::{AppError, AppResult};
pub use normalizer::{
    change_groove_type, change_unit_type, commit_field, set_field, set_groove_param,
    toggle_optional_groove_param,
};
pub use project_service::{
    FieldRow, ProfileSummary, UnitSummary, describe_profile, describe_unit, list_units,
    load_design, save_design, validate_design, write_request,
};
pub use session::{EditOutcome, PassDesignSession};
