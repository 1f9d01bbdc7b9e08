//! Boundary to the external simulation engine.
//!
//! The engine is reached through [`SimulationEngine`]; this crate only builds
//! the request from a checked design and interprets the response.

use rm_project::unit_schema::LABEL;
use rm_project::{FieldKind, PassDesign, PassUnit, check_submittable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Payload accepted by the engine's simulate endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRequest {
    #[serde(rename = "inProfile")]
    pub in_profile: Map<String, Value>,
    #[serde(rename = "passDesignData")]
    pub pass_design_data: Vec<Map<String, Value>>,
    pub solve_method: String,
    pub solve_params: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResponse {
    pub success: bool,
    #[serde(default)]
    pub input_data: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub pyroll_results: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed engine response: {0}")]
    Malformed(String),
}

pub trait SimulationEngine {
    fn simulate(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError>;
}

/// Results of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub input_data: Vec<Map<String, Value>>,
    pub results: Map<String, Value>,
}

/// Build the request for a design that passes the pre-submit check.
pub fn build_request(design: &PassDesign) -> AppResult<EngineRequest> {
    check_submittable(design)?;

    let in_profile = match serde_json::to_value(&design.in_profile)? {
        Value::Object(map) => map,
        other => {
            return Err(AppError::Serialization(format!(
                "input profile serialized to {other}"
            )));
        }
    };

    let solve_params = design
        .solve
        .params()
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::from(v)))
        .collect();

    Ok(EngineRequest {
        in_profile,
        pass_design_data: design.units.iter().map(unit_record).collect(),
        solve_method: design.solve.name().to_string(),
        solve_params,
    })
}

fn unit_record(unit: &PassUnit) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert("id".to_string(), Value::from(unit.id.get()));
    record.insert("type".to_string(), Value::from(unit.unit_type().id()));
    record.insert(LABEL.to_string(), Value::from(unit.label.as_str()));

    for spec in unit.schema().fields {
        let value = match spec.kind {
            FieldKind::Text => continue,
            FieldKind::Number => match unit.numeric(spec.key) {
                Some(input) => Value::from(input.value()),
                None => continue,
            },
            FieldKind::Select => match unit.select(spec.key) {
                Some(option) => Value::from(option),
                None => continue,
            },
            FieldKind::Groove => match unit.groove() {
                Some(groove) => Value::Object(
                    groove
                        .params()
                        .map(|(k, v)| (k.key().to_string(), Value::from(v)))
                        .collect(),
                ),
                None => continue,
            },
        };
        record.insert(spec.key.to_string(), value);
    }
    record
}

/// Check the design, hand it to the engine and return its results. The
/// design is only read, so a failed run leaves it as it was.
pub fn submit(design: &PassDesign, engine: &dyn SimulationEngine) -> AppResult<SimulationOutcome> {
    let request = build_request(design)?;
    info!(
        units = request.pass_design_data.len(),
        method = %request.solve_method,
        "submitting design to simulation engine"
    );

    let response = engine.simulate(&request)?;
    if !response.success {
        let errors = response
            .errors
            .unwrap_or_else(|| "engine reported failure without details".to_string());
        warn!(%errors, "simulation rejected");
        return Err(AppError::EngineRejected(errors));
    }

    Ok(SimulationOutcome {
        input_data: response.input_data.unwrap_or_default(),
        results: response.pyroll_results.unwrap_or_default(),
    })
}
