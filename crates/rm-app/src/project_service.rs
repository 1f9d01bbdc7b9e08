//! Design loading, saving and introspection.

use std::path::Path;

use rm_core::UnitId;
use rm_grooves::{ConstraintStatus, evaluate_instance};
use rm_project::{FieldValue, PassDesign, Span, UnitType, submit_issues};
use uom::si::area::square_millimeter;
use uom::si::thermodynamic_temperature::degree_celsius;

use crate::engine::{EngineRequest, build_request};
use crate::error::{AppError, AppResult};

/// One row of a design, for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub label: String,
    pub groove: Option<String>,
    pub groove_status: Option<ConstraintStatus>,
    pub groove_message: Option<String>,
    /// Length or duration of a transport or cooling section.
    pub span: Option<Span>,
}

/// One field of a unit as a front end shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub shape: &'static str,
    pub area_mm2: f64,
    pub temperature_c: f64,
    pub material: String,
}

/// Load a design; YAML or JSON by extension.
pub fn load_design(path: &Path) -> AppResult<PassDesign> {
    Ok(rm_project::load(path)?)
}

/// Save a design; YAML or JSON by extension.
pub fn save_design(path: &Path, design: &PassDesign) -> AppResult<()> {
    Ok(rm_project::save(path, design)?)
}

/// Check that a design can be handed to the engine.
pub fn validate_design(design: &PassDesign) -> AppResult<()> {
    let issues = submit_issues(design);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::NotSubmittable(issues))
    }
}

pub fn list_units(design: &PassDesign) -> Vec<UnitSummary> {
    design
        .units
        .iter()
        .map(|unit| {
            let evaluation = unit.groove().map(evaluate_instance);
            UnitSummary {
                id: unit.id,
                unit_type: unit.unit_type(),
                label: unit.label.clone(),
                groove: unit.groove().map(|g| g.family_id().to_string()),
                groove_status: evaluation.as_ref().map(|e| e.status),
                groove_message: evaluation.map(|e| e.message),
                span: unit.span(),
            }
        })
        .collect()
}

/// Every field of one unit in schema order, with its current display unit.
pub fn describe_unit(design: &PassDesign, id: UnitId) -> AppResult<Vec<FieldRow>> {
    let unit = design.units.get(id).ok_or(AppError::UnitNotFound(id))?;
    let rows = unit
        .schema()
        .fields
        .iter()
        .filter_map(|spec| {
            let value = match unit.field(spec.key)? {
                FieldValue::Number(input) => input.to_string(),
                FieldValue::Text(text) | FieldValue::Select(text) => text.to_string(),
                FieldValue::Groove(groove) => groove.family_id().to_string(),
            };
            Some(FieldRow {
                key: spec.key,
                label: spec.label,
                value,
                unit: unit.unit_label(spec.key),
            })
        })
        .collect();
    Ok(rows)
}

pub fn describe_profile(design: &PassDesign) -> ProfileSummary {
    let profile = &design.in_profile;
    ProfileSummary {
        shape: profile.shape.name(),
        area_mm2: profile.shape.area().get::<square_millimeter>(),
        temperature_c: profile.temperature().get::<degree_celsius>(),
        material: match &profile.material_type {
            Some(name) => name.clone(),
            None => profile.material.id().to_string(),
        },
    }
}

/// Write the engine request for a design as pretty JSON.
pub fn write_request(design: &PassDesign, path: &Path) -> AppResult<EngineRequest> {
    let request = build_request(design)?;
    let content = serde_json::to_string_pretty(&request)?;
    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), "wrote engine request");
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rm_project::{NumericInput, PassUnit};

    fn design_with_transport() -> PassDesign {
        let mut design = PassDesign::new("listing");
        let mut transport = PassUnit::new(UnitId::new(2).unwrap(), UnitType::Transport);
        transport.set_select("transportDefineBy", "duration");
        *transport.numeric_mut("transportValue").unwrap() = NumericInput::Draft("1.5".into());
        design.units.push(transport);
        design
    }

    #[test]
    fn listing_carries_groove_status_and_span() {
        let units = list_units(&design_with_transport());
        assert_eq!(units.len(), 2);

        assert_eq!(units[0].groove.as_deref(), Some("BoxGroove"));
        assert_eq!(units[0].groove_status, Some(ConstraintStatus::TooFew));
        assert!(units[0].span.is_none());

        assert!(units[1].groove.is_none());
        assert_eq!(units[1].span.map(|s| s.to_string()).as_deref(), Some("1.5 s"));
    }

    #[test]
    fn described_fields_follow_the_unit_selector() {
        let design = design_with_transport();
        let rows = describe_unit(&design, UnitId::new(2).unwrap()).unwrap();
        let keys: Vec<_> = rows.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            [
                "label",
                "transportDefineBy",
                "transportValue",
                "environment_temperature",
                "heat_transfer_coefficient"
            ]
        );

        let value = &rows[2];
        assert_eq!(value.value, "1.5");
        assert_eq!(value.unit, "s");
        assert_eq!(rows[1].value, "duration");

        let pass = describe_unit(&design, UnitId::first()).unwrap();
        let groove = pass.iter().find(|r| r.key == "groove").unwrap();
        assert_eq!(groove.value, "BoxGroove");
        let gap = pass.iter().find(|r| r.key == "gap").unwrap();
        assert_eq!((gap.value.as_str(), gap.unit), ("0", "m"));
    }

    #[test]
    fn describing_a_missing_unit_fails() {
        let missing = UnitId::new(9).unwrap();
        match describe_unit(&PassDesign::new("empty"), missing) {
            Err(AppError::UnitNotFound(id)) => assert_eq!(id, missing),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn profile_summary_in_display_units() {
        let summary = describe_profile(&PassDesign::new("profile"));
        assert_eq!(summary.shape, "round");
        assert_eq!(summary.material, "C45");
        assert!((summary.temperature_c - 1200.0).abs() < 1e-9);
        let expected = core::f64::consts::PI * 30.0 * 30.0 / 4.0;
        assert!((summary.area_mm2 - expected).abs() < 1e-9);
    }
}
