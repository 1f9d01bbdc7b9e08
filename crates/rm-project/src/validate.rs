//! Document checks.
//!
//! [`validate_design`] guards loading and saving: it rejects documents that
//! are structurally broken but accepts work in progress. [`submit_issues`] is
//! the blocking check before anything is handed to the engine and collects
//! every problem instead of stopping at the first.

use core::fmt;

use rm_core::{UnitId, is_complete_numeric, is_positive_finite};
use rm_grooves::{GrooveInstance, evaluate_instance};
use uom::si::area::square_meter;

use crate::{FieldKind, InProfile, LATEST_VERSION, Material, PassDesign, PassUnit, SolveMethod};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Pass sequence is empty")]
    EmptySequence,

    #[error("Duplicate unit ID: {id}")]
    DuplicateId { id: UnitId },

    #[error("Design is not ready for simulation ({} issue(s)): {}", .issues.len(), summarize(.issues))]
    NotSubmittable { issues: Vec<SubmitIssue> },
}

fn summarize(issues: &[SubmitIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Structural check applied on load and save.
pub fn validate_design(design: &PassDesign) -> Result<(), ValidationError> {
    if design.version == 0 || design.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: design.version,
        });
    }
    if design.units.is_empty() {
        return Err(ValidationError::EmptySequence);
    }
    if let Some(id) = design.units.duplicate_ids().first() {
        return Err(ValidationError::DuplicateId { id: *id });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    EmptySequence,
    DuplicateId,
    /// Text left in a numeric cell that is not a full number.
    IncompleteNumber { text: String },
    NonFinite { value: f64 },
    /// Groove family not offered for the unit type, or not known at all.
    UnsupportedGroove { family: String },
    GrooveConstraint { message: String },
    /// Still at the zero a fresh row starts with.
    PlaceholderValue,
    NonPositive { value: f64 },
    Negative { value: f64 },
    MissingMaterialData,
    /// Finished area not below the incoming one, in square metres.
    NoReduction { finished: f64, incoming: f64 },
}

/// One blocking problem, located by unit (if any) and field key.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitIssue {
    pub unit: Option<UnitId>,
    pub key: String,
    pub kind: IssueKind,
}

impl SubmitIssue {
    fn unit(id: UnitId, key: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            unit: Some(id),
            key: key.into(),
            kind,
        }
    }

    fn global(key: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            unit: None,
            key: key.into(),
            kind,
        }
    }
}

impl fmt::Display for SubmitIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(id) => write!(f, "unit {id}, {}: ", self.key)?,
            None => write!(f, "{}: ", self.key)?,
        }
        match &self.kind {
            IssueKind::EmptySequence => f.write_str("at least one unit is required"),
            IssueKind::DuplicateId => f.write_str("ID used more than once"),
            IssueKind::IncompleteNumber { text } => write!(f, "'{text}' is not a complete number"),
            IssueKind::NonFinite { value } => write!(f, "{value} is not a finite number"),
            IssueKind::UnsupportedGroove { family } => {
                write!(f, "groove '{family}' is not available for this unit")
            }
            IssueKind::GrooveConstraint { message } => f.write_str(message),
            IssueKind::PlaceholderValue => f.write_str("value has not been set"),
            IssueKind::NonPositive { value } => write!(f, "{value} must be greater than zero"),
            IssueKind::Negative { value } => write!(f, "{value} must not be negative"),
            IssueKind::MissingMaterialData => {
                f.write_str("material type and flow stress parameters are required")
            }
            IssueKind::NoReduction { finished, incoming } => write!(
                f,
                "finished area {finished} m² must be smaller than the incoming {incoming} m²"
            ),
        }
    }
}

/// Every reason the engine would be handed a bad request.
pub fn submit_issues(design: &PassDesign) -> Vec<SubmitIssue> {
    let mut issues = Vec::new();

    if design.units.is_empty() {
        issues.push(SubmitIssue::global("units", IssueKind::EmptySequence));
    }
    for id in design.units.duplicate_ids() {
        issues.push(SubmitIssue::unit(id, "id", IssueKind::DuplicateId));
    }

    for unit in &design.units {
        check_unit(unit, &design.solve, &mut issues);
    }
    check_profile(&design.in_profile, &mut issues);
    check_solve(&design.solve, &design.in_profile, &mut issues);
    issues
}

/// [`submit_issues`] as a `Result`.
pub fn check_submittable(design: &PassDesign) -> Result<(), ValidationError> {
    let issues = submit_issues(design);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::NotSubmittable { issues })
    }
}

/// Numeric fields a unit cannot meaningfully leave at zero.
fn must_be_set(unit: &PassUnit, key: &str, solve: &SolveMethod) -> bool {
    match key {
        "gap" | "nominal_radius" | "inscribed_circle_diameter" | "transportValue"
        | "coolingValue" | "inner_radius" => true,
        "velocity" => unit.unit_type().is_roll_pass() && matches!(solve, SolveMethod::Solve {}),
        _ => false,
    }
}

fn check_unit(unit: &PassUnit, solve: &SolveMethod, issues: &mut Vec<SubmitIssue>) {
    let id = unit.id;
    for spec in unit.schema().fields {
        if spec.kind != FieldKind::Number {
            continue;
        }
        let Some(input) = unit.numeric(spec.key) else {
            continue;
        };
        if let Some(text) = input.draft()
            && !is_complete_numeric(text)
        {
            issues.push(SubmitIssue::unit(
                id,
                spec.key,
                IssueKind::IncompleteNumber {
                    text: text.to_string(),
                },
            ));
            continue;
        }
        let value = input.value();
        if !value.is_finite() {
            issues.push(SubmitIssue::unit(id, spec.key, IssueKind::NonFinite { value }));
        } else if value == 0.0 && must_be_set(unit, spec.key, solve) {
            issues.push(SubmitIssue::unit(id, spec.key, IssueKind::PlaceholderValue));
        }
    }

    if let Some(groove) = unit.groove() {
        check_groove(unit, groove, issues);
    }
}

fn check_groove(unit: &PassUnit, groove: &GrooveInstance, issues: &mut Vec<SubmitIssue>) {
    let id = unit.id;
    let family = groove.family_id();
    if !unit.schema().groove_options().contains(&family) {
        issues.push(SubmitIssue::unit(
            id,
            crate::unit_schema::GROOVE_TYPE,
            IssueKind::UnsupportedGroove {
                family: family.to_string(),
            },
        ));
        return;
    }

    let evaluation = evaluate_instance(groove);
    if !evaluation.is_valid() {
        issues.push(SubmitIssue::unit(
            id,
            crate::unit_schema::GROOVE,
            IssueKind::GrooveConstraint {
                message: evaluation.message,
            },
        ));
    }

    let schema = groove.schema();
    for (key, value) in groove.params() {
        let field = format!("groove.{key}");
        if !value.is_finite() {
            issues.push(SubmitIssue::unit(id, field, IssueKind::NonFinite { value }));
            continue;
        }
        let has_default = schema.spec(key).is_some_and(|s| s.default.is_some());
        if value == 0.0 && !has_default {
            issues.push(SubmitIssue::unit(id, field, IssueKind::PlaceholderValue));
        }
    }
}

fn check_profile(profile: &InProfile, issues: &mut Vec<SubmitIssue>) {
    for (key, value) in profile
        .shape
        .dimensions()
        .into_iter()
        .chain(profile.thermal_properties())
    {
        if !is_positive_finite(value) {
            issues.push(profile_issue(key, value, IssueKind::NonPositive { value }));
        }
    }

    if let Some(radius) = profile.shape.corner_radius()
        && !(radius.is_finite() && radius >= 0.0)
    {
        issues.push(profile_issue(
            "corner_radius",
            radius,
            IssueKind::Negative { value: radius },
        ));
    }

    if !(profile.strain.is_finite() && profile.strain >= 0.0) {
        issues.push(profile_issue(
            "strain",
            profile.strain,
            IssueKind::Negative {
                value: profile.strain,
            },
        ));
    }

    if profile.material == Material::Other {
        let named = profile
            .material_type
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        match (&profile.flow_stress, named) {
            (Some(params), true) => {
                for (key, value) in params.values() {
                    if !value.is_finite() {
                        issues.push(SubmitIssue::global(
                            format!("inProfile.flowStressParams.{key}"),
                            IssueKind::NonFinite { value },
                        ));
                    }
                }
            }
            _ => issues.push(SubmitIssue::global(
                "inProfile.material",
                IssueKind::MissingMaterialData,
            )),
        }
    }
}

fn profile_issue(key: &str, value: f64, kind: IssueKind) -> SubmitIssue {
    let kind = if value.is_finite() {
        kind
    } else {
        IssueKind::NonFinite { value }
    };
    SubmitIssue::global(format!("inProfile.{key}"), kind)
}

fn check_solve(solve: &SolveMethod, profile: &InProfile, issues: &mut Vec<SubmitIssue>) {
    let mut params_ok = true;
    for (key, value) in solve.params() {
        if !is_positive_finite(value) {
            params_ok = false;
            let kind = if value.is_finite() {
                IssueKind::NonPositive { value }
            } else {
                IssueKind::NonFinite { value }
            };
            issues.push(SubmitIssue::global(format!("solve_params.{key}"), kind));
        }
    }

    let incoming = profile.shape.area();
    if let Some(finished) = solve.out_cross_section()
        && params_ok
        && incoming.get::<square_meter>() > 0.0
        && finished >= incoming
    {
        issues.push(SubmitIssue::global(
            "solve_params.out_cross_section",
            IssueKind::NoReduction {
                finished: finished.get::<square_meter>(),
                incoming: incoming.get::<square_meter>(),
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NumericInput, PassSequence, UnitType};
    use rm_grooves::GrooveParam;

    fn id(n: u32) -> UnitId {
        UnitId::new(n).unwrap()
    }

    /// A two-roll box pass that passes every check.
    fn ready_unit(n: u32) -> PassUnit {
        let mut unit = PassUnit::new(id(n), UnitType::TwoRollPass);
        *unit.numeric_mut("gap").unwrap() = NumericInput::Value(0.002);
        *unit.numeric_mut("nominal_radius").unwrap() = NumericInput::Value(0.16);
        *unit.numeric_mut("velocity").unwrap() = NumericInput::Value(1.0);
        let groove = unit.groove_mut().unwrap();
        groove.set(GrooveParam::R1, 0.003);
        groove.set(GrooveParam::R2, 0.004);
        groove.set(GrooveParam::Depth, 0.01);
        groove.toggle_optional(GrooveParam::GroundWidth);
        groove.set(GrooveParam::GroundWidth, 0.02);
        groove.toggle_optional(GrooveParam::FlankAngle);
        groove.set(GrooveParam::FlankAngle, 60.0);
        unit
    }

    fn design(units: Vec<PassUnit>) -> PassDesign {
        PassDesign {
            units: PassSequence::new(units),
            ..PassDesign::new("test")
        }
    }

    fn kinds(design: &PassDesign) -> Vec<IssueKind> {
        submit_issues(design).into_iter().map(|i| i.kind).collect()
    }

    #[test]
    fn ready_design_has_no_issues() {
        let d = design(vec![ready_unit(1)]);
        assert_eq!(submit_issues(&d), Vec::new());
        assert!(check_submittable(&d).is_ok());
        assert!(validate_design(&d).is_ok());
    }

    #[test]
    fn fresh_design_is_structurally_valid_but_not_submittable() {
        let d = PassDesign::new("fresh");
        assert!(validate_design(&d).is_ok());
        let issues = submit_issues(&d);
        assert!(
            issues
                .iter()
                .any(|i| matches!(i.kind, IssueKind::GrooveConstraint { .. }))
        );
        assert!(
            issues
                .iter()
                .any(|i| i.key == "groove.r1" && i.kind == IssueKind::PlaceholderValue)
        );
        assert!(
            !issues.iter().any(|i| i.key == "groove.pad_angle"),
            "pad angle defaults to zero"
        );
    }

    #[test]
    fn incomplete_draft_blocks_submit() {
        let mut unit = ready_unit(1);
        *unit.numeric_mut("gap").unwrap() = NumericInput::Draft("2e-".into());
        let issues = submit_issues(&design(vec![unit]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "gap");
        assert_eq!(
            issues[0].kind,
            IssueKind::IncompleteNumber { text: "2e-".into() }
        );
    }

    #[test]
    fn complete_draft_is_accepted() {
        let mut unit = ready_unit(1);
        *unit.numeric_mut("gap").unwrap() = NumericInput::Draft("2e-3".into());
        assert!(submit_issues(&design(vec![unit])).is_empty());
    }

    #[test]
    fn groove_not_offered_for_unit_type() {
        let mut unit = PassUnit::new(id(1), UnitType::ThreeRollPass);
        unit.change_groove_type("BoxGroove");
        let issues = submit_issues(&design(vec![unit]));
        assert!(issues.iter().any(|i| i.key == "grooveType"
            && i.kind
                == IssueKind::UnsupportedGroove {
                    family: "BoxGroove".into()
                }));
    }

    #[test]
    fn all_problems_are_collected() {
        let mut a = ready_unit(1);
        *a.numeric_mut("nominal_radius").unwrap() = NumericInput::Value(f64::NAN);
        let b = ready_unit(1);
        let mut d = design(vec![a, b]);
        d.solve = SolveMethod::SolveForward { in_velocity: 0.0 };
        d.in_profile.density = -1.0;

        let kinds = kinds(&d);
        assert!(kinds.contains(&IssueKind::DuplicateId));
        assert!(kinds.iter().any(|k| matches!(k, IssueKind::NonFinite { .. })));
        assert!(kinds.contains(&IssueKind::NonPositive { value: 0.0 }));
        assert!(kinds.contains(&IssueKind::NonPositive { value: -1.0 }));
        assert!(validate_design(&d).is_err());
    }

    #[test]
    fn zero_gap_is_a_placeholder() {
        let mut unit = ready_unit(1);
        *unit.numeric_mut("gap").unwrap() = NumericInput::Value(0.0);
        let issues = submit_issues(&design(vec![unit]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "gap");
        assert_eq!(issues[0].kind, IssueKind::PlaceholderValue);
    }

    #[test]
    fn velocity_only_required_for_plain_solve() {
        let mut unit = ready_unit(1);
        *unit.numeric_mut("velocity").unwrap() = NumericInput::Value(0.0);
        let mut d = design(vec![unit]);
        assert_eq!(kinds(&d), vec![IssueKind::PlaceholderValue]);

        d.solve = SolveMethod::forward();
        assert!(submit_issues(&d).is_empty());
    }

    #[test]
    fn finished_area_must_be_below_incoming() {
        let mut d = design(vec![ready_unit(1)]);
        // 30 mm round, about 7.07e-4 m²
        d.solve = SolveMethod::SolveBackward {
            out_cross_section: 1e-3,
            out_velocity: 2.0,
        };
        let issues = submit_issues(&d);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "solve_params.out_cross_section");
        assert!(matches!(
            issues[0].kind,
            IssueKind::NoReduction { finished, .. } if finished == 1e-3
        ));
        assert!(issues[0].to_string().contains("must be smaller"));

        d.solve = SolveMethod::SolveBackward {
            out_cross_section: 5e-4,
            out_velocity: 2.0,
        };
        assert!(submit_issues(&d).is_empty());
    }

    #[test]
    fn bad_finished_area_is_reported_once() {
        let mut d = design(vec![ready_unit(1)]);
        d.solve = SolveMethod::SolveBackward {
            out_cross_section: f64::INFINITY,
            out_velocity: 2.0,
        };
        assert_eq!(
            kinds(&d),
            vec![IssueKind::NonFinite {
                value: f64::INFINITY
            }]
        );
    }

    #[test]
    fn other_material_needs_flow_stress() {
        let mut d = design(vec![ready_unit(1)]);
        d.in_profile.material = Material::Other;
        assert_eq!(kinds(&d), vec![IssueKind::MissingMaterialData]);

        d.in_profile.material_type = Some("X5CrNi18-10".into());
        d.in_profile.flow_stress = Some(Default::default());
        assert!(submit_issues(&d).is_empty());
    }

    #[test]
    fn structural_checks() {
        let mut d = design(vec![]);
        assert!(matches!(
            validate_design(&d),
            Err(ValidationError::EmptySequence)
        ));
        assert_eq!(kinds(&d), vec![IssueKind::EmptySequence]);

        d.units.push(ready_unit(1));
        d.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_design(&d),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn not_submittable_error_lists_issues() {
        let err = check_submittable(&PassDesign::new("fresh")).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("unit 1, groove"));
    }
}
