//! Edits applied to one row of a pass sequence.
//!
//! Every operation touches only the unit with the given id and never fails:
//! a stale id, an unknown key or a value the field does not accept leaves the
//! sequence unchanged.

use rm_core::{UnitId, is_partial_numeric, resolve};
use rm_grooves::GrooveParam;
use rm_project::unit_schema::GROOVE_TYPE;
use rm_project::{FieldKind, NumericInput, PassSequence, PassUnit, UnitType};
use tracing::debug;

fn unit_mut(seq: &mut PassSequence, id: UnitId) -> Option<&mut PassUnit> {
    let unit = seq.get_mut(id);
    if unit.is_none() {
        debug!(%id, "ignoring edit of unknown unit");
    }
    unit
}

/// Replace the unit with a fresh one of `new_type`. Nothing is carried over
/// except the id.
pub fn change_unit_type(seq: &mut PassSequence, id: UnitId, new_type: UnitType) {
    if let Some(unit) = unit_mut(seq, id) {
        *unit = PassUnit::new(id, new_type);
    }
}

/// Reset the unit's groove to `family_id` with its required defaults and no
/// optional parameters. Units without a groove are left alone.
pub fn change_groove_type(seq: &mut PassSequence, id: UnitId, family_id: &str) {
    if let Some(unit) = unit_mut(seq, id)
        && !unit.change_groove_type(family_id)
    {
        debug!(%id, family_id, "unit has no groove");
    }
}

/// Apply raw input to a field.
///
/// Numeric fields accept anything that can still grow into a number and
/// keep the text as typed until [`commit_field`]. A non-zero value clears the
/// field's exclusive partner. Select fields accept only their declared
/// options, except `grooveType`, which delegates to [`change_groove_type`].
pub fn set_field(seq: &mut PassSequence, id: UnitId, key: &str, raw: &str) {
    let Some(unit) = unit_mut(seq, id) else {
        return;
    };
    let Some(spec) = unit.schema().field(key) else {
        debug!(%id, key, "ignoring unknown field");
        return;
    };

    let nonzero = match spec.kind {
        FieldKind::Number => {
            if !is_partial_numeric(raw) {
                debug!(%id, key, raw, "rejecting non-numeric input");
                return;
            }
            if let Some(slot) = unit.numeric_mut(key) {
                *slot = NumericInput::Draft(raw.to_string());
            }
            resolve(raw) != 0.0
        }
        FieldKind::Text => {
            unit.label = raw.to_string();
            !raw.is_empty()
        }
        FieldKind::Select if key == GROOVE_TYPE => {
            unit.change_groove_type(raw);
            return;
        }
        FieldKind::Select => {
            if !unit.set_select(key, raw) {
                return;
            }
            !raw.is_empty()
        }
        FieldKind::Groove => {
            debug!(%id, key, "groove parameters are edited individually");
            return;
        }
    };

    if nonzero && let Some(partner) = spec.mutually_exclusive_with() {
        clear_field(unit, partner);
    }
}

fn clear_field(unit: &mut PassUnit, key: &str) {
    if let Some(slot) = unit.numeric_mut(key) {
        *slot = NumericInput::default();
    }
}

/// Finish editing a numeric field: the typed text becomes its value.
pub fn commit_field(seq: &mut PassSequence, id: UnitId, key: &str) {
    if let Some(unit) = unit_mut(seq, id)
        && let Some(slot) = unit.numeric_mut(key)
    {
        slot.commit();
    }
}

/// Activate or deactivate an optional groove parameter. Keys the family does
/// not list as optional are ignored.
pub fn toggle_optional_groove_param(seq: &mut PassSequence, id: UnitId, key: &str) {
    let Ok(param) = key.parse::<GrooveParam>() else {
        debug!(%id, key, "ignoring unknown groove parameter");
        return;
    };
    if let Some(unit) = unit_mut(seq, id)
        && let Some(groove) = unit.groove_mut()
    {
        groove.toggle_optional(param);
    }
}

/// Set the value of a groove parameter that is currently present.
pub fn set_groove_param(seq: &mut PassSequence, id: UnitId, key: &str, raw: &str) {
    let Ok(param) = key.parse::<GrooveParam>() else {
        debug!(%id, key, "ignoring unknown groove parameter");
        return;
    };
    if !is_partial_numeric(raw) {
        debug!(%id, key, raw, "rejecting non-numeric input");
        return;
    }
    if let Some(unit) = unit_mut(seq, id)
        && let Some(groove) = unit.groove_mut()
    {
        groove.set(param, resolve(raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rm_grooves::{ConstraintStatus, evaluate_instance};

    fn id(n: u32) -> UnitId {
        UnitId::new(n).unwrap()
    }

    fn seq() -> PassSequence {
        PassSequence::new(vec![
            PassUnit::new(id(1), UnitType::TwoRollPass),
            PassUnit::new(id(2), UnitType::Transport),
        ])
    }

    fn value(seq: &PassSequence, n: u32, key: &str) -> f64 {
        seq.get(id(n)).unwrap().numeric(key).unwrap().value()
    }

    #[test]
    fn stale_id_is_a_no_op() {
        let mut s = seq();
        let before = s.clone();
        change_unit_type(&mut s, id(9), UnitType::CoolingPipe);
        change_groove_type(&mut s, id(9), "RoundGroove");
        set_field(&mut s, id(9), "gap", "3");
        commit_field(&mut s, id(9), "gap");
        toggle_optional_groove_param(&mut s, id(9), "depth");
        set_groove_param(&mut s, id(9), "r1", "2");
        assert_eq!(s, before);
    }

    #[test]
    fn change_unit_type_touches_only_target() {
        let mut s = seq();
        set_field(&mut s, id(1), "gap", "0.004");
        change_unit_type(&mut s, id(2), UnitType::ThreeRollPass);
        assert_eq!(value(&s, 1, "gap"), 0.004);
        assert_eq!(s.get(id(2)).unwrap().unit_type(), UnitType::ThreeRollPass);
    }

    #[test]
    fn numeric_input_is_kept_as_typed_until_commit() {
        let mut s = seq();
        set_field(&mut s, id(1), "velocity", "1.2e-");
        let unit = s.get(id(1)).unwrap();
        assert_eq!(unit.numeric("velocity").unwrap().draft(), Some("1.2e-"));
        assert_eq!(value(&s, 1, "velocity"), 0.0);

        set_field(&mut s, id(1), "velocity", "1.2e-1");
        commit_field(&mut s, id(1), "velocity");
        assert_eq!(
            s.get(id(1)).unwrap().numeric("velocity"),
            Some(&NumericInput::Value(0.12))
        );
    }

    #[test]
    fn invalid_keystroke_is_rejected() {
        let mut s = seq();
        set_field(&mut s, id(1), "velocity", "1.5");
        set_field(&mut s, id(1), "velocity", "1.5x");
        assert_eq!(value(&s, 1, "velocity"), 1.5);
    }

    #[test]
    fn padded_number_is_accepted_and_committed() {
        let mut s = seq();
        set_field(&mut s, id(1), "velocity", " 5");
        assert_eq!(s.get(id(1)).unwrap().numeric("velocity").unwrap().draft(), Some(" 5"));
        commit_field(&mut s, id(1), "velocity");
        assert_eq!(value(&s, 1, "velocity"), 5.0);
    }

    #[test]
    fn numeric_edit_touches_only_its_field() {
        let mut s = seq();
        set_field(&mut s, id(1), "nominal_radius", "0.16");
        set_field(&mut s, id(1), "gap", "0.003");
        assert_eq!(value(&s, 1, "gap"), 0.003);
        assert_eq!(value(&s, 1, "nominal_radius"), 0.16);
        assert!(s.get(id(1)).unwrap().numeric("height").is_none());
    }

    #[test]
    fn define_by_changes_label_not_value() {
        let mut s = seq();
        set_field(&mut s, id(2), "transportValue", "12");
        set_field(&mut s, id(2), "transportDefineBy", "duration");
        let unit = s.get(id(2)).unwrap();
        assert_eq!(unit.unit_label("transportValue"), "s");
        assert_eq!(value(&s, 2, "transportValue"), 12.0);

        set_field(&mut s, id(2), "transportDefineBy", "forever");
        assert_eq!(s.get(id(2)).unwrap().select("transportDefineBy"), Some("duration"));
    }

    #[test]
    fn groove_type_field_delegates() {
        let mut s = seq();
        set_field(&mut s, id(1), "grooveType", "DiamondGroove");
        let groove = s.get(id(1)).unwrap().groove().unwrap();
        assert_eq!(groove.family_id(), "DiamondGroove");
    }

    #[test]
    fn groove_type_outside_options_is_held_and_flagged_at_submit() {
        let mut s = seq();
        set_field(&mut s, id(1), "grooveType", "FlatGroove");
        assert_eq!(s.get(id(1)).unwrap().select("grooveType"), Some("FlatGroove"));

        let design = rm_project::PassDesign {
            units: s,
            ..rm_project::PassDesign::new("flat")
        };
        assert!(rm_project::submit_issues(&design).iter().any(|issue| {
            issue.unit == Some(id(1))
                && issue.kind
                    == rm_project::IssueKind::UnsupportedGroove {
                        family: "FlatGroove".into(),
                    }
        }));
    }

    #[test]
    fn groove_type_on_transport_is_ignored() {
        let mut s = seq();
        let before = s.clone();
        change_groove_type(&mut s, id(2), "RoundGroove");
        set_field(&mut s, id(2), "grooveType", "RoundGroove");
        assert_eq!(s, before);
    }

    #[test]
    fn label_is_stored_verbatim() {
        let mut s = seq();
        set_field(&mut s, id(1), "label", " Stand 1 ");
        assert_eq!(s.get(id(1)).unwrap().label, " Stand 1 ");
    }

    #[test]
    fn groove_param_edits() {
        let mut s = seq();
        set_groove_param(&mut s, id(1), "r1", "5e-3");
        set_groove_param(&mut s, id(1), "usable_width", "7");
        set_groove_param(&mut s, id(1), "nonsense", "7");
        let groove = s.get(id(1)).unwrap().groove().unwrap();
        assert_eq!(groove.get(GrooveParam::R1), Some(0.005));
        assert_eq!(groove.get(GrooveParam::UsableWidth), None);

        toggle_optional_groove_param(&mut s, id(1), "usable_width");
        toggle_optional_groove_param(&mut s, id(1), "tip_angle");
        let groove = s.get(id(1)).unwrap().groove().unwrap();
        assert_eq!(groove.get(GrooveParam::UsableWidth), Some(0.0));
        assert_eq!(groove.get(GrooveParam::TipAngle), None);
        assert_eq!(evaluate_instance(groove).status, ConstraintStatus::TooFew);
    }
}
