//! Editing scenarios driven through the session, the way a front end does.

use rm_app::PassDesignSession;
use rm_core::UnitId;
use rm_grooves::{ConstraintStatus, GrooveParam};
use rm_project::{PassDesign, UnitType};

#[test]
fn box_groove_to_round_groove() {
    let mut session = PassDesignSession::new(PassDesign::new("scenario")).unwrap();
    let id = UnitId::first();

    let unit = session.unit(id).unwrap();
    assert_eq!(unit.unit_type(), UnitType::TwoRollPass);
    assert_eq!(unit.groove().unwrap().family_id(), "BoxGroove");

    session.set_groove_param(id, "r1", "50");
    session.set_groove_param(id, "r2", "30");
    session.set_groove_param(id, "depth", "12");
    session.toggle_optional_groove_param(id, "ground_width");
    session.set_groove_param(id, "ground_width", "80");
    session.toggle_optional_groove_param(id, "usable_width");
    session.set_groove_param(id, "usable_width", "70");

    let status = session.groove_status(id).unwrap();
    assert_eq!(status.status, ConstraintStatus::Valid);

    session.change_groove_type(id, "RoundGroove");
    let groove = session.unit(id).unwrap().groove().unwrap();
    let params: Vec<_> = groove.params().collect();
    assert_eq!(
        params,
        vec![(GrooveParam::R1, 0.0), (GrooveParam::PadAngle, 0.0)]
    );
    assert_eq!(groove.active_optional().count(), 0);

    let status = session.groove_status(id).unwrap();
    assert_eq!(status.status, ConstraintStatus::TooFew);
    assert!(status.message.contains("R2"));
}

#[test]
fn changing_to_transport_leaves_no_groove_keys() {
    let mut session = PassDesignSession::new(PassDesign::new("scenario")).unwrap();
    let id = UnitId::first();
    session.set_field(id, "gap", "0.004");
    session.toggle_optional_groove_param(id, "flank_angle");

    session.change_unit_type(id, UnitType::Transport);

    let unit = session.unit(id).unwrap();
    let json = serde_json::to_value(unit).unwrap();
    let mut keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .filter(|k| !matches!(*k, "id" | "type"))
        .collect();
    keys.sort_unstable();

    let mut expected: Vec<&str> = UnitType::Transport
        .schema()
        .fields
        .iter()
        .map(|f| f.key)
        .collect();
    expected.sort_unstable();

    assert_eq!(keys, expected);
    assert!(unit.groove().is_none());
    assert_eq!(unit.select("transportDefineBy"), Some("length"));
}

#[test]
fn false_round_groups_reported_separately() {
    let mut session = PassDesignSession::new(PassDesign::new("scenario")).unwrap();
    let id = UnitId::first();
    session.set_field(id, "grooveType", "FalseRoundGroove");
    for key in ["r2", "depth", "flank_angle", "flank_width"] {
        session.toggle_optional_groove_param(id, key);
    }

    let status = session.groove_status(id).unwrap();
    assert_eq!(status.status, ConstraintStatus::Invalid);
    assert_eq!(status.groups[0].status, ConstraintStatus::Valid);
    assert_eq!(status.groups[1].status, ConstraintStatus::TooMany);

    session.toggle_optional_groove_param(id, "flank_width");
    assert!(session.groove_status(id).unwrap().is_valid());
}
