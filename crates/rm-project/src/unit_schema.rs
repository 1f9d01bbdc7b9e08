//! Field layout of each forming unit type.

use core::fmt;
use core::str::FromStr;

use rm_core::units::symbols;
use rm_grooves::GrooveFamily;
use serde::{Deserialize, Serialize};

use crate::ProjectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    TwoRollPass,
    ThreeRollPass,
    Transport,
    CoolingPipe,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [
        UnitType::TwoRollPass,
        UnitType::ThreeRollPass,
        UnitType::Transport,
        UnitType::CoolingPipe,
    ];

    pub fn id(self) -> &'static str {
        match self {
            UnitType::TwoRollPass => "TwoRollPass",
            UnitType::ThreeRollPass => "ThreeRollPass",
            UnitType::Transport => "Transport",
            UnitType::CoolingPipe => "CoolingPipe",
        }
    }

    pub fn schema(self) -> &'static UnitSchema {
        match self {
            UnitType::TwoRollPass => &TWO_ROLL_PASS,
            UnitType::ThreeRollPass => &THREE_ROLL_PASS,
            UnitType::Transport => &TRANSPORT,
            UnitType::CoolingPipe => &COOLING_PIPE,
        }
    }

    pub fn is_roll_pass(self) -> bool {
        matches!(self, UnitType::TwoRollPass | UnitType::ThreeRollPass)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for UnitType {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitType::ALL
            .into_iter()
            .find(|t| t.id() == s)
            .ok_or_else(|| ProjectError::UnknownUnitType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
    Select,
    Groove,
}

/// Relation between two fields of the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLink {
    /// Setting this field to a non-zero value clears the partner.
    ExclusiveWith(&'static str),
    /// The display unit of this field follows the named selector; the value
    /// itself is kept when the selector changes.
    UnitSelectedBy(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub options: &'static [&'static str],
    /// Display unit; empty for dimensionless and non-numeric fields.
    pub unit: &'static str,
    pub link: Option<FieldLink>,
}

impl FieldSpec {
    pub fn mutually_exclusive_with(&self) -> Option<&'static str> {
        match self.link {
            Some(FieldLink::ExclusiveWith(partner)) => Some(partner),
            _ => None,
        }
    }

    pub fn unit_selector(&self) -> Option<&'static str> {
        match self.link {
            Some(FieldLink::UnitSelectedBy(selector)) => Some(selector),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSchema {
    pub unit_type: Option<UnitType>,
    pub fields: &'static [FieldSpec],
}

impl UnitSchema {
    pub const EMPTY: UnitSchema = UnitSchema {
        unit_type: None,
        fields: &[],
    };

    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Groove families offered for this unit type.
    pub fn groove_options(&self) -> &'static [&'static str] {
        self.field(GROOVE_TYPE).map_or(&[], |f| f.options)
    }
}

/// Look up a unit type by identifier. Unknown types have no fields.
pub fn unit_schema_for(unit_type: &str) -> &'static UnitSchema {
    unit_type
        .parse::<UnitType>()
        .map_or(&UnitSchema::EMPTY, UnitType::schema)
}

pub const LABEL: &str = "label";
pub const GROOVE_TYPE: &str = "grooveType";
pub const GROOVE: &str = "groove";

pub const LENGTH: &str = "length";
pub const DURATION: &str = "duration";

const HEAT_TRANSFER_UNIT: &str = "W/(m²·K)";
const VOLUME_FLUX_UNIT: &str = "m³/s";

const fn number(key: &'static str, label: &'static str, unit: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Number,
        options: &[],
        unit,
        link: None,
    }
}

const fn select(key: &'static str, label: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind: FieldKind::Select,
        options,
        unit: "",
        link: None,
    }
}

const LABEL_FIELD: FieldSpec = FieldSpec {
    key: LABEL,
    label: "Label",
    kind: FieldKind::Text,
    options: &[],
    unit: "",
    link: None,
};

const GROOVE_FIELD: FieldSpec = FieldSpec {
    key: GROOVE,
    label: "Groove Parameters",
    kind: FieldKind::Groove,
    options: &[],
    unit: "",
    link: None,
};

const NOMINAL_RADIUS: FieldSpec = number("nominal_radius", "Nominal Radius", symbols::METER);
const VELOCITY: FieldSpec = number("velocity", "Velocity", symbols::METER_PER_SECOND);
const FRICTION: FieldSpec = number(
    "coulomb_friction_coefficient",
    "Coulomb Friction Coefficient",
    "",
);

const TWO_ROLL_GROOVES: &[&str] = &[
    GrooveFamily::BoxGroove.id(),
    GrooveFamily::ConstrictedBoxGroove.id(),
    GrooveFamily::DiamondGroove.id(),
    GrooveFamily::GothicGroove.id(),
    GrooveFamily::SquareGroove.id(),
    GrooveFamily::CircularOvalGroove.id(),
    GrooveFamily::ConstrictedCircularOvalGroove.id(),
    GrooveFamily::ConstrictedSwedishOvalGroove.id(),
    GrooveFamily::FlatOvalGroove.id(),
    GrooveFamily::Oval3RadiiGroove.id(),
    GrooveFamily::Oval3RadiiFlankedGroove.id(),
    GrooveFamily::SwedishOvalGroove.id(),
    GrooveFamily::UpsetOvalGroove.id(),
    GrooveFamily::RoundGroove.id(),
    GrooveFamily::FalseRoundGroove.id(),
];

const THREE_ROLL_GROOVES: &[&str] = &[
    GrooveFamily::CircularOvalGroove.id(),
    GrooveFamily::RoundGroove.id(),
    GrooveFamily::FalseRoundGroove.id(),
];

static TWO_ROLL_PASS: UnitSchema = UnitSchema {
    unit_type: Some(UnitType::TwoRollPass),
    fields: &[
        LABEL_FIELD,
        number("gap", "Gap", symbols::METER),
        NOMINAL_RADIUS,
        VELOCITY,
        FRICTION,
        select("orientation", "Orientation", &["horizontal", "vertical"]),
        select(GROOVE_TYPE, "Groove Type", TWO_ROLL_GROOVES),
        GROOVE_FIELD,
    ],
};

static THREE_ROLL_PASS: UnitSchema = UnitSchema {
    unit_type: Some(UnitType::ThreeRollPass),
    fields: &[
        LABEL_FIELD,
        number(
            "inscribed_circle_diameter",
            "Inscribed Circle Diameter (ICD)",
            symbols::METER,
        ),
        NOMINAL_RADIUS,
        VELOCITY,
        FRICTION,
        select("orientation", "Orientation", &["Y", "AntiY"]),
        select(GROOVE_TYPE, "Groove Type", THREE_ROLL_GROOVES),
        GROOVE_FIELD,
    ],
};

static TRANSPORT: UnitSchema = UnitSchema {
    unit_type: Some(UnitType::Transport),
    fields: &[
        LABEL_FIELD,
        select("transportDefineBy", "Define by", &[LENGTH, DURATION]),
        FieldSpec {
            link: Some(FieldLink::UnitSelectedBy("transportDefineBy")),
            ..number("transportValue", "Value", "")
        },
        number(
            "environment_temperature",
            "Environment Temperature",
            symbols::KELVIN,
        ),
        number(
            "heat_transfer_coefficient",
            "Heat Transfer Coefficient",
            HEAT_TRANSFER_UNIT,
        ),
    ],
};

static COOLING_PIPE: UnitSchema = UnitSchema {
    unit_type: Some(UnitType::CoolingPipe),
    fields: &[
        LABEL_FIELD,
        select("coolingDefineBy", "Define by", &[LENGTH, DURATION]),
        FieldSpec {
            link: Some(FieldLink::UnitSelectedBy("coolingDefineBy")),
            ..number("coolingValue", "Value", "")
        },
        number("inner_radius", "Inner Radius", symbols::METER),
        number(
            "coolant_temperature",
            "Coolant Temperature",
            symbols::KELVIN,
        ),
        number(
            "coolant_volume_flux",
            "Coolant Volume Flux",
            VOLUME_FLUX_UNIT,
        ),
    ],
};
