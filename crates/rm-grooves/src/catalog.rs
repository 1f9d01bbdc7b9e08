//! Static registry of groove families.
//!
//! One [`GrooveSchema`] per family, laid out in [`GrooveFamily::ALL`] order.
//! Lookups by an identifier the registry does not know return
//! [`GrooveSchema::EMPTY`] so that families added on the engine side degrade
//! to "no parameters" instead of failing.

use core::fmt;
use core::str::FromStr;

use crate::{GrooveError, GrooveParam};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrooveParameterSpec {
    pub key: GrooveParam,
    pub label: &'static str,
    pub tooltip: &'static str,
    pub default: Option<f64>,
}

impl GrooveParameterSpec {
    /// Value used when a family is (re)selected.
    pub fn initial_value(&self) -> f64 {
        self.default.unwrap_or(0.0)
    }
}

const fn param(key: GrooveParam, label: &'static str, tooltip: &'static str) -> GrooveParameterSpec {
    GrooveParameterSpec {
        key,
        label,
        tooltip,
        default: None,
    }
}

const R1: GrooveParameterSpec = param(GrooveParam::R1, "R1", "Radius 1 (face/flank)");
const R2: GrooveParameterSpec = param(GrooveParam::R2, "R2", "Radius 2 (flank/ground)");
const R3: GrooveParameterSpec = param(GrooveParam::R3, "R3", "Radius 3 (ground)");
const R4: GrooveParameterSpec = param(GrooveParam::R4, "R4", "Radius 4 (indent)");
const DEPTH: GrooveParameterSpec = param(GrooveParam::Depth, "Depth", "Maximum depth");
const INDENT: GrooveParameterSpec = param(GrooveParam::Indent, "Indent", "Indentation depth");
const USABLE_WIDTH: GrooveParameterSpec = param(
    GrooveParam::UsableWidth,
    "Usable Width",
    "Usable width of the groove",
);
const BARREL_USABLE_WIDTH: GrooveParameterSpec = param(
    GrooveParam::UsableWidth,
    "Usable Width",
    "Usable width of the rolls barrel width",
);
const GROUND_WIDTH: GrooveParameterSpec = param(
    GrooveParam::GroundWidth,
    "Ground Width",
    "Width of the groove ground",
);
const EVEN_GROUND_WIDTH: GrooveParameterSpec = param(
    GrooveParam::EvenGroundWidth,
    "Even Ground Width",
    "Width of the even ground",
);
const FLANK_ANGLE: GrooveParameterSpec = param(
    GrooveParam::FlankAngle,
    "Flank Angle",
    "Inclination angle of the flanks",
);
const FLANK_WIDTH: GrooveParameterSpec = param(
    GrooveParam::FlankWidth,
    "Flank Width",
    "Horizontal extent of the flanks",
);
const FLANK_HEIGHT: GrooveParameterSpec = param(
    GrooveParam::FlankHeight,
    "Flank Height",
    "Vertical extent of the flanks",
);
const FLANK_LENGTH: GrooveParameterSpec =
    param(GrooveParam::FlankLength, "Flank Length", "Length of the flanks");
const TIP_DEPTH: GrooveParameterSpec = param(
    GrooveParam::TipDepth,
    "Tip Depth",
    "Depth of the intersection of the extrapolated flanks",
);
const TIP_ANGLE: GrooveParameterSpec =
    param(GrooveParam::TipAngle, "Tip Angle", "Angle between the flanks");
const PAD_ANGLE: GrooveParameterSpec = GrooveParameterSpec {
    key: GrooveParam::PadAngle,
    label: "Pad Angle (°)",
    tooltip: "Angle between z-axis and roll face padding",
    default: Some(0.0),
};

/// How many parameters of an [`ArityGroup`] must be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    ExactlyOne,
    ExactlyTwo,
    /// Any number, including none.
    Unconstrained,
}

impl Arity {
    pub fn expected(self) -> Option<usize> {
        match self {
            Arity::ExactlyOne => Some(1),
            Arity::ExactlyTwo => Some(2),
            Arity::Unconstrained => None,
        }
    }
}

/// A set of optional parameters counted together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArityGroup {
    pub name: &'static str,
    pub keys: &'static [GrooveParam],
    pub arity: Arity,
    /// Unordered pairs that may not be active at the same time.
    pub forbidden_pairs: &'static [(GrooveParam, GrooveParam)],
}

/// Checks that need parameter values, not just which keys are active.
/// Reported as warnings; they never change the constraint status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    /// Tip angle (degrees) must lie below `low` or above `high`.
    TipAngleOutside { low: f64, high: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrooveSchema {
    pub family: Option<GrooveFamily>,
    pub required: &'static [GrooveParameterSpec],
    pub optional: &'static [GrooveParameterSpec],
    /// Rule text shown next to the optional parameters.
    pub rule: &'static str,
    pub groups: &'static [ArityGroup],
    pub advisories: &'static [Advisory],
}

impl GrooveSchema {
    pub const EMPTY: GrooveSchema = GrooveSchema {
        family: None,
        required: &[],
        optional: &[],
        rule: "",
        groups: &[],
        advisories: &[],
    };

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    pub fn spec(&self, key: GrooveParam) -> Option<&'static GrooveParameterSpec> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .find(|s| s.key == key)
    }

    pub fn is_required(&self, key: GrooveParam) -> bool {
        self.required.iter().any(|s| s.key == key)
    }

    pub fn is_optional(&self, key: GrooveParam) -> bool {
        self.optional.iter().any(|s| s.key == key)
    }

    pub fn label(&self, key: GrooveParam) -> &'static str {
        self.spec(key).map_or(key.key(), |s| s.label)
    }

    pub fn forbidden_pairs(&self) -> impl Iterator<Item = (GrooveParam, GrooveParam)> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.forbidden_pairs.iter().copied())
    }
}

/// Look up a family by its engine identifier.
pub fn schema_for(family_id: &str) -> &'static GrooveSchema {
    family_id
        .parse::<GrooveFamily>()
        .map_or(&GrooveSchema::EMPTY, GrooveFamily::schema)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GrooveFamily {
    BoxGroove,
    ConstrictedBoxGroove,
    DiamondGroove,
    GothicGroove,
    SquareGroove,
    CircularOvalGroove,
    ConstrictedCircularOvalGroove,
    ConstrictedSwedishOvalGroove,
    FlatOvalGroove,
    Oval3RadiiGroove,
    Oval3RadiiFlankedGroove,
    SwedishOvalGroove,
    UpsetOvalGroove,
    RoundGroove,
    FalseRoundGroove,
    FlatGroove,
}

impl GrooveFamily {
    pub const ALL: [GrooveFamily; 16] = [
        GrooveFamily::BoxGroove,
        GrooveFamily::ConstrictedBoxGroove,
        GrooveFamily::DiamondGroove,
        GrooveFamily::GothicGroove,
        GrooveFamily::SquareGroove,
        GrooveFamily::CircularOvalGroove,
        GrooveFamily::ConstrictedCircularOvalGroove,
        GrooveFamily::ConstrictedSwedishOvalGroove,
        GrooveFamily::FlatOvalGroove,
        GrooveFamily::Oval3RadiiGroove,
        GrooveFamily::Oval3RadiiFlankedGroove,
        GrooveFamily::SwedishOvalGroove,
        GrooveFamily::UpsetOvalGroove,
        GrooveFamily::RoundGroove,
        GrooveFamily::FalseRoundGroove,
        GrooveFamily::FlatGroove,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            GrooveFamily::BoxGroove => "BoxGroove",
            GrooveFamily::ConstrictedBoxGroove => "ConstrictedBoxGroove",
            GrooveFamily::DiamondGroove => "DiamondGroove",
            GrooveFamily::GothicGroove => "GothicGroove",
            GrooveFamily::SquareGroove => "SquareGroove",
            GrooveFamily::CircularOvalGroove => "CircularOvalGroove",
            GrooveFamily::ConstrictedCircularOvalGroove => "ConstrictedCircularOvalGroove",
            GrooveFamily::ConstrictedSwedishOvalGroove => "ConstrictedSwedishOvalGroove",
            GrooveFamily::FlatOvalGroove => "FlatOvalGroove",
            GrooveFamily::Oval3RadiiGroove => "Oval3RadiiGroove",
            GrooveFamily::Oval3RadiiFlankedGroove => "Oval3RadiiFlankedGroove",
            GrooveFamily::SwedishOvalGroove => "SwedishOvalGroove",
            GrooveFamily::UpsetOvalGroove => "UpsetOvalGroove",
            GrooveFamily::RoundGroove => "RoundGroove",
            GrooveFamily::FalseRoundGroove => "FalseRoundGroove",
            GrooveFamily::FlatGroove => "FlatGroove",
        }
    }

    pub fn schema(self) -> &'static GrooveSchema {
        &CATALOG[self as usize]
    }
}

impl fmt::Display for GrooveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GrooveFamily {
    type Err = GrooveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrooveFamily::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| GrooveError::UnknownFamily(s.to_string()))
    }
}

const WIDTH_KEYS: &[GrooveParam] = &[
    GrooveParam::GroundWidth,
    GrooveParam::EvenGroundWidth,
    GrooveParam::UsableWidth,
    GrooveParam::FlankAngle,
];
const GROUND_PAIR: &[(GrooveParam, GrooveParam)] =
    &[(GrooveParam::GroundWidth, GrooveParam::EvenGroundWidth)];
const TIP_KEYS: &[GrooveParam] = &[
    GrooveParam::UsableWidth,
    GrooveParam::TipDepth,
    GrooveParam::TipAngle,
];
const ROUND_KEYS: &[GrooveParam] = &[
    GrooveParam::R2,
    GrooveParam::Depth,
    GrooveParam::UsableWidth,
];
const FLANK_KEYS: &[GrooveParam] = &[
    GrooveParam::FlankAngle,
    GrooveParam::FlankWidth,
    GrooveParam::FlankHeight,
    GrooveParam::FlankLength,
];

const WIDTH_OPTIONAL: &[GrooveParameterSpec] =
    &[GROUND_WIDTH, EVEN_GROUND_WIDTH, USABLE_WIDTH, FLANK_ANGLE];
const TIP_OPTIONAL: &[GrooveParameterSpec] = &[USABLE_WIDTH, TIP_DEPTH, TIP_ANGLE];
const FLANK_OPTIONAL: &[GrooveParameterSpec] =
    &[FLANK_ANGLE, FLANK_WIDTH, FLANK_HEIGHT, FLANK_LENGTH];

const TWO_OF_WIDTHS: &[ArityGroup] = &[ArityGroup {
    name: "Optional",
    keys: WIDTH_KEYS,
    arity: Arity::ExactlyTwo,
    forbidden_pairs: GROUND_PAIR,
}];
const TWO_OF_TIPS: &[ArityGroup] = &[ArityGroup {
    name: "Optional",
    keys: TIP_KEYS,
    arity: Arity::ExactlyTwo,
    forbidden_pairs: &[],
}];
const TWO_OF_ROUND: &[ArityGroup] = &[ArityGroup {
    name: "Optional",
    keys: ROUND_KEYS,
    arity: Arity::ExactlyTwo,
    forbidden_pairs: &[],
}];

const WIDTH_RULE: &str =
    "Exactly 2 of the Other Parameters must be set (not Ground Width and Even Ground Width together)";

static CATALOG: [GrooveSchema; 16] = [
    GrooveSchema {
        family: Some(GrooveFamily::BoxGroove),
        required: &[R1, R2, DEPTH, PAD_ANGLE],
        optional: WIDTH_OPTIONAL,
        rule: WIDTH_RULE,
        groups: TWO_OF_WIDTHS,
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::ConstrictedBoxGroove),
        required: &[R1, R2, R4, DEPTH, INDENT, PAD_ANGLE],
        optional: WIDTH_OPTIONAL,
        rule: WIDTH_RULE,
        groups: TWO_OF_WIDTHS,
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::DiamondGroove),
        required: &[R1, R2, PAD_ANGLE],
        optional: TIP_OPTIONAL,
        rule: "Exactly two of Usable Width, Tip Depth and Tip Angle must be given.",
        groups: TWO_OF_TIPS,
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::GothicGroove),
        required: &[R1, R2, R3, USABLE_WIDTH, DEPTH, PAD_ANGLE],
        optional: &[],
        rule: "",
        groups: &[],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::SquareGroove),
        required: &[R1, R2, PAD_ANGLE],
        optional: TIP_OPTIONAL,
        rule: "Exactly two of Usable Width, Tip Depth and Tip Angle must be given. \
               Tip angle is <85° or >95° (no matter if given or calculated internally)",
        groups: TWO_OF_TIPS,
        advisories: &[Advisory::TipAngleOutside {
            low: 85.0,
            high: 95.0,
        }],
    },
    GrooveSchema {
        family: Some(GrooveFamily::CircularOvalGroove),
        required: &[R1, PAD_ANGLE],
        optional: &[R2, USABLE_WIDTH, DEPTH],
        rule: "Exactly two of R2, Usable Width and Depth must be given.",
        groups: TWO_OF_ROUND,
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::ConstrictedCircularOvalGroove),
        required: &[
            R1,
            R2,
            R3,
            R4,
            DEPTH,
            USABLE_WIDTH,
            EVEN_GROUND_WIDTH,
            INDENT,
            PAD_ANGLE,
        ],
        optional: &[],
        rule: "",
        groups: &[],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::ConstrictedSwedishOvalGroove),
        required: &[R1, R2, R4, DEPTH, INDENT, PAD_ANGLE],
        optional: WIDTH_OPTIONAL,
        rule: WIDTH_RULE,
        groups: TWO_OF_WIDTHS,
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::FlatOvalGroove),
        required: &[R1, R2, DEPTH, PAD_ANGLE],
        optional: &[EVEN_GROUND_WIDTH, USABLE_WIDTH],
        rule: "Exactly one of the Other Parameters must be set",
        groups: &[ArityGroup {
            name: "Optional",
            keys: &[GrooveParam::EvenGroundWidth, GrooveParam::UsableWidth],
            arity: Arity::ExactlyOne,
            forbidden_pairs: &[],
        }],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::Oval3RadiiGroove),
        required: &[R1, R2, R3, DEPTH, USABLE_WIDTH, PAD_ANGLE],
        optional: &[],
        rule: "",
        groups: &[],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::Oval3RadiiFlankedGroove),
        required: &[R1, R2, R3, DEPTH, USABLE_WIDTH, PAD_ANGLE],
        optional: FLANK_OPTIONAL,
        rule: "",
        groups: &[ArityGroup {
            name: "Flank",
            keys: FLANK_KEYS,
            arity: Arity::Unconstrained,
            forbidden_pairs: &[],
        }],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::SwedishOvalGroove),
        required: &[R1, R2, DEPTH, PAD_ANGLE],
        optional: WIDTH_OPTIONAL,
        rule: "Exactly one of the Optional Parameters must be set \
               (not Ground Width and Even Ground Width together)",
        groups: &[ArityGroup {
            name: "Optional",
            keys: WIDTH_KEYS,
            arity: Arity::ExactlyOne,
            forbidden_pairs: GROUND_PAIR,
        }],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::UpsetOvalGroove),
        required: &[R1, R2, R3, DEPTH, USABLE_WIDTH, PAD_ANGLE],
        optional: &[],
        rule: "",
        groups: &[],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::RoundGroove),
        required: &[R1, PAD_ANGLE],
        optional: &[R2, DEPTH, USABLE_WIDTH],
        rule: "Exactly two of the Optional Parameters must be set",
        groups: TWO_OF_ROUND,
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::FalseRoundGroove),
        required: &[R1, PAD_ANGLE],
        optional: &[
            R2,
            DEPTH,
            USABLE_WIDTH,
            FLANK_ANGLE,
            FLANK_WIDTH,
            FLANK_HEIGHT,
            FLANK_LENGTH,
        ],
        rule: "Exactly two of R2, Depth or Usable Width must be set. \
               Exactly one of Flank Angle, Width, Height or Length must be set.",
        groups: &[
            ArityGroup {
                name: "Geometry",
                keys: ROUND_KEYS,
                arity: Arity::ExactlyTwo,
                forbidden_pairs: &[],
            },
            ArityGroup {
                name: "Flank",
                keys: FLANK_KEYS,
                arity: Arity::ExactlyOne,
                forbidden_pairs: &[],
            },
        ],
        advisories: &[],
    },
    GrooveSchema {
        family: Some(GrooveFamily::FlatGroove),
        required: &[R1, BARREL_USABLE_WIDTH, PAD_ANGLE],
        optional: &[],
        rule: "",
        groups: &[],
        advisories: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_laid_out_in_family_order() {
        for (i, family) in GrooveFamily::ALL.into_iter().enumerate() {
            assert_eq!(CATALOG[i].family, Some(family));
            assert_eq!(family.schema().family, Some(family));
        }
    }

    #[test]
    fn unknown_family_yields_empty_schema() {
        let schema = schema_for("HexagonGroove");
        assert!(schema.is_empty());
        assert_eq!(schema.rule, "");
        assert!(schema.groups.is_empty());
    }

    #[test]
    fn family_ids_round_trip() {
        for family in GrooveFamily::ALL {
            assert_eq!(family.id().parse::<GrooveFamily>().unwrap(), family);
            assert_eq!(schema_for(family.id()).family, Some(family));
        }
    }

    #[test]
    fn group_keys_are_optional_parameters() {
        for family in GrooveFamily::ALL {
            let schema = family.schema();
            for group in schema.groups {
                for key in group.keys {
                    assert!(schema.is_optional(*key), "{family} {key}");
                }
                for (a, b) in group.forbidden_pairs {
                    assert!(group.keys.contains(a) && group.keys.contains(b));
                }
            }
        }
    }

    #[test]
    fn required_and_optional_are_disjoint() {
        for family in GrooveFamily::ALL {
            let schema = family.schema();
            for spec in schema.optional {
                assert!(!schema.is_required(spec.key), "{family} {}", spec.key);
            }
        }
    }

    #[test]
    fn labels_fall_back_to_key() {
        let schema = GrooveFamily::RoundGroove.schema();
        assert_eq!(schema.label(GrooveParam::R2), "R2");
        assert_eq!(schema.label(GrooveParam::TipAngle), "tip_angle");
    }
}
