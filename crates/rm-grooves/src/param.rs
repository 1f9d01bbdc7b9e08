use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GrooveError;

/// Every named geometry parameter any groove family accepts.
///
/// Wire names are the snake_case keys the simulation engine expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrooveParam {
    R1,
    R2,
    R3,
    R4,
    Depth,
    Indent,
    PadAngle,
    UsableWidth,
    GroundWidth,
    EvenGroundWidth,
    FlankAngle,
    FlankWidth,
    FlankHeight,
    FlankLength,
    TipDepth,
    TipAngle,
}

impl GrooveParam {
    pub const ALL: [GrooveParam; 16] = [
        GrooveParam::R1,
        GrooveParam::R2,
        GrooveParam::R3,
        GrooveParam::R4,
        GrooveParam::Depth,
        GrooveParam::Indent,
        GrooveParam::PadAngle,
        GrooveParam::UsableWidth,
        GrooveParam::GroundWidth,
        GrooveParam::EvenGroundWidth,
        GrooveParam::FlankAngle,
        GrooveParam::FlankWidth,
        GrooveParam::FlankHeight,
        GrooveParam::FlankLength,
        GrooveParam::TipDepth,
        GrooveParam::TipAngle,
    ];

    pub fn key(self) -> &'static str {
        match self {
            GrooveParam::R1 => "r1",
            GrooveParam::R2 => "r2",
            GrooveParam::R3 => "r3",
            GrooveParam::R4 => "r4",
            GrooveParam::Depth => "depth",
            GrooveParam::Indent => "indent",
            GrooveParam::PadAngle => "pad_angle",
            GrooveParam::UsableWidth => "usable_width",
            GrooveParam::GroundWidth => "ground_width",
            GrooveParam::EvenGroundWidth => "even_ground_width",
            GrooveParam::FlankAngle => "flank_angle",
            GrooveParam::FlankWidth => "flank_width",
            GrooveParam::FlankHeight => "flank_height",
            GrooveParam::FlankLength => "flank_length",
            GrooveParam::TipDepth => "tip_depth",
            GrooveParam::TipAngle => "tip_angle",
        }
    }

    /// Angles are entered in degrees, everything else is a length.
    pub fn is_angle(self) -> bool {
        matches!(
            self,
            GrooveParam::PadAngle | GrooveParam::FlankAngle | GrooveParam::TipAngle
        )
    }
}

impl fmt::Display for GrooveParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GrooveParam {
    type Err = GrooveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        GrooveParam::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| GrooveError::UnknownParam(key.to_string()))
    }
}
