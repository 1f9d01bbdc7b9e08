//! Pass-design document.

use chrono::{DateTime, Utc};
use rm_core::UnitId;
use serde::{Deserialize, Serialize};

use crate::{InProfile, LATEST_VERSION, PassSequence, PassUnit, SolveMethod, UnitType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassDesign {
    pub version: u32,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub in_profile: InProfile,
    #[serde(default)]
    pub solve: SolveMethod,
    #[serde(default)]
    pub units: PassSequence,
}

impl PassDesign {
    /// A fresh design with a single two-roll pass.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            created_at: Utc::now(),
            in_profile: InProfile::default(),
            solve: SolveMethod::default(),
            units: PassSequence::new(vec![PassUnit::new(
                UnitId::first(),
                UnitType::TwoRollPass,
            )]),
        }
    }
}
