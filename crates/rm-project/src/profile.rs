//! The workpiece entering the first unit.

use core::f64::consts::PI;

use rm_core::units::{Area, Temperature};
use rm_core::{k, m2};
use serde::{Deserialize, Serialize};

/// Cross-section of the incoming profile. Lengths in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ProfileShape {
    Round {
        diameter: f64,
    },
    Square {
        side: f64,
        #[serde(default)]
        corner_radius: f64,
    },
    Box {
        height: f64,
        width: f64,
        #[serde(default)]
        corner_radius: f64,
    },
    Hexagon {
        side: f64,
        #[serde(default)]
        corner_radius: f64,
    },
}

impl ProfileShape {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileShape::Round { .. } => "round",
            ProfileShape::Square { .. } => "square",
            ProfileShape::Box { .. } => "box",
            ProfileShape::Hexagon { .. } => "hexagon",
        }
    }

    /// Geometry values that must be strictly positive, by wire name.
    pub fn dimensions(&self) -> Vec<(&'static str, f64)> {
        match *self {
            ProfileShape::Round { diameter } => vec![("diameter", diameter)],
            ProfileShape::Square { side, .. } | ProfileShape::Hexagon { side, .. } => {
                vec![("side", side)]
            }
            ProfileShape::Box { height, width, .. } => vec![("height", height), ("width", width)],
        }
    }

    pub fn corner_radius(&self) -> Option<f64> {
        match *self {
            ProfileShape::Round { .. } => None,
            ProfileShape::Square { corner_radius, .. }
            | ProfileShape::Box { corner_radius, .. }
            | ProfileShape::Hexagon { corner_radius, .. } => Some(corner_radius),
        }
    }

    /// Cross-section area with rounded corners taken off.
    pub fn area(&self) -> Area {
        // Area lost when rounding one corner of interior angle `alpha`.
        fn corner_loss(r: f64, alpha: f64) -> f64 {
            r * r * (1.0 / (alpha / 2.0).tan() - (PI - alpha) / 2.0)
        }

        let value = match *self {
            ProfileShape::Round { diameter } => PI * diameter * diameter / 4.0,
            ProfileShape::Square {
                side,
                corner_radius,
            } => side * side - 4.0 * corner_loss(corner_radius, PI / 2.0),
            ProfileShape::Box {
                height,
                width,
                corner_radius,
            } => height * width - 4.0 * corner_loss(corner_radius, PI / 2.0),
            ProfileShape::Hexagon {
                side,
                corner_radius,
            } => {
                1.5 * 3f64.sqrt() * side * side - 6.0 * corner_loss(corner_radius, 2.0 * PI / 3.0)
            }
        };
        m2(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    C20,
    C45,
    S355j2,
    B10,
    #[serde(rename = "BST500")]
    Bst500,
    #[serde(rename = "11MnS30")]
    Mn11S30,
    Other,
}

impl Material {
    pub const ALL: [Material; 7] = [
        Material::C20,
        Material::C45,
        Material::S355j2,
        Material::B10,
        Material::Bst500,
        Material::Mn11S30,
        Material::Other,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Material::C20 => "C20",
            Material::C45 => "C45",
            Material::S355j2 => "S355j2",
            Material::B10 => "B10",
            Material::Bst500 => "BST500",
            Material::Mn11S30 => "11MnS30",
            Material::Other => "Other",
        }
    }
}

/// Freiberg flow-stress coefficients for materials the engine does not know.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreibergParams {
    #[serde(default)]
    pub a: f64,
    #[serde(default)]
    pub m1: f64,
    #[serde(default)]
    pub m2: f64,
    #[serde(default)]
    pub m3: f64,
    #[serde(default)]
    pub m4: f64,
    #[serde(default)]
    pub m5: f64,
    #[serde(default)]
    pub m6: f64,
    #[serde(default)]
    pub m7: f64,
    #[serde(default)]
    pub m8: f64,
    #[serde(default)]
    pub m9: f64,
    #[serde(rename = "baseStrain", default = "default_base")]
    pub base_strain: f64,
    #[serde(rename = "baseStrainRate", default = "default_base")]
    pub base_strain_rate: f64,
}

fn default_base() -> f64 {
    0.1
}

impl Default for FreibergParams {
    fn default() -> Self {
        Self {
            a: 0.0,
            m1: 0.0,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
            m5: 0.0,
            m6: 0.0,
            m7: 0.0,
            m8: 0.0,
            m9: 0.0,
            base_strain: default_base(),
            base_strain_rate: default_base(),
        }
    }
}

impl FreibergParams {
    pub fn values(&self) -> [(&'static str, f64); 12] {
        [
            ("a", self.a),
            ("m1", self.m1),
            ("m2", self.m2),
            ("m3", self.m3),
            ("m4", self.m4),
            ("m5", self.m5),
            ("m6", self.m6),
            ("m7", self.m7),
            ("m8", self.m8),
            ("m9", self.m9),
            ("baseStrain", self.base_strain),
            ("baseStrainRate", self.base_strain_rate),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InProfile {
    #[serde(flatten)]
    pub shape: ProfileShape,
    /// Kelvin.
    pub temperature: f64,
    #[serde(default)]
    pub strain: f64,
    /// kg/m³.
    pub density: f64,
    /// J/(kg·K).
    pub specific_heat_capacity: f64,
    /// W/(m·K).
    pub thermal_conductivity: f64,
    pub material: Material,
    #[serde(
        rename = "materialType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub material_type: Option<String>,
    #[serde(
        rename = "flowStressParams",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub flow_stress: Option<FreibergParams>,
}

impl Default for InProfile {
    fn default() -> Self {
        Self {
            shape: ProfileShape::Round { diameter: 0.03 },
            temperature: 1473.15,
            strain: 0.0,
            density: 7850.0,
            specific_heat_capacity: 690.0,
            thermal_conductivity: 23.0,
            material: Material::C45,
            material_type: None,
            flow_stress: None,
        }
    }
}

impl InProfile {
    pub fn temperature(&self) -> Temperature {
        k(self.temperature)
    }

    /// Thermal properties that must be strictly positive, by wire name.
    pub fn thermal_properties(&self) -> [(&'static str, f64); 4] {
        [
            ("temperature", self.temperature),
            ("density", self.density),
            ("specific_heat_capacity", self.specific_heat_capacity),
            ("thermal_conductivity", self.thermal_conductivity),
        ]
    }
}
