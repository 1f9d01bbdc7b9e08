use rm_core::m2;
use rm_core::units::Area;
use serde::{Deserialize, Serialize};

/// How the engine resolves roll velocities along the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "solve_method", content = "solve_params", rename_all = "snake_case")]
pub enum SolveMethod {
    /// Velocities as given per unit.
    Solve {},
    /// Propagate from the velocity of the incoming profile.
    SolveForward { in_velocity: f64 },
    /// Propagate back from the finished profile.
    SolveBackward {
        out_cross_section: f64,
        out_velocity: f64,
    },
}

impl Default for SolveMethod {
    fn default() -> Self {
        SolveMethod::Solve {}
    }
}

impl SolveMethod {
    pub fn forward() -> Self {
        SolveMethod::SolveForward { in_velocity: 1.0 }
    }

    pub fn backward() -> Self {
        SolveMethod::SolveBackward {
            out_cross_section: 100.0,
            out_velocity: 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SolveMethod::Solve {} => "solve",
            SolveMethod::SolveForward { .. } => "solve_forward",
            SolveMethod::SolveBackward { .. } => "solve_backward",
        }
    }

    /// Parameters by wire name.
    pub fn params(&self) -> Vec<(&'static str, f64)> {
        match *self {
            SolveMethod::Solve {} => Vec::new(),
            SolveMethod::SolveForward { in_velocity } => vec![("in_velocity", in_velocity)],
            SolveMethod::SolveBackward {
                out_cross_section,
                out_velocity,
            } => vec![
                ("out_cross_section", out_cross_section),
                ("out_velocity", out_velocity),
            ],
        }
    }

    /// Requested area of the finished profile.
    pub fn out_cross_section(&self) -> Option<Area> {
        match *self {
            SolveMethod::SolveBackward {
                out_cross_section, ..
            } => Some(m2(out_cross_section)),
            _ => None,
        }
    }
}
