//! Live check of which optional groove parameters are active.
//!
//! Pure functions of the current activation set: nothing is cached between
//! edits and nothing here mutates a groove.

use std::collections::BTreeSet;

use crate::{Advisory, ArityGroup, GrooveInstance, GrooveParam, GrooveSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    Valid,
    TooFew,
    TooMany,
    /// A forbidden pair is active, whatever the count.
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupEvaluation {
    pub group: &'static str,
    pub status: ConstraintStatus,
    pub active: usize,
    pub expected: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: ConstraintStatus,
    pub message: String,
    pub groups: Vec<GroupEvaluation>,
    /// Value-dependent hints; never affect `status`.
    pub warnings: Vec<String>,
}

impl Evaluation {
    pub fn is_valid(&self) -> bool {
        self.status == ConstraintStatus::Valid
    }
}

/// Evaluate an activation set against a schema.
///
/// Keys outside every arity group of the schema are not counted.
pub fn evaluate(
    schema: &GrooveSchema,
    active: impl IntoIterator<Item = GrooveParam>,
) -> Evaluation {
    let active: BTreeSet<GrooveParam> = active.into_iter().collect();
    let groups: Vec<GroupEvaluation> = schema
        .groups
        .iter()
        .map(|group| evaluate_group(schema, group, &active))
        .collect();

    let failing: Vec<&GroupEvaluation> = groups
        .iter()
        .filter(|g| g.status != ConstraintStatus::Valid)
        .collect();

    let (status, message) = match (groups.len(), failing.as_slice()) {
        (0, _) => (
            ConstraintStatus::Valid,
            "Valid: fully determined by the required parameters".to_string(),
        ),
        (1, _) => (groups[0].status, groups[0].message.clone()),
        (_, []) => (
            ConstraintStatus::Valid,
            "Valid: all parameter groups satisfied".to_string(),
        ),
        (_, failing) => {
            let detail: Vec<String> = failing
                .iter()
                .map(|g| format!("{} group: {}", g.group, g.message))
                .collect();
            (ConstraintStatus::Invalid, detail.join("; "))
        }
    };

    Evaluation {
        status,
        message,
        groups,
        warnings: Vec::new(),
    }
}

/// Evaluate a groove's current activation set and its value advisories.
pub fn evaluate_instance(instance: &GrooveInstance) -> Evaluation {
    let schema = instance.schema();
    let mut evaluation = evaluate(schema, instance.active_optional());
    for advisory in schema.advisories {
        match *advisory {
            Advisory::TipAngleOutside { low, high } => {
                if let Some(angle) = instance.get(GrooveParam::TipAngle)
                    && (low..=high).contains(&angle)
                {
                    evaluation.warnings.push(format!(
                        "Tip angle {angle}° must be below {low}° or above {high}°"
                    ));
                }
            }
        }
    }
    evaluation
}

fn evaluate_group(
    schema: &GrooveSchema,
    group: &ArityGroup,
    active: &BTreeSet<GrooveParam>,
) -> GroupEvaluation {
    let count = group.keys.iter().filter(|k| active.contains(k)).count();
    let expected = group.arity.expected();
    let names = group
        .keys
        .iter()
        .map(|k| schema.label(*k))
        .collect::<Vec<_>>()
        .join(", ");

    let forbidden = group
        .forbidden_pairs
        .iter()
        .find(|(a, b)| active.contains(a) && active.contains(b));

    let (status, message) = if let Some((a, b)) = forbidden {
        (
            ConstraintStatus::Invalid,
            format!(
                "{} and {} must not be set together",
                schema.label(*a),
                schema.label(*b)
            ),
        )
    } else {
        match expected {
            None => (
                ConstraintStatus::Valid,
                format!("Valid: {count} of {names} set (any number allowed)"),
            ),
            Some(n) if count == n => (
                ConstraintStatus::Valid,
                format!("Valid: exactly {n} of {names} set"),
            ),
            Some(n) if count < n => (
                ConstraintStatus::TooFew,
                format!("{count} of {names} set, exactly {n} required"),
            ),
            Some(n) => (
                ConstraintStatus::TooMany,
                format!("{count} of {names} set, exactly {n} required"),
            ),
        }
    };

    GroupEvaluation {
        group: group.name,
        status,
        active: count,
        expected,
        message,
    }
}
