//! The in-memory document a front end edits.

use rm_core::UnitId;
use rm_grooves::{Evaluation, evaluate_instance};
use rm_project::{PassDesign, PassSequence, PassUnit, SubmitIssue, UnitType, submit_issues};
use tracing::debug;

use crate::engine::{SimulationEngine, SimulationOutcome, submit};
use crate::error::{AppError, AppResult};
use crate::normalizer;

/// What a single-unit edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    Unchanged,
    Removed,
}

/// Exclusive owner of one pass design while it is being edited.
///
/// Unit ids are handed out in increasing order and never reused, even after
/// the unit holding the highest id is removed.
#[derive(Debug, Clone)]
pub struct PassDesignSession {
    design: PassDesign,
    next_id: UnitId,
}

impl PassDesignSession {
    pub fn new(design: PassDesign) -> AppResult<Self> {
        let next_id = match design.units.max_id() {
            Some(max) => max.next()?,
            None => UnitId::first(),
        };
        Ok(Self { design, next_id })
    }

    pub fn design(&self) -> &PassDesign {
        &self.design
    }

    pub fn into_design(self) -> PassDesign {
        self.design
    }

    pub fn units(&self) -> &PassSequence {
        &self.design.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&PassUnit> {
        self.design.units.get(id)
    }

    /// Append a unit of `unit_type` with its default fields.
    pub fn add_unit(&mut self, unit_type: UnitType) -> AppResult<UnitId> {
        let id = self.next_id;
        self.next_id = id.next()?;
        self.design.units.push(PassUnit::new(id, unit_type));
        debug!(%id, %unit_type, "added unit");
        Ok(id)
    }

    /// Remove a unit. The last remaining unit cannot be removed; an unknown
    /// id is ignored.
    pub fn remove_unit(&mut self, id: UnitId) -> AppResult<()> {
        if self.design.units.get(id).is_none() {
            debug!(%id, "ignoring removal of unknown unit");
            return Ok(());
        }
        if self.design.units.len() <= 1 {
            return Err(AppError::LastUnit);
        }
        self.design.units.remove(id);
        Ok(())
    }

    pub fn change_unit_type(&mut self, id: UnitId, new_type: UnitType) {
        normalizer::change_unit_type(&mut self.design.units, id, new_type);
    }

    pub fn change_groove_type(&mut self, id: UnitId, family_id: &str) {
        normalizer::change_groove_type(&mut self.design.units, id, family_id);
    }

    pub fn set_field(&mut self, id: UnitId, key: &str, raw: &str) {
        normalizer::set_field(&mut self.design.units, id, key, raw);
    }

    pub fn commit_field(&mut self, id: UnitId, key: &str) {
        normalizer::commit_field(&mut self.design.units, id, key);
    }

    pub fn toggle_optional_groove_param(&mut self, id: UnitId, key: &str) {
        normalizer::toggle_optional_groove_param(&mut self.design.units, id, key);
    }

    pub fn set_groove_param(&mut self, id: UnitId, key: &str, raw: &str) {
        normalizer::set_groove_param(&mut self.design.units, id, key, raw);
    }

    /// Run `edit` against an existing unit and report what happened to it.
    pub fn edit_unit(
        &mut self,
        id: UnitId,
        edit: impl FnOnce(&mut Self, UnitId) -> AppResult<()>,
    ) -> AppResult<EditOutcome> {
        let before = self.unit(id).cloned().ok_or(AppError::UnitNotFound(id))?;
        edit(self, id)?;
        let outcome = match self.unit(id) {
            None => EditOutcome::Removed,
            Some(after) if *after == before => EditOutcome::Unchanged,
            Some(_) => EditOutcome::Updated,
        };
        debug!(%id, ?outcome, "edited unit");
        Ok(outcome)
    }

    /// Commit every pending numeric edit.
    pub fn commit_all(&mut self) {
        let ids: Vec<UnitId> = self.design.units.iter().map(|u| u.id).collect();
        for id in ids {
            if let Some(unit) = self.design.units.get_mut(id) {
                unit.commit_all();
            }
        }
    }

    /// Live constraint status of a unit's groove.
    pub fn groove_status(&self, id: UnitId) -> Option<Evaluation> {
        self.unit(id)?.groove().map(evaluate_instance)
    }

    pub fn issues(&self) -> Vec<SubmitIssue> {
        submit_issues(&self.design)
    }

    pub fn submit(&self, engine: &dyn SimulationEngine) -> AppResult<SimulationOutcome> {
        submit(&self.design, engine)
    }
}
