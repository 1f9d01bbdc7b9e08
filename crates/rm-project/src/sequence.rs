use std::collections::BTreeSet;

use rm_core::UnitId;
use serde::{Deserialize, Serialize};

use crate::PassUnit;

/// Forming units in mill order, entry to exit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassSequence(Vec<PassUnit>);

impl PassSequence {
    pub fn new(units: Vec<PassUnit>) -> Self {
        Self(units)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PassUnit> {
        self.0.iter()
    }

    pub fn get(&self, id: UnitId) -> Option<&PassUnit> {
        self.0.iter().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut PassUnit> {
        self.0.iter_mut().find(|u| u.id == id)
    }

    pub fn push(&mut self, unit: PassUnit) {
        self.0.push(unit);
    }

    pub fn remove(&mut self, id: UnitId) -> Option<PassUnit> {
        let index = self.0.iter().position(|u| u.id == id)?;
        Some(self.0.remove(index))
    }

    pub fn max_id(&self) -> Option<UnitId> {
        self.0.iter().map(|u| u.id).max()
    }

    /// Ids that occur more than once, each reported once.
    pub fn duplicate_ids(&self) -> Vec<UnitId> {
        let mut seen = BTreeSet::new();
        let mut dups = BTreeSet::new();
        for unit in &self.0 {
            if !seen.insert(unit.id) {
                dups.insert(unit.id);
            }
        }
        dups.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a PassSequence {
    type Item = &'a PassUnit;
    type IntoIter = std::slice::Iter<'a, PassUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<PassUnit> for PassSequence {
    fn from_iter<I: IntoIterator<Item = PassUnit>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
