use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{GrooveError, GrooveFamily, GrooveParam, GrooveSchema, schema_for};

/// The groove of one roll pass: a family plus its parameter values.
///
/// Required parameters of the family are always present. Optional ones are
/// present only while activated. Keys the family does not define never enter
/// the map.
///
/// Deactivating an optional parameter that holds a non-zero value parks the
/// value; activating it again restores it. Parked values are editing state
/// only and are never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GrooveRecord", into = "GrooveRecord")]
pub struct GrooveInstance {
    family_id: String,
    params: BTreeMap<GrooveParam, f64>,
    parked: BTreeMap<GrooveParam, f64>,
}

impl GrooveInstance {
    /// Fresh instance: required parameters at their defaults, no optional
    /// parameters active. Unknown families get an empty parameter map.
    pub fn new(family_id: &str) -> Self {
        let params = schema_for(family_id)
            .required
            .iter()
            .map(|spec| (spec.key, spec.initial_value()))
            .collect();
        Self {
            family_id: family_id.to_string(),
            params,
            parked: BTreeMap::new(),
        }
    }

    /// Rebuild an instance from stored values, rejecting keys the family
    /// does not define and filling in missing required ones.
    pub fn from_values(
        family_id: &str,
        values: impl IntoIterator<Item = (GrooveParam, f64)>,
    ) -> Result<Self, GrooveError> {
        let mut instance = Self::new(family_id);
        let schema = instance.schema();
        for (key, value) in values {
            if schema.spec(key).is_none() {
                return Err(GrooveError::IllegalParam {
                    family: family_id.to_string(),
                    key: key.key().to_string(),
                });
            }
            instance.params.insert(key, value);
        }
        Ok(instance)
    }

    pub fn family_id(&self) -> &str {
        &self.family_id
    }

    pub fn family(&self) -> Option<GrooveFamily> {
        self.family_id.parse().ok()
    }

    pub fn schema(&self) -> &'static GrooveSchema {
        schema_for(&self.family_id)
    }

    pub fn get(&self, key: GrooveParam) -> Option<f64> {
        self.params.get(&key).copied()
    }

    pub fn is_active(&self, key: GrooveParam) -> bool {
        self.params.contains_key(&key)
    }

    /// Present parameters in key order.
    pub fn params(&self) -> impl Iterator<Item = (GrooveParam, f64)> + '_ {
        self.params.iter().map(|(k, v)| (*k, *v))
    }

    pub fn active_optional(&self) -> impl Iterator<Item = GrooveParam> + '_ {
        let schema = self.schema();
        self.params.keys().copied().filter(move |k| schema.is_optional(*k))
    }

    /// Replace the value of a present parameter. Returns false (and changes
    /// nothing) when the key is not currently present.
    pub fn set(&mut self, key: GrooveParam, value: f64) -> bool {
        match self.params.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                tracing::debug!(family = %self.family_id, %key, "ignoring edit of inactive groove parameter");
                false
            }
        }
    }

    /// Activate or deactivate an optional parameter. Returns false when the
    /// key is not an optional parameter of this family.
    pub fn toggle_optional(&mut self, key: GrooveParam) -> bool {
        if !self.schema().is_optional(key) {
            tracing::debug!(family = %self.family_id, %key, "ignoring toggle of non-optional groove parameter");
            return false;
        }
        match self.params.remove(&key) {
            Some(value) => {
                if value != 0.0 {
                    self.parked.insert(key, value);
                }
            }
            None => {
                let value = self.parked.remove(&key).unwrap_or(0.0);
                self.params.insert(key, value);
            }
        }
        true
    }
}

#[derive(Serialize, Deserialize)]
struct GrooveRecord {
    #[serde(rename = "grooveType")]
    groove_type: String,
    #[serde(default)]
    groove: BTreeMap<GrooveParam, f64>,
}

impl TryFrom<GrooveRecord> for GrooveInstance {
    type Error = GrooveError;

    fn try_from(record: GrooveRecord) -> Result<Self, Self::Error> {
        GrooveInstance::from_values(&record.groove_type, record.groove)
    }
}

impl From<GrooveInstance> for GrooveRecord {
    fn from(instance: GrooveInstance) -> Self {
        GrooveRecord {
            groove_type: instance.family_id,
            groove: instance.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_populates_required_defaults() {
        let g = GrooveInstance::new("BoxGroove");
        let keys: Vec<_> = g.params().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                GrooveParam::R1,
                GrooveParam::R2,
                GrooveParam::Depth,
                GrooveParam::PadAngle
            ]
        );
        assert!(g.params().all(|(_, v)| v == 0.0));
        assert_eq!(g.active_optional().count(), 0);
    }

    #[test]
    fn unknown_family_has_no_parameters() {
        let g = GrooveInstance::new("MysteryGroove");
        assert_eq!(g.params().count(), 0);
        assert!(g.family().is_none());
        assert!(!g.clone().toggle_optional(GrooveParam::R2));
    }

    #[test]
    fn set_only_touches_present_keys() {
        let mut g = GrooveInstance::new("RoundGroove");
        assert!(g.set(GrooveParam::R1, 25.0));
        assert!(!g.set(GrooveParam::Depth, 3.0));
        assert_eq!(g.get(GrooveParam::R1), Some(25.0));
        assert_eq!(g.get(GrooveParam::Depth), None);
    }

    #[test]
    fn toggle_rejects_required_and_foreign_keys() {
        let mut g = GrooveInstance::new("BoxGroove");
        let before = g.clone();
        assert!(!g.toggle_optional(GrooveParam::R1));
        assert!(!g.toggle_optional(GrooveParam::TipAngle));
        assert_eq!(g, before);
    }

    #[test]
    fn toggle_restores_parked_value() {
        let mut g = GrooveInstance::new("BoxGroove");
        g.toggle_optional(GrooveParam::UsableWidth);
        g.set(GrooveParam::UsableWidth, 70.0);
        let before = g.clone();

        g.toggle_optional(GrooveParam::UsableWidth);
        assert!(!g.is_active(GrooveParam::UsableWidth));
        g.toggle_optional(GrooveParam::UsableWidth);
        assert_eq!(g.get(GrooveParam::UsableWidth), Some(70.0));
        assert_eq!(g, before);
    }

    #[test]
    fn from_values_rejects_illegal_keys() {
        let err = GrooveInstance::from_values("RoundGroove", [(GrooveParam::TipAngle, 90.0)])
            .unwrap_err();
        assert!(matches!(err, GrooveError::IllegalParam { .. }));
    }

    #[test]
    fn from_values_fills_missing_required() {
        let g = GrooveInstance::from_values("RoundGroove", [(GrooveParam::R2, 4.0)]).unwrap();
        assert_eq!(g.get(GrooveParam::R1), Some(0.0));
        assert_eq!(g.get(GrooveParam::PadAngle), Some(0.0));
        assert_eq!(g.get(GrooveParam::R2), Some(4.0));
    }

    #[test]
    fn serializes_as_groove_type_and_groove_map() {
        let mut g = GrooveInstance::new("RoundGroove");
        g.set(GrooveParam::R1, 12.5);
        g.toggle_optional(GrooveParam::Depth);
        g.set(GrooveParam::Depth, 3.0);
        g.toggle_optional(GrooveParam::Depth);

        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["grooveType"], "RoundGroove");
        assert_eq!(json["groove"]["r1"], 12.5);
        assert!(json["groove"].get("depth").is_none());
    }

    #[test]
    fn deserialization_validates_keys() {
        let ok: GrooveInstance = serde_json::from_str(
            r#"{"grooveType": "FlatOvalGroove", "groove": {"r1": 1, "usable_width": 40}}"#,
        )
        .unwrap();
        assert_eq!(ok.get(GrooveParam::UsableWidth), Some(40.0));

        let bad = serde_json::from_str::<GrooveInstance>(
            r#"{"grooveType": "FlatOvalGroove", "groove": {"flank_angle": 30}}"#,
        );
        assert!(bad.is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn family() -> impl Strategy<Value = GrooveFamily> {
        prop::sample::select(GrooveFamily::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn toggle_twice_is_identity(
            family in family(),
            setup in prop::collection::vec((0usize..16, -100.0_f64..100.0), 0..8),
            key_index in 0usize..16,
        ) {
            let mut g = GrooveInstance::new(family.id());
            for (i, value) in setup {
                let key = GrooveParam::ALL[i];
                g.toggle_optional(key);
                g.set(key, value);
            }
            let before = g.clone();
            let key = GrooveParam::ALL[key_index];
            g.toggle_optional(key);
            g.toggle_optional(key);
            prop_assert_eq!(g, before);
        }

        #[test]
        fn only_schema_keys_ever_present(
            family in family(),
            ops in prop::collection::vec(0usize..16, 0..12),
        ) {
            let mut g = GrooveInstance::new(family.id());
            for i in ops {
                g.toggle_optional(GrooveParam::ALL[i]);
            }
            let schema = family.schema();
            for spec in schema.required {
                prop_assert!(g.is_active(spec.key));
            }
            for (key, _) in g.params() {
                prop_assert!(schema.spec(key).is_some());
            }
        }
    }
}
