//! One row of the mill layout.

use core::fmt;

use rm_core::units::{Length, Time, symbols};
use rm_core::{UnitId, m, resolve, s};
use rm_grooves::{GrooveFamily, GrooveInstance};
use serde::{Deserialize, Serialize};
use uom::si::length::meter;
use uom::si::time::second;

use crate::unit_schema::{DURATION, FieldKind, GROOVE_TYPE, LABEL, LENGTH, UnitSchema, UnitType};

/// A numeric cell. Holds the typed text while the user is still editing and
/// a plain number once the edit is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Value(f64),
    Draft(String),
}

impl Default for NumericInput {
    fn default() -> Self {
        NumericInput::Value(0.0)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Value(value)
    }
}

impl NumericInput {
    /// Current numeric value; drafts resolve leniently.
    pub fn value(&self) -> f64 {
        match self {
            NumericInput::Value(v) => *v,
            NumericInput::Draft(text) => resolve(text),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            NumericInput::Draft(text) => Some(text),
            NumericInput::Value(_) => None,
        }
    }

    pub fn is_nonzero(&self) -> bool {
        self.value() != 0.0
    }

    /// Replace a draft by its resolved value.
    pub fn commit(&mut self) {
        if let NumericInput::Draft(text) = self {
            *self = NumericInput::Value(resolve(text));
        }
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericInput::Value(v) => write!(f, "{v}"),
            NumericInput::Draft(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwoRollOrientation {
    #[default]
    Horizontal,
    Vertical,
}

impl TwoRollOrientation {
    pub fn as_str(self) -> &'static str {
        match self {
            TwoRollOrientation::Horizontal => "horizontal",
            TwoRollOrientation::Vertical => "vertical",
        }
    }

    fn from_option(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(TwoRollOrientation::Horizontal),
            "vertical" => Some(TwoRollOrientation::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreeRollOrientation {
    #[default]
    Y,
    AntiY,
}

impl ThreeRollOrientation {
    pub fn as_str(self) -> &'static str {
        match self {
            ThreeRollOrientation::Y => "Y",
            ThreeRollOrientation::AntiY => "AntiY",
        }
    }

    fn from_option(value: &str) -> Option<Self> {
        match value {
            "Y" => Some(ThreeRollOrientation::Y),
            "AntiY" => Some(ThreeRollOrientation::AntiY),
            _ => None,
        }
    }
}

/// How a transport or cooling section is sized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefineBy {
    #[default]
    Length,
    Duration,
}

/// A section size with its physical dimension attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    Length(Length),
    Duration(Time),
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Span::Length(l) => write!(f, "{} {}", l.get::<meter>(), symbols::METER),
            Span::Duration(t) => write!(f, "{} {}", t.get::<second>(), symbols::SECOND),
        }
    }
}

impl DefineBy {
    pub fn as_str(self) -> &'static str {
        match self {
            DefineBy::Length => LENGTH,
            DefineBy::Duration => DURATION,
        }
    }

    pub fn unit_symbol(self) -> &'static str {
        match self {
            DefineBy::Length => symbols::METER,
            DefineBy::Duration => symbols::SECOND,
        }
    }

    pub fn span(self, value: f64) -> Span {
        match self {
            DefineBy::Length => Span::Length(m(value)),
            DefineBy::Duration => Span::Duration(s(value)),
        }
    }

    fn from_option(value: &str) -> Option<Self> {
        match value {
            LENGTH => Some(DefineBy::Length),
            DURATION => Some(DefineBy::Duration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoRollPassFields {
    #[serde(default)]
    pub gap: NumericInput,
    #[serde(default)]
    pub nominal_radius: NumericInput,
    #[serde(default)]
    pub velocity: NumericInput,
    #[serde(default)]
    pub coulomb_friction_coefficient: NumericInput,
    #[serde(default)]
    pub orientation: TwoRollOrientation,
    #[serde(flatten)]
    pub groove: GrooveInstance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeRollPassFields {
    #[serde(default)]
    pub inscribed_circle_diameter: NumericInput,
    #[serde(default)]
    pub nominal_radius: NumericInput,
    #[serde(default)]
    pub velocity: NumericInput,
    #[serde(default)]
    pub coulomb_friction_coefficient: NumericInput,
    #[serde(default)]
    pub orientation: ThreeRollOrientation,
    #[serde(flatten)]
    pub groove: GrooveInstance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportFields {
    #[serde(rename = "transportDefineBy", default)]
    pub define_by: DefineBy,
    #[serde(rename = "transportValue", default)]
    pub value: NumericInput,
    #[serde(default)]
    pub environment_temperature: NumericInput,
    #[serde(default)]
    pub heat_transfer_coefficient: NumericInput,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoolingPipeFields {
    #[serde(rename = "coolingDefineBy", default)]
    pub define_by: DefineBy,
    #[serde(rename = "coolingValue", default)]
    pub value: NumericInput,
    #[serde(default)]
    pub inner_radius: NumericInput,
    #[serde(default)]
    pub coolant_temperature: NumericInput,
    #[serde(default)]
    pub coolant_volume_flux: NumericInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UnitBody {
    TwoRollPass(TwoRollPassFields),
    ThreeRollPass(ThreeRollPassFields),
    Transport(TransportFields),
    CoolingPipe(CoolingPipeFields),
}

impl UnitBody {
    /// Initial fields for a freshly typed row.
    pub fn defaults(unit_type: UnitType) -> Self {
        match unit_type {
            UnitType::TwoRollPass => UnitBody::TwoRollPass(TwoRollPassFields {
                gap: NumericInput::default(),
                nominal_radius: NumericInput::default(),
                velocity: NumericInput::default(),
                coulomb_friction_coefficient: NumericInput::default(),
                orientation: TwoRollOrientation::default(),
                groove: GrooveInstance::new(GrooveFamily::BoxGroove.id()),
            }),
            UnitType::ThreeRollPass => UnitBody::ThreeRollPass(ThreeRollPassFields {
                inscribed_circle_diameter: NumericInput::default(),
                nominal_radius: NumericInput::default(),
                velocity: NumericInput::default(),
                coulomb_friction_coefficient: NumericInput::default(),
                orientation: ThreeRollOrientation::default(),
                groove: GrooveInstance::new(GrooveFamily::RoundGroove.id()),
            }),
            UnitType::Transport => UnitBody::Transport(TransportFields::default()),
            UnitType::CoolingPipe => UnitBody::CoolingPipe(CoolingPipeFields::default()),
        }
    }

    pub fn unit_type(&self) -> UnitType {
        match self {
            UnitBody::TwoRollPass(_) => UnitType::TwoRollPass,
            UnitBody::ThreeRollPass(_) => UnitType::ThreeRollPass,
            UnitBody::Transport(_) => UnitType::Transport,
            UnitBody::CoolingPipe(_) => UnitType::CoolingPipe,
        }
    }
}

/// Read-only view of one field of a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(&'a NumericInput),
    Text(&'a str),
    Select(&'a str),
    Groove(&'a GrooveInstance),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassUnit {
    pub id: UnitId,
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub body: UnitBody,
}

impl PassUnit {
    pub fn new(id: UnitId, unit_type: UnitType) -> Self {
        Self {
            id,
            label: String::new(),
            body: UnitBody::defaults(unit_type),
        }
    }

    pub fn unit_type(&self) -> UnitType {
        self.body.unit_type()
    }

    pub fn schema(&self) -> &'static UnitSchema {
        self.unit_type().schema()
    }

    pub fn groove(&self) -> Option<&GrooveInstance> {
        match &self.body {
            UnitBody::TwoRollPass(f) => Some(&f.groove),
            UnitBody::ThreeRollPass(f) => Some(&f.groove),
            UnitBody::Transport(_) | UnitBody::CoolingPipe(_) => None,
        }
    }

    pub fn groove_mut(&mut self) -> Option<&mut GrooveInstance> {
        match &mut self.body {
            UnitBody::TwoRollPass(f) => Some(&mut f.groove),
            UnitBody::ThreeRollPass(f) => Some(&mut f.groove),
            UnitBody::Transport(_) | UnitBody::CoolingPipe(_) => None,
        }
    }

    pub fn numeric(&self, key: &str) -> Option<&NumericInput> {
        match (&self.body, key) {
            (UnitBody::TwoRollPass(f), "gap") => Some(&f.gap),
            (UnitBody::TwoRollPass(f), "nominal_radius") => Some(&f.nominal_radius),
            (UnitBody::TwoRollPass(f), "velocity") => Some(&f.velocity),
            (UnitBody::TwoRollPass(f), "coulomb_friction_coefficient") => {
                Some(&f.coulomb_friction_coefficient)
            }
            (UnitBody::ThreeRollPass(f), "inscribed_circle_diameter") => {
                Some(&f.inscribed_circle_diameter)
            }
            (UnitBody::ThreeRollPass(f), "nominal_radius") => Some(&f.nominal_radius),
            (UnitBody::ThreeRollPass(f), "velocity") => Some(&f.velocity),
            (UnitBody::ThreeRollPass(f), "coulomb_friction_coefficient") => {
                Some(&f.coulomb_friction_coefficient)
            }
            (UnitBody::Transport(f), "transportValue") => Some(&f.value),
            (UnitBody::Transport(f), "environment_temperature") => Some(&f.environment_temperature),
            (UnitBody::Transport(f), "heat_transfer_coefficient") => {
                Some(&f.heat_transfer_coefficient)
            }
            (UnitBody::CoolingPipe(f), "coolingValue") => Some(&f.value),
            (UnitBody::CoolingPipe(f), "inner_radius") => Some(&f.inner_radius),
            (UnitBody::CoolingPipe(f), "coolant_temperature") => Some(&f.coolant_temperature),
            (UnitBody::CoolingPipe(f), "coolant_volume_flux") => Some(&f.coolant_volume_flux),
            _ => None,
        }
    }

    pub fn numeric_mut(&mut self, key: &str) -> Option<&mut NumericInput> {
        match (&mut self.body, key) {
            (UnitBody::TwoRollPass(f), "gap") => Some(&mut f.gap),
            (UnitBody::TwoRollPass(f), "nominal_radius") => Some(&mut f.nominal_radius),
            (UnitBody::TwoRollPass(f), "velocity") => Some(&mut f.velocity),
            (UnitBody::TwoRollPass(f), "coulomb_friction_coefficient") => {
                Some(&mut f.coulomb_friction_coefficient)
            }
            (UnitBody::ThreeRollPass(f), "inscribed_circle_diameter") => {
                Some(&mut f.inscribed_circle_diameter)
            }
            (UnitBody::ThreeRollPass(f), "nominal_radius") => Some(&mut f.nominal_radius),
            (UnitBody::ThreeRollPass(f), "velocity") => Some(&mut f.velocity),
            (UnitBody::ThreeRollPass(f), "coulomb_friction_coefficient") => {
                Some(&mut f.coulomb_friction_coefficient)
            }
            (UnitBody::Transport(f), "transportValue") => Some(&mut f.value),
            (UnitBody::Transport(f), "environment_temperature") => {
                Some(&mut f.environment_temperature)
            }
            (UnitBody::Transport(f), "heat_transfer_coefficient") => {
                Some(&mut f.heat_transfer_coefficient)
            }
            (UnitBody::CoolingPipe(f), "coolingValue") => Some(&mut f.value),
            (UnitBody::CoolingPipe(f), "inner_radius") => Some(&mut f.inner_radius),
            (UnitBody::CoolingPipe(f), "coolant_temperature") => Some(&mut f.coolant_temperature),
            (UnitBody::CoolingPipe(f), "coolant_volume_flux") => {
                Some(&mut f.coolant_volume_flux)
            }
            _ => None,
        }
    }

    /// Current option of a select field.
    pub fn select(&self, key: &str) -> Option<&str> {
        match (&self.body, key) {
            (UnitBody::TwoRollPass(f), "orientation") => Some(f.orientation.as_str()),
            (UnitBody::ThreeRollPass(f), "orientation") => Some(f.orientation.as_str()),
            (UnitBody::TwoRollPass(f), GROOVE_TYPE) => Some(f.groove.family_id()),
            (UnitBody::ThreeRollPass(f), GROOVE_TYPE) => Some(f.groove.family_id()),
            (UnitBody::Transport(f), "transportDefineBy") => Some(f.define_by.as_str()),
            (UnitBody::CoolingPipe(f), "coolingDefineBy") => Some(f.define_by.as_str()),
            _ => None,
        }
    }

    /// Set an orientation or define-by selector. Returns false when the key is
    /// not such a field or the option is not offered. The groove type is
    /// changed through [`PassUnit::change_groove_type`].
    pub fn set_select(&mut self, key: &str, option: &str) -> bool {
        let applied = match (&mut self.body, key) {
            (UnitBody::TwoRollPass(f), "orientation") => TwoRollOrientation::from_option(option)
                .map(|o| f.orientation = o)
                .is_some(),
            (UnitBody::ThreeRollPass(f), "orientation") => {
                ThreeRollOrientation::from_option(option)
                    .map(|o| f.orientation = o)
                    .is_some()
            }
            (UnitBody::Transport(f), "transportDefineBy") => DefineBy::from_option(option)
                .map(|d| f.define_by = d)
                .is_some(),
            (UnitBody::CoolingPipe(f), "coolingDefineBy") => DefineBy::from_option(option)
                .map(|d| f.define_by = d)
                .is_some(),
            _ => false,
        };
        if !applied {
            tracing::debug!(unit = %self.id, key, option, "ignoring unsupported select value");
        }
        applied
    }

    /// Replace the groove with a fresh instance of `family_id`. Returns false
    /// for units without a groove.
    pub fn change_groove_type(&mut self, family_id: &str) -> bool {
        match self.groove_mut() {
            Some(groove) => {
                *groove = GrooveInstance::new(family_id);
                true
            }
            None => false,
        }
    }

    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        let spec = self.schema().field(key)?;
        match spec.kind {
            FieldKind::Number => self.numeric(key).map(FieldValue::Number),
            FieldKind::Text => (key == LABEL).then_some(FieldValue::Text(&self.label)),
            FieldKind::Select => self.select(key).map(FieldValue::Select),
            FieldKind::Groove => self.groove().map(FieldValue::Groove),
        }
    }

    /// Numeric fields in schema order.
    pub fn numeric_fields(&self) -> impl Iterator<Item = (&'static str, &NumericInput)> + '_ {
        self.schema()
            .fields
            .iter()
            .filter(|spec| spec.kind == FieldKind::Number)
            .filter_map(|spec| self.numeric(spec.key).map(|v| (spec.key, v)))
    }

    /// Display unit of a field, following its selector where it has one.
    pub fn unit_label(&self, key: &str) -> &'static str {
        let Some(spec) = self.schema().field(key) else {
            return "";
        };
        match spec.unit_selector() {
            Some(_) => match &self.body {
                UnitBody::Transport(f) => f.define_by.unit_symbol(),
                UnitBody::CoolingPipe(f) => f.define_by.unit_symbol(),
                _ => spec.unit,
            },
            None => spec.unit,
        }
    }

    /// Size of a transport or cooling section with its dimension.
    pub fn span(&self) -> Option<Span> {
        match &self.body {
            UnitBody::Transport(f) => Some(f.define_by.span(f.value.value())),
            UnitBody::CoolingPipe(f) => Some(f.define_by.span(f.value.value())),
            _ => None,
        }
    }

    pub fn commit_all(&mut self) {
        let keys: Vec<&'static str> = self.numeric_fields().map(|(k, _)| k).collect();
        for key in keys {
            if let Some(slot) = self.numeric_mut(key) {
                slot.commit();
            }
        }
    }
}
