//! Data models for the BMI form

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::health_metrics::{BmiCategory, HealthyWeightRange};
use crate::units::UnitSystem;

// ============================================================================
// Fields
// ============================================================================

/// An input field of the form
///
/// Metric shows `HeightCm` and `WeightKg`; imperial shows the four
/// feet/inches/stone/pounds fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    HeightCm,
    WeightKg,
    HeightFeet,
    HeightInches,
    WeightStone,
    WeightPounds,
}

/// Storage slot a field writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    HeightPrimary,
    HeightSecondary,
    WeightPrimary,
    WeightSecondary,
}

const METRIC_FIELDS: &[Field] = &[Field::HeightCm, Field::WeightKg];
const IMPERIAL_FIELDS: &[Field] = &[
    Field::HeightFeet,
    Field::HeightInches,
    Field::WeightStone,
    Field::WeightPounds,
];

impl Field {
    pub const ALL: [Field; 6] = [
        Field::HeightCm,
        Field::WeightKg,
        Field::HeightFeet,
        Field::HeightInches,
        Field::WeightStone,
        Field::WeightPounds,
    ];

    /// Fields shown for a unit system, in display order
    pub fn for_unit_system(unit_system: UnitSystem) -> &'static [Field] {
        match unit_system {
            UnitSystem::Metric => METRIC_FIELDS,
            UnitSystem::Imperial => IMPERIAL_FIELDS,
        }
    }

    pub fn unit_system(&self) -> UnitSystem {
        match self {
            Field::HeightCm | Field::WeightKg => UnitSystem::Metric,
            _ => UnitSystem::Imperial,
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            Field::HeightCm | Field::HeightFeet => Slot::HeightPrimary,
            Field::HeightInches => Slot::HeightSecondary,
            Field::WeightKg | Field::WeightStone => Slot::WeightPrimary,
            Field::WeightPounds => Slot::WeightSecondary,
        }
    }

    /// Whether an empty value is an error.
    ///
    /// Inches and pounds may be left blank and count as zero.
    pub fn is_required(&self) -> bool {
        matches!(self.slot(), Slot::HeightPrimary | Slot::WeightPrimary)
    }

    pub fn is_height(&self) -> bool {
        matches!(self.slot(), Slot::HeightPrimary | Slot::HeightSecondary)
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::HeightCm => "height_cm",
            Field::WeightKg => "weight_kg",
            Field::HeightFeet => "height_feet",
            Field::HeightInches => "height_inches",
            Field::WeightStone => "weight_stone",
            Field::WeightPounds => "weight_pounds",
        }
    }

    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Field::HeightCm => "Height",
            Field::WeightKg => "Weight",
            Field::HeightFeet => "Height (ft)",
            Field::HeightInches => "Height (in)",
            Field::WeightStone => "Weight (st)",
            Field::WeightPounds => "Weight (lbs)",
        }
    }

    pub fn unit_abbreviation(&self) -> &'static str {
        match self {
            Field::HeightCm => "cm",
            Field::WeightKg => "kg",
            Field::HeightFeet => "ft",
            Field::HeightInches => "in",
            Field::WeightStone => "st",
            Field::WeightPounds => "lbs",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accepts the snake_case wire names and the camelCase input names
        // used by the HTML form.
        match s.trim() {
            "height_cm" | "heightCm" => Ok(Field::HeightCm),
            "weight_kg" | "weightKg" => Ok(Field::WeightKg),
            "height_feet" | "heightFeet" => Ok(Field::HeightFeet),
            "height_inches" | "heightInches" => Ok(Field::HeightInches),
            "weight_stone" | "weightSt" => Ok(Field::WeightStone),
            "weight_pounds" | "weightLbs" => Ok(Field::WeightPounds),
            _ => Err(format!("Unknown field: {}", s)),
        }
    }
}

// ============================================================================
// Measurement State
// ============================================================================

/// Parsed numeric values for the active unit system, plus touched flags
///
/// Primary slots hold cm/kg (metric) or feet/stone (imperial); secondary
/// slots hold inches/pounds and are unused in metric.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementState {
    pub height_primary: Option<f64>,
    pub height_secondary: Option<f64>,
    pub weight_primary: Option<f64>,
    pub weight_secondary: Option<f64>,
    /// Fields that have lost focus at least once since the last reset
    pub touched: HashSet<Field>,
}

impl MeasurementState {
    pub fn get(&self, slot: Slot) -> Option<f64> {
        match slot {
            Slot::HeightPrimary => self.height_primary,
            Slot::HeightSecondary => self.height_secondary,
            Slot::WeightPrimary => self.weight_primary,
            Slot::WeightSecondary => self.weight_secondary,
        }
    }

    pub fn set(&mut self, slot: Slot, value: Option<f64>) {
        let target = match slot {
            Slot::HeightPrimary => &mut self.height_primary,
            Slot::HeightSecondary => &mut self.height_secondary,
            Slot::WeightPrimary => &mut self.weight_primary,
            Slot::WeightSecondary => &mut self.weight_secondary,
        };
        *target = value;
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Mark a field as touched. Returns `true` on the first blur.
    pub fn touch(&mut self, field: Field) -> bool {
        self.touched.insert(field)
    }

    /// Clear all values and touched flags
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Derived Result
// ============================================================================

/// Output of a recompute
///
/// `bmi` holds full precision; rounding happens for display only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedResult {
    pub bmi: Option<f64>,
    pub category: Option<BmiCategory>,
    pub healthy_range: Option<HealthyWeightRange>,
}

impl DerivedResult {
    pub fn has_bmi(&self) -> bool {
        self.bmi.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_per_unit_system() {
        assert_eq!(Field::for_unit_system(UnitSystem::Metric), &[Field::HeightCm, Field::WeightKg]);
        assert_eq!(Field::for_unit_system(UnitSystem::Imperial).len(), 4);
        for field in Field::ALL {
            assert!(Field::for_unit_system(field.unit_system()).contains(&field));
        }
    }

    #[test]
    fn test_required_fields() {
        assert!(Field::HeightCm.is_required());
        assert!(Field::WeightStone.is_required());
        assert!(!Field::HeightInches.is_required());
        assert!(!Field::WeightPounds.is_required());
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("height_cm".parse::<Field>().unwrap(), Field::HeightCm);
        assert_eq!("weightLbs".parse::<Field>().unwrap(), Field::WeightPounds);
        assert_eq!("weightSt".parse::<Field>().unwrap(), Field::WeightStone);
        assert!("shoe_size".parse::<Field>().is_err());
    }

    #[test]
    fn test_slots_roundtrip() {
        let mut state = MeasurementState::default();
        state.set(Field::HeightInches.slot(), Some(9.0));
        assert_eq!(state.height_secondary, Some(9.0));
        assert_eq!(state.get(Slot::HeightSecondary), Some(9.0));
    }

    #[test]
    fn test_touch_and_reset() {
        let mut state = MeasurementState::default();
        assert!(state.touch(Field::HeightCm));
        assert!(!state.touch(Field::HeightCm));
        assert!(state.is_touched(Field::HeightCm));

        state.weight_primary = Some(70.0);
        state.reset();
        assert_eq!(state, MeasurementState::default());
    }
}
