//! Unit systems and conversion
//!
//! The form accepts either metric (cm / kg) or imperial (ft+in / st+lb)
//! input. Everything downstream of this module works in centimeters and
//! kilograms; imperial values are converted here and converted back only
//! for display.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::MeasurementState;

/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Kilograms per avoirdupois pound
pub const KG_PER_POUND: f64 = 0.45359237;

/// Pounds per kilogram, as used for display conversion
pub const POUNDS_PER_KG: f64 = 2.20462;

/// Pounds per stone
pub const POUNDS_PER_STONE: f64 = 14.0;

// ============================================================================
// Unit System
// ============================================================================

/// Which set of fields is active and which conversion path runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn is_metric(&self) -> bool {
        matches!(self, UnitSystem::Metric)
    }

    /// Lowercase name, as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "uk" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

// ============================================================================
// Conversion to canonical metric
// ============================================================================

/// Height and weight in canonical units
///
/// A measurement is `None` when none of its components were entered.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricMeasurements {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

/// Convert feet and inches to centimeters
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    (feet * INCHES_PER_FOOT + inches) * CM_PER_INCH
}

/// Convert stone and pounds to kilograms
pub fn stone_pounds_to_kg(stone: f64, pounds: f64) -> f64 {
    (stone * POUNDS_PER_STONE + pounds) * KG_PER_POUND
}

/// Combine a primary and secondary component, treating a missing half as 0
/// only when the other half is present.
fn combine(primary: Option<f64>, secondary: Option<f64>, f: fn(f64, f64) -> f64) -> Option<f64> {
    match (primary, secondary) {
        (None, None) => None,
        (p, s) => Some(f(p.unwrap_or(0.0), s.unwrap_or(0.0))),
    }
}

/// Convert the raw measurement slots to centimeters and kilograms
pub fn to_metric(state: &MeasurementState, unit_system: UnitSystem) -> MetricMeasurements {
    match unit_system {
        UnitSystem::Metric => MetricMeasurements {
            height_cm: state.height_primary,
            weight_kg: state.weight_primary,
        },
        UnitSystem::Imperial => MetricMeasurements {
            height_cm: combine(state.height_primary, state.height_secondary, feet_inches_to_cm),
            weight_kg: combine(state.weight_primary, state.weight_secondary, stone_pounds_to_kg),
        },
    }
}

// ============================================================================
// Stone / Pounds display helper
// ============================================================================

/// A weight expressed as whole stone plus whole pounds, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StonePounds {
    pub stone: u32,
    pub pounds: u32,
}

impl StonePounds {
    /// Convert kilograms to stone and pounds.
    ///
    /// Pounds are rounded half-up. A remainder that rounds to 14 carries
    /// into the next stone, so the result never reads "14lbs".
    pub fn from_kg(kg: f64) -> Self {
        let total_lbs = (kg * POUNDS_PER_KG).max(0.0);
        let mut stone = (total_lbs / POUNDS_PER_STONE).floor();
        let mut pounds = round_half_up(total_lbs - stone * POUNDS_PER_STONE);

        if pounds >= POUNDS_PER_STONE {
            stone += 1.0;
            pounds = 0.0;
        }

        Self {
            stone: stone as u32,
            pounds: pounds as u32,
        }
    }
}

impl fmt::Display for StonePounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}st {}lbs", self.stone, self.pounds)
    }
}

/// Round to the nearest integer, ties toward positive infinity
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    // `value - floor` is exact, unlike `value + 0.5`
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
