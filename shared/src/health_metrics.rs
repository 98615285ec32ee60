//! BMI calculations
//!
//! Provides the BMI score, its category and the healthy weight range for a
//! given height. All functions take canonical units (cm / kg / m) and are
//! pure.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::{StonePounds, UnitSystem};

/// Lower BMI bound of the healthy range
pub const HEALTHY_BMI_MIN: f64 = 18.5;

/// Upper BMI bound of the healthy range
pub const HEALTHY_BMI_MAX: f64 = 24.9;

// ============================================================================
// BMI
// ============================================================================

/// Calculate BMI from height and weight
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Both measurements present and strictly positive
pub fn is_ready(height_cm: Option<f64>, weight_kg: Option<f64>) -> bool {
    matches!((height_cm, weight_kg), (Some(h), Some(w)) if h > 0.0 && w > 0.0)
}

/// Round to one decimal place, ties rounding away from zero.
///
/// Rounds the exact binary value of `value`, so 24.95 (stored as
/// 24.9499999...) becomes 24.9. Scaling by 10 first would round the
/// product instead and give 25.0.
pub fn round_to_one_decimal(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }

    let bits = value.abs().to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    // |value| = mantissa * 2^exp
    let (mantissa, exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exp - 1075)
    };

    let tenths = if exp >= 0 {
        // Already an integer
        return value;
    } else if exp < -120 {
        0
    } else {
        let shift = (-exp) as u32;
        let scaled = mantissa as u128 * 10;
        let whole = scaled >> shift;
        let rest = scaled & ((1u128 << shift) - 1);
        if rest >= 1u128 << (shift - 1) {
            whole + 1
        } else {
            whole
        }
    };

    let rounded = tenths as f64 / 10.0;
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    HealthyWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get a human-readable description, as in "Your BMI suggests you're ..."
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::HealthyWeight => "a healthy weight",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }
}

/// Classify a BMI value (as displayed, one decimal)
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    let bmi = round_to_one_decimal(bmi);
    if bmi < HEALTHY_BMI_MIN {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::HealthyWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

// ============================================================================
// Healthy Weight Range
// ============================================================================

/// Weights in kg that give a healthy BMI at a fixed height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthyWeightRange {
    pub min_kg: f64,
    pub max_kg: f64,
}

/// Calculate the healthy weight range for a height in meters
pub fn healthy_weight_range(height_m: f64) -> HealthyWeightRange {
    let height_m_sq = height_m * height_m;
    HealthyWeightRange {
        min_kg: HEALTHY_BMI_MIN * height_m_sq,
        max_kg: HEALTHY_BMI_MAX * height_m_sq,
    }
}

impl HealthyWeightRange {
    pub fn contains(&self, weight_kg: f64) -> bool {
        weight_kg >= self.min_kg && weight_kg <= self.max_kg
    }

    pub fn in_stone_pounds(&self) -> (StonePounds, StonePounds) {
        (StonePounds::from_kg(self.min_kg), StonePounds::from_kg(self.max_kg))
    }

    /// Format for the given unit system
    ///
    /// Metric: `56.7kgs - 76.3kgs`. Imperial: `8st 13lbs - 12st 0lbs`.
    pub fn display(&self, unit_system: UnitSystem) -> String {
        match unit_system {
            UnitSystem::Metric => format!(
                "{:.1}kgs - {:.1}kgs",
                round_to_one_decimal(self.min_kg),
                round_to_one_decimal(self.max_kg)
            ),
            UnitSystem::Imperial => {
                let (min, max) = self.in_stone_pounds();
                format!("{} - {}", min, max)
            }
        }
    }
}

// ============================================================================
// Combined result
// ============================================================================

/// Full BMI result for one height/weight pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// Full precision BMI
    pub value: f64,
    pub category: BmiCategory,
    pub healthy_range: HealthyWeightRange,
}

impl fmt::Display for BmiResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", round_to_one_decimal(self.value))
    }
}

/// Calculate BMI, category and healthy range, or `None` if not ready
pub fn calculate_bmi_result(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<BmiResult> {
    match (height_cm, weight_kg) {
        (Some(h), Some(w)) if is_ready(height_cm, weight_kg) => {
            let value = calculate_bmi(h, w);
            Some(BmiResult {
                value,
                category: classify_bmi(value),
                healthy_range: healthy_weight_range(h / 100.0),
            })
        }
        _ => None,
    }
}
