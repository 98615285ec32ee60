//! Input validation
//!
//! Classifies the raw text of a field. Validation is pure: whether a
//! "required" error is actually shown depends on the touched flag, which
//! the caller owns.

use crate::errors::FieldError;
use crate::models::Field;

/// Closed numeric range accepted by a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Field {
    pub fn range(&self) -> FieldRange {
        let (min, max) = match self {
            Field::HeightCm => (30.0, 250.0),
            Field::WeightKg => (1.0, 400.0),
            Field::HeightFeet => (1.0, 8.0),
            Field::HeightInches => (0.0, 11.0),
            Field::WeightStone => (1.0, 63.0),
            Field::WeightPounds => (0.0, 13.0),
        };
        FieldRange { min, max }
    }

    /// Message shown when a value falls outside [`Field::range`]
    pub fn range_message(&self) -> String {
        let kind = if self.is_height() { "height" } else { "weight" };
        let range = self.range();
        format!(
            "Please enter a valid {}. ({}-{} {})",
            kind,
            range.min,
            range.max,
            self.unit_abbreviation()
        )
    }
}

/// Result of parsing raw field text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedInput {
    Blank,
    Number(f64),
    Invalid,
}

/// Parse raw text as a finite number. Surrounding whitespace is ignored.
pub fn parse_input(raw: &str) -> ParsedInput {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedInput::Blank;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => ParsedInput::Number(value),
        _ => ParsedInput::Invalid,
    }
}

/// Validate the raw text of a field.
///
/// Returns the parsed value (`None` for an optional field left blank).
pub fn validate(field: Field, raw: &str) -> Result<Option<f64>, FieldError> {
    match parse_input(raw) {
        ParsedInput::Blank if field.is_required() => Err(FieldError::MissingRequiredField),
        ParsedInput::Blank => Ok(None),
        ParsedInput::Invalid => Err(FieldError::NonNumericInput),
        ParsedInput::Number(value) if !field.range().contains(value) => {
            Err(FieldError::OutOfRange(field))
        }
        ParsedInput::Number(value) => Ok(Some(value)),
    }
}

/// The error to display for a field, honoring the touched gate
pub fn visible_error(field: Field, raw: &str, touched: bool) -> Option<FieldError> {
    match validate(field, raw) {
        Err(err) if err.is_touch_gated() && !touched => None,
        Err(err) => Some(err),
        Ok(_) => None,
    }
}
