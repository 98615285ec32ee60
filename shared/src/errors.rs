//! Error types for the BMI calculator

use thiserror::Error;

use crate::models::Field;
use crate::units::UnitSystem;

/// Why a field value was rejected
///
/// The `Display` text is the message shown next to the field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required.")]
    MissingRequiredField,

    #[error("Please enter a number.")]
    NonNumericInput,

    #[error("{}", .0.range_message())]
    OutOfRange(Field),
}

impl FieldError {
    /// Only a missing value waits for the field to be touched before it is
    /// shown; malformed or out-of-range values are flagged immediately.
    pub fn is_touch_gated(&self) -> bool {
        matches!(self, FieldError::MissingRequiredField)
    }

    /// Stable error code for serialized views
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::MissingRequiredField => "REQUIRED",
            FieldError::NonNumericInput => "NOT_A_NUMBER",
            FieldError::OutOfRange(_) => "OUT_OF_RANGE",
        }
    }
}

/// Misuse of the form from the hosting view
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown unit system: {0}")]
    UnknownUnitSystem(String),

    #[error("Field {field} is not shown in {active} mode")]
    InactiveField { field: Field, active: UnitSystem },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_messages() {
        assert_eq!(FieldError::MissingRequiredField.to_string(), "This field is required.");
        assert_eq!(FieldError::NonNumericInput.to_string(), "Please enter a number.");
        assert_eq!(
            FieldError::OutOfRange(Field::WeightKg).to_string(),
            "Please enter a valid weight. (1-400 kg)"
        );
    }

    #[test]
    fn test_only_required_is_touch_gated() {
        assert!(FieldError::MissingRequiredField.is_touch_gated());
        assert!(!FieldError::NonNumericInput.is_touch_gated());
        assert!(!FieldError::OutOfRange(Field::HeightCm).is_touch_gated());
    }

    #[test]
    fn test_form_error_display() {
        let err = FormError::InactiveField {
            field: Field::HeightFeet,
            active: UnitSystem::Metric,
        };
        assert_eq!(err.to_string(), "Field height_feet is not shown in metric mode");
    }
}
