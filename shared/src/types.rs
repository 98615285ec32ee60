//! View snapshot types
//!
//! What the form hands to its view after every change. These are plain
//! serializable values so a host can render them directly or ship them as
//! JSON (the wasm bindings do the latter).

use serde::{Deserialize, Serialize};

use crate::health_metrics::BmiCategory;
use crate::models::Field;
use crate::units::UnitSystem;

/// One visible input field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldView {
    pub field: Field,
    pub label: String,
    /// Raw text as typed
    pub value: String,
    /// Message to show under the field, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

/// The computed score panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    /// BMI rounded to one decimal
    pub bmi: f64,
    pub bmi_display: String,
    pub category: BmiCategory,
    pub summary: String,
}

/// Everything the view needs to render the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormView {
    pub unit_system: UnitSystem,
    pub fields: Vec<FieldView>,
    /// `None` means the welcome placeholder is shown
    pub result: Option<ResultView>,
    /// Healthy weight range in the active unit system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy_range: Option<String>,
}

impl FormView {
    pub fn is_welcome(&self) -> bool {
        self.result.is_none()
    }

    pub fn field(&self, field: Field) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Error message currently shown for a field
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.field(field).and_then(|f| f.error.as_deref())
    }

    /// Single-line JSON encoding
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FormView {
        FormView {
            unit_system: UnitSystem::Metric,
            fields: vec![FieldView {
                field: Field::WeightKg,
                label: "Weight".to_string(),
                value: "abc".to_string(),
                error: Some("Please enter a number.".to_string()),
                error_code: Some("NOT_A_NUMBER".to_string()),
            }],
            result: None,
            healthy_range: None,
        }
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["unit_system"], "metric");
        assert_eq!(json["fields"][0]["field"], "weight_kg");
        assert_eq!(json["fields"][0]["error_code"], "NOT_A_NUMBER");
        assert!(json["result"].is_null());
        assert!(json.get("healthy_range").is_none());
    }

    #[test]
    fn test_error_lookup() {
        let view = sample();
        assert_eq!(view.error_for(Field::WeightKg), Some("Please enter a number."));
        assert_eq!(view.error_for(Field::HeightCm), None);
        assert!(view.is_welcome());
    }
}
