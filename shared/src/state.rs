//! Form state and its update functions
//!
//! [`FormState`] is owned by exactly one form. Every update is a plain
//! method call that runs to completion; nothing here knows about time or
//! rendering.

use std::collections::HashMap;
use tracing::debug;

use crate::config::RangePolicy;
use crate::errors::{FieldError, FormError};
use crate::health_metrics::{calculate_bmi_result, healthy_weight_range, round_to_one_decimal};
use crate::models::{DerivedResult, Field, MeasurementState};
use crate::types::{FieldView, FormView, ResultView};
use crate::units::{to_metric, UnitSystem};
use crate::validation::{parse_input, validate, visible_error, ParsedInput};

/// State of one BMI form
#[derive(Debug, Clone, Default)]
pub struct FormState {
    unit_system: UnitSystem,
    measurements: MeasurementState,
    raw: HashMap<Field, String>,
    result: DerivedResult,
    range_policy: RangePolicy,
}

impl FormState {
    pub fn new(range_policy: RangePolicy) -> Self {
        Self {
            range_policy,
            ..Self::default()
        }
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn measurements(&self) -> &MeasurementState {
        &self.measurements
    }

    pub fn result(&self) -> &DerivedResult {
        &self.result
    }

    /// Raw text last entered for a field
    pub fn raw(&self, field: Field) -> &str {
        self.raw.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Error currently displayed for a field
    pub fn visible_error(&self, field: Field) -> Option<FieldError> {
        visible_error(field, self.raw(field), self.measurements.is_touched(field))
            .or_else(|| self.combined_error(field))
    }

    /// Range error for an imperial measurement whose parts are each valid
    /// but whose metric total is not. Reported on the primary field
    /// against the metric field's range.
    fn combined_error(&self, field: Field) -> Option<FieldError> {
        if self.unit_system != UnitSystem::Imperial || !field.is_required() {
            return None;
        }
        let is_height = field.is_height();
        if !self.fields_valid(|f| f.is_height() == is_height) {
            return None;
        }

        let metric = to_metric(&self.measurements, self.unit_system);
        let (total, limit) = if is_height {
            (metric.height_cm, Field::HeightCm)
        } else {
            (metric.weight_kg, Field::WeightKg)
        };
        total
            .filter(|value| !limit.range().contains(*value))
            .map(|_| FieldError::OutOfRange(limit))
    }

    fn dimension_valid(&self, is_height: bool) -> bool {
        self.fields_valid(|f| f.is_height() == is_height)
            && Field::for_unit_system(self.unit_system)
                .iter()
                .filter(|f| f.is_height() == is_height)
                .all(|f| self.combined_error(*f).is_none())
    }

    /// Switch unit system, clearing everything entered so far.
    ///
    /// Returns `false` (and changes nothing) if `unit_system` is already
    /// active.
    pub fn set_unit_system(&mut self, unit_system: UnitSystem) -> bool {
        if self.unit_system == unit_system {
            return false;
        }
        debug!(from = %self.unit_system, to = %unit_system, "unit system changed");
        self.reset();
        self.unit_system = unit_system;
        true
    }

    /// Clear values, raw text, touched flags and the result
    pub fn reset(&mut self) {
        self.measurements.reset();
        self.raw.clear();
        self.result = DerivedResult::default();
    }

    fn ensure_active(&self, field: Field) -> Result<(), FormError> {
        if field.unit_system() == self.unit_system {
            Ok(())
        } else {
            Err(FormError::InactiveField {
                field,
                active: self.unit_system,
            })
        }
    }

    /// Record new raw text for a field.
    ///
    /// Blank text clears the value. Text that is not a number leaves the
    /// previous value in place; the field's error keeps it out of the
    /// result. Returns the error now displayed for the field.
    pub fn apply_input(&mut self, field: Field, raw: &str) -> Result<Option<FieldError>, FormError> {
        self.ensure_active(field)?;

        match parse_input(raw) {
            ParsedInput::Blank => self.measurements.set(field.slot(), None),
            ParsedInput::Number(value) => self.measurements.set(field.slot(), Some(value)),
            ParsedInput::Invalid => {}
        }
        self.raw.insert(field, raw.to_string());

        let error = self.visible_error(field);
        debug!(%field, error = ?error, "input applied");
        Ok(error)
    }

    /// Mark a field as having lost focus. Returns the error now displayed.
    pub fn apply_blur(&mut self, field: Field) -> Result<Option<FieldError>, FormError> {
        self.ensure_active(field)?;
        if self.measurements.touch(field) {
            debug!(%field, "field touched");
        }
        Ok(self.visible_error(field))
    }

    fn fields_valid(&self, pick: impl Fn(&Field) -> bool) -> bool {
        Field::for_unit_system(self.unit_system)
            .iter()
            .filter(|f| pick(f))
            .all(|f| validate(*f, self.raw(*f)).is_ok())
    }

    /// Derive the result from scratch
    pub fn recompute(&mut self) -> &DerivedResult {
        let metric = to_metric(&self.measurements, self.unit_system);

        let bmi = if self.dimension_valid(true) && self.dimension_valid(false) {
            calculate_bmi_result(metric.height_cm, metric.weight_kg)
        } else {
            None
        };

        let healthy_range = match (&bmi, self.range_policy) {
            (Some(result), _) => Some(result.healthy_range),
            (None, RangePolicy::FromHeight) if self.dimension_valid(true) => metric
                .height_cm
                .filter(|h| *h > 0.0)
                .map(|h| healthy_weight_range(h / 100.0)),
            _ => None,
        };

        self.result = DerivedResult {
            bmi: bmi.map(|r| r.value),
            category: bmi.map(|r| r.category),
            healthy_range,
        };
        debug!(bmi = ?self.result.bmi, "result recomputed");
        &self.result
    }

    /// Snapshot for rendering
    pub fn view(&self) -> FormView {
        let fields = Field::for_unit_system(self.unit_system)
            .iter()
            .map(|&field| {
                let error = self.visible_error(field);
                FieldView {
                    field,
                    label: field.label().to_string(),
                    value: self.raw(field).to_string(),
                    error: error.map(|e| e.to_string()),
                    error_code: error.map(|e| e.code().to_string()),
                }
            })
            .collect();

        let healthy_range = self
            .result
            .healthy_range
            .map(|range| range.display(self.unit_system));

        let result = match (self.result.bmi, self.result.category) {
            (Some(bmi), Some(category)) => {
                let bmi = round_to_one_decimal(bmi);
                let mut summary = format!("Your BMI suggests you're {}.", category.description());
                if let Some(range) = &healthy_range {
                    summary.push_str(&format!(" Your ideal weight is between {}.", range));
                }
                Some(ResultView {
                    bmi,
                    bmi_display: format!("{:.1}", bmi),
                    category,
                    summary,
                })
            }
            _ => None,
        };

        FormView {
            unit_system: self.unit_system,
            fields,
            result,
            healthy_range,
        }
    }
}
