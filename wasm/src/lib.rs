//! BMI Calculator WASM Module
//!
//! WebAssembly bindings that let a browser page host the BMI form. The page
//! stays the view: it forwards input/blur/toggle events, schedules a timer
//! for `next_deadline_ms`, and re-renders from the JSON snapshot.
//!
//! `performance.now()` is passed in with every call because
//! `std::time::Instant` is unavailable on `wasm32-unknown-unknown`.

use std::rc::Rc;
use std::time::Duration;

use bmi_calculator_shared::{
    healthy_weight_range, parse_field, parse_unit_system, BmiForm, FormConfig, FormView,
    ManualClock, StonePounds, ViewAdapter,
};
use wasm_bindgen::prelude::*;

/// Keeps the most recent frame until the page collects it
#[derive(Debug, Default)]
struct LatestFrame {
    frame: Option<FormView>,
    dirty: bool,
}

impl ViewAdapter for LatestFrame {
    fn render(&mut self, view: &FormView) {
        self.frame = Some(view.clone());
        self.dirty = true;
    }
}

fn to_duration(now_ms: f64) -> Duration {
    Duration::from_micros((now_ms.max(0.0) * 1000.0).round() as u64)
}

fn to_json(view: &FormView) -> Result<String, String> {
    view.to_json().map_err(|e| e.to_string())
}

/// A BMI form instance; one per widget on the page
#[wasm_bindgen]
pub struct BmiWidget {
    clock: Rc<ManualClock>,
    form: BmiForm<Rc<ManualClock>, LatestFrame>,
}

#[wasm_bindgen]
impl BmiWidget {
    /// Create a widget with the default 500ms debounce
    #[wasm_bindgen(constructor)]
    pub fn new() -> BmiWidget {
        Self::from_config(&FormConfig::default())
    }

    /// Create a widget from a JSON `FormConfig`,
    /// e.g. `{"debounce_ms": 300, "range_policy": "from_height"}`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<BmiWidget, String> {
        let config: FormConfig = serde_json::from_str(config_json).map_err(|e| e.to_string())?;
        Ok(Self::from_config(&config))
    }

    /// Switch between "metric" and "imperial". Returns whether anything changed.
    #[wasm_bindgen(js_name = setUnitSystem)]
    pub fn set_unit_system(&mut self, unit_system: &str, now_ms: f64) -> Result<bool, String> {
        self.sync_clock(now_ms);
        let unit_system = parse_unit_system(unit_system).map_err(|e| e.to_string())?;
        Ok(self.form.set_unit_system(unit_system))
    }

    /// Forward the current text of an input
    pub fn input(&mut self, field: &str, value: &str, now_ms: f64) -> Result<(), String> {
        self.sync_clock(now_ms);
        let field = parse_field(field).map_err(|e| e.to_string())?;
        self.form.input(field, value).map_err(|e| e.to_string())
    }

    /// Forward a blur event
    pub fn blur(&mut self, field: &str, now_ms: f64) -> Result<(), String> {
        self.sync_clock(now_ms);
        let field = parse_field(field).map_err(|e| e.to_string())?;
        self.form.blur(field).map_err(|e| e.to_string())
    }

    /// Run the debounced recompute if it is due. Call from the page timer.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.sync_clock(now_ms);
        self.form.tick()
    }

    /// When to call `tick` next, in the page's `performance.now()` timebase
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.form
            .next_deadline()
            .map(|d| d.as_micros() as f64 / 1000.0)
    }

    /// Current snapshot as JSON
    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> Result<String, String> {
        to_json(&self.form.snapshot())
    }

    /// The latest rendered frame as JSON, if one was rendered since the
    /// last call
    #[wasm_bindgen(js_name = takeRender)]
    pub fn take_render(&mut self) -> Result<Option<String>, String> {
        let latest = self.form.view_adapter_mut();
        if !latest.dirty {
            return Ok(None);
        }
        latest.dirty = false;
        latest.frame.as_ref().map(to_json).transpose()
    }
}

impl BmiWidget {
    fn from_config(config: &FormConfig) -> BmiWidget {
        let clock = Rc::new(ManualClock::new());
        let form = BmiForm::new(config, Rc::clone(&clock), LatestFrame::default());
        BmiWidget { clock, form }
    }

    fn sync_clock(&self, now_ms: f64) {
        self.clock.set(to_duration(now_ms));
    }
}

impl Default for BmiWidget {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculate BMI from height (cm) and weight (kg).
/// Returns `undefined` unless both are finite and positive.
#[wasm_bindgen(js_name = calculateBmi)]
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(height_cm) || !usable(weight_kg) {
        return None;
    }
    Some(bmi_calculator_shared::calculate_bmi(height_cm, weight_kg))
}

/// Healthy weight range for a height in cm, as `{"min_kg":..,"max_kg":..}`
#[wasm_bindgen(js_name = healthyWeightRangeJson)]
pub fn healthy_weight_range_json(height_cm: f64) -> Result<String, String> {
    serde_json::to_string(&healthy_weight_range(height_cm / 100.0)).map_err(|e| e.to_string())
}

/// Format kilograms as stone and pounds, e.g. "10st 0lbs"
#[wasm_bindgen(js_name = kgToStonePounds)]
pub fn kg_to_stone_pounds(kg: f64) -> String {
    StonePounds::from_kg(kg).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        let bmi = calculate_bmi(175.0, 70.0).unwrap();
        assert!((bmi - 22.86).abs() < 0.1);
    }

    #[test]
    fn test_bmi_without_usable_input() {
        assert_eq!(calculate_bmi(0.0, 70.0), None);
        assert_eq!(calculate_bmi(-175.0, 70.0), None);
        assert_eq!(calculate_bmi(175.0, 0.0), None);
        assert_eq!(calculate_bmi(f64::NAN, 70.0), None);
    }

    #[test]
    fn test_stone_pounds_carry() {
        assert_eq!(kg_to_stone_pounds(63.5), "10st 0lbs");
    }

    #[test]
    fn test_range_json() {
        let json: serde_json::Value =
            serde_json::from_str(&healthy_weight_range_json(175.0).unwrap()).unwrap();
        assert!((json["min_kg"].as_f64().unwrap() - 56.656).abs() < 0.001);
    }

    #[test]
    fn test_widget_debounce_flow() {
        let mut widget = BmiWidget::new();
        assert!(widget.take_render().unwrap().is_some());
        assert!(widget.take_render().unwrap().is_none());

        widget.input("heightCm", "175", 1000.0).unwrap();
        widget.input("weightKg", "70", 1100.0).unwrap();
        assert_eq!(widget.next_deadline_ms(), Some(1600.0));

        assert!(!widget.tick(1500.0));
        assert!(widget.tick(1600.0));

        let frame: serde_json::Value =
            serde_json::from_str(&widget.take_render().unwrap().unwrap()).unwrap();
        assert_eq!(frame["result"]["bmi_display"], "22.9");
        assert_eq!(frame["result"]["category"], "healthy_weight");
    }

    #[test]
    fn test_widget_rejects_unknown_names() {
        let mut widget = BmiWidget::new();
        assert!(widget.input("shoeSize", "42", 0.0).is_err());
        assert!(widget.set_unit_system("cubits", 0.0).is_err());
        assert!(widget.input("weightSt", "10", 0.0).is_err());
    }

    #[test]
    fn test_widget_toggle() {
        let mut widget = BmiWidget::with_config(r#"{"debounce_ms": 0}"#).unwrap();
        widget.input("heightCm", "175", 0.0).unwrap();
        assert_eq!(widget.set_unit_system("metric", 0.0), Ok(false));
        assert_eq!(widget.set_unit_system("imperial", 0.0), Ok(true));

        let view: serde_json::Value = serde_json::from_str(&widget.view_json().unwrap()).unwrap();
        assert_eq!(view["unit_system"], "imperial");
        assert_eq!(view["fields"].as_array().unwrap().len(), 4);
    }
}
