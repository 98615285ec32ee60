//! BMI Calculator Shared Library
//!
//! This crate contains the form engine behind the BMI calculator: unit
//! conversion, validation, the BMI and healthy-range math, the debounced
//! recompute loop and the view snapshot types. Hosts (the wasm bindings
//! and the terminal driver) supply a clock and a view.

pub mod config;
pub mod debounce;
pub mod errors;
pub mod form;
pub mod health_metrics;
pub mod models;
pub mod state;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use config::{FormConfig, RangePolicy};
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};
pub use errors::*;
pub use form::{parse_field, parse_unit_system, BmiForm, RecordingView, ViewAdapter};
pub use health_metrics::*;
pub use models::{DerivedResult, Field, MeasurementState};
pub use state::FormState;
pub use types::*;
pub use units::*;
