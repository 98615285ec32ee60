//! Terminal view and clock
//!
//! [`TerminalView`] is the form's view adapter in the terminal host: each
//! render is formatted and queued, and the session writes the queue to
//! stdout after every event.

use bmi_calculator_shared::{Clock, FormView, ViewAdapter};
use std::fmt::Write as _;
use std::time::Duration;
use tokio::time::Instant;
use tracing::error;

use crate::config::OutputFormat;

const WELCOME: &str = "Welcome! Enter your height and weight and you'll see your BMI result here.";

/// Clock backed by tokio's time source, so paused test time applies
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Convert a clock reading back to a tokio instant
    pub fn instant_at(&self, at: Duration) -> Instant {
        self.origin + at
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Format a view as a human-readable block
pub fn render_text(view: &FormView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", view.unit_system);

    for field in &view.fields {
        let value = if field.value.is_empty() { "-" } else { field.value.as_str() };
        match &field.error {
            Some(error) => {
                let _ = writeln!(out, "  {}: {}  ! {}", field.label, value, error);
            }
            None => {
                let _ = writeln!(out, "  {}: {}", field.label, value);
            }
        }
    }

    match &view.result {
        Some(result) => {
            let _ = writeln!(out, "  Your BMI is... {}", result.bmi_display);
            let _ = write!(out, "  {}", result.summary);
        }
        None => {
            let _ = write!(out, "  {}", WELCOME);
            if let Some(range) = &view.healthy_range {
                let _ = write!(out, "\n  Healthy weight range: {}", range);
            }
        }
    }
    out
}

/// View adapter that queues formatted frames for the session to write
#[derive(Debug)]
pub struct TerminalView {
    format: OutputFormat,
    pending: Vec<String>,
}

impl TerminalView {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pending: Vec::new(),
        }
    }

    /// Queue an error line
    pub fn report_error(&mut self, message: &str) {
        let line = match self.format {
            OutputFormat::Text => format!("error: {}", message),
            OutputFormat::Json => serde_json::json!({ "error": message }).to_string(),
        };
        self.pending.push(line);
    }

    /// Take everything queued since the last drain
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

impl ViewAdapter for TerminalView {
    fn render(&mut self, view: &FormView) {
        match self.format {
            OutputFormat::Text => self.pending.push(render_text(view)),
            OutputFormat::Json => match view.to_json() {
                Ok(line) => self.pending.push(line),
                Err(e) => error!("Failed to encode view: {}", e),
            },
        }
    }
}
