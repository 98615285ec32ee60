//! Form orchestration
//!
//! [`BmiForm`] wires the pieces together: events from the host update the
//! [`FormState`], the [`Debouncer`] defers recomputation while the user is
//! typing, and every change is pushed to a [`ViewAdapter`].
//!
//! The form never reads time or the page on its own. Hosts inject a
//! [`Clock`] and a view, and call [`BmiForm::tick`] when the deadline from
//! [`BmiForm::next_deadline`] passes.

use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FormConfig;
use crate::debounce::{Clock, Debouncer};
use crate::errors::FormError;
use crate::models::Field;
use crate::state::FormState;
use crate::types::FormView;
use crate::units::UnitSystem;

/// Render target for the form
pub trait ViewAdapter {
    fn render(&mut self, view: &FormView);
}

impl<V: ViewAdapter + ?Sized> ViewAdapter for &mut V {
    fn render(&mut self, view: &FormView) {
        (**self).render(view)
    }
}

/// View that keeps every rendered frame
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    pub frames: Vec<FormView>,
}

impl RecordingView {
    pub fn last(&self) -> Option<&FormView> {
        self.frames.last()
    }
}

impl ViewAdapter for RecordingView {
    fn render(&mut self, view: &FormView) {
        self.frames.push(view.clone());
    }
}

/// Work deferred by the debouncer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    Recompute,
}

/// Parse a field name coming from the host
pub fn parse_field(name: &str) -> Result<Field, FormError> {
    name.parse().map_err(|_| FormError::UnknownField(name.to_string()))
}

/// Parse a unit system name coming from the host
pub fn parse_unit_system(name: &str) -> Result<UnitSystem, FormError> {
    name.parse()
        .map_err(|_| FormError::UnknownUnitSystem(name.to_string()))
}

/// One BMI form session
pub struct BmiForm<C: Clock, V: ViewAdapter> {
    state: FormState,
    debouncer: Debouncer<Deferred>,
    clock: C,
    view: V,
}

impl<C: Clock, V: ViewAdapter> BmiForm<C, V> {
    /// Create a form and render its initial (welcome) view
    pub fn new(config: &FormConfig, clock: C, view: V) -> Self {
        let mut form = Self {
            state: FormState::new(config.range_policy),
            debouncer: Debouncer::new(config.debounce()),
            clock,
            view,
        };
        form.render();
        form
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn view_adapter(&self) -> &V {
        &self.view
    }

    pub fn view_adapter_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Quiet period before a recompute runs
    pub fn debounce_window(&self) -> Duration {
        self.debouncer.window()
    }

    pub fn snapshot(&self) -> FormView {
        self.state.view()
    }

    /// Switch unit system. Resets the form and renders at once, without
    /// waiting for the debounce window. Selecting the active unit system
    /// does nothing and returns `false`.
    pub fn set_unit_system(&mut self, unit_system: UnitSystem) -> bool {
        if !self.state.set_unit_system(unit_system) {
            return false;
        }
        if self.debouncer.cancel().is_some() {
            debug!("pending recompute dropped by unit change");
        }
        self.render();
        true
    }

    /// Handle an edit of a field's text
    pub fn input(&mut self, field: Field, raw: &str) -> Result<(), FormError> {
        self.state.apply_input(field, raw).map_err(|err| {
            warn!(%field, "input ignored: {}", err);
            err
        })?;
        self.debouncer.schedule(self.clock.now(), Deferred::Recompute);
        if !self.tick() {
            self.render();
        }
        Ok(())
    }

    /// Handle a field losing focus
    pub fn blur(&mut self, field: Field) -> Result<(), FormError> {
        self.state.apply_blur(field)?;
        self.render();
        Ok(())
    }

    /// When [`BmiForm::tick`] next has work to do
    pub fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Run the deferred recompute if its window has elapsed.
    /// Returns `true` if it ran.
    pub fn tick(&mut self) -> bool {
        match self.debouncer.poll(self.clock.now()) {
            Some(task) => {
                self.run(task);
                true
            }
            None => false,
        }
    }

    /// Run the deferred recompute now, if there is one
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(task) => {
                self.run(task);
                true
            }
            None => false,
        }
    }

    fn run(&mut self, task: Deferred) {
        match task {
            Deferred::Recompute => {
                self.state.recompute();
            }
        }
        self.render();
    }

    fn render(&mut self) {
        let view = self.state.view();
        self.view.render(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RangePolicy;
    use crate::debounce::ManualClock;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn form(clock: &ManualClock) -> BmiForm<&ManualClock, RecordingView> {
        BmiForm::new(&FormConfig::default(), clock, RecordingView::default())
    }

    fn last<'a>(form: &'a BmiForm<&ManualClock, RecordingView>) -> &'a FormView {
        form.view_adapter().last().expect("rendered at least once")
    }

    #[test]
    fn test_initial_render() {
        let clock = ManualClock::new();
        let form = form(&clock);
        assert_eq!(form.debounce_window(), ms(500));
        assert_eq!(form.view_adapter().frames.len(), 1);
        assert!(last(&form).is_welcome());
        assert_eq!(last(&form).error_for(Field::HeightCm), None);
    }

    #[test]
    fn test_recompute_waits_for_quiet_period() {
        let clock = ManualClock::new();
        let mut form = form(&clock);

        form.input(Field::HeightCm, "175").unwrap();
        clock.advance(ms(200));
        form.input(Field::WeightKg, "70").unwrap();
        assert_eq!(form.next_deadline(), Some(ms(700)));

        clock.set(ms(600));
        assert!(!form.tick());
        assert!(last(&form).is_welcome());

        clock.set(ms(700));
        assert!(form.tick());
        let result = last(&form).result.clone().expect("bmi present");
        assert_eq!(result.bmi_display, "22.9");
        assert!(!form.has_pending());
    }

    #[test]
    fn test_burst_recomputes_once() {
        let clock = ManualClock::new();
        let mut form = form(&clock);
        form.input(Field::HeightCm, "175").unwrap();

        for text in ["7", "70", "70.", "70.5"] {
            clock.advance(ms(50));
            form.input(Field::WeightKg, text).unwrap();
        }
        clock.advance(ms(10_000));

        let mut runs = 0;
        while form.tick() {
            runs += 1;
        }
        assert_eq!(runs, 1);
        assert_eq!(last(&form).result.as_ref().unwrap().bmi_display, "23.0");
    }

    #[test]
    fn test_zero_window_recomputes_synchronously() {
        let clock = ManualClock::new();
        let config = FormConfig {
            debounce_ms: 0,
            ..FormConfig::default()
        };
        let mut form = BmiForm::new(&config, &clock, RecordingView::default());
        assert_eq!(form.debounce_window(), Duration::ZERO);

        form.input(Field::HeightCm, "175").unwrap();
        form.input(Field::WeightKg, "70").unwrap();
        assert!(!form.has_pending());
        assert!(last(&form).result.is_some());
    }

    #[test]
    fn test_scenario_missing_height() {
        let clock = ManualClock::new();
        let mut form = form(&clock);
        form.input(Field::WeightKg, "70").unwrap();
        form.flush();

        assert!(last(&form).is_welcome());
        assert_eq!(last(&form).error_for(Field::HeightCm), None);

        form.blur(Field::HeightCm).unwrap();
        assert_eq!(last(&form).error_for(Field::HeightCm), Some("This field is required."));
    }

    #[test]
    fn test_scenario_non_numeric_weight() {
        let clock = ManualClock::new();
        let mut form = form(&clock);
        form.input(Field::HeightCm, "175").unwrap();
        form.input(Field::WeightKg, "abc").unwrap();

        // Shown before any blur or recompute
        assert_eq!(last(&form).error_for(Field::WeightKg), Some("Please enter a number."));

        form.flush();
        assert!(last(&form).is_welcome());
    }

    #[test]
    fn test_scenario_imperial() {
        let clock = ManualClock::new();
        let mut form = form(&clock);
        assert!(form.set_unit_system(UnitSystem::Imperial));

        form.input(Field::HeightFeet, "5").unwrap();
        form.input(Field::HeightInches, "10").unwrap();
        form.input(Field::WeightStone, "12").unwrap();
        form.input(Field::WeightPounds, "0").unwrap();
        form.flush();

        let view = last(&form);
        assert_eq!(view.result.as_ref().unwrap().bmi_display, "24.1");
        // 177.8cm -> 58.48kg - 78.72kg -> 9st 3lbs - 12st 6lbs
        assert_eq!(view.healthy_range.as_deref(), Some("9st 3lbs - 12st 6lbs"));
    }

    #[test]
    fn test_unit_toggle_renders_immediately_and_cancels_pending() {
        let clock = ManualClock::new();
        let mut form = form(&clock);
        form.input(Field::HeightCm, "175").unwrap();
        form.input(Field::WeightKg, "70").unwrap();
        form.flush();
        form.blur(Field::HeightCm).unwrap();
        form.input(Field::WeightKg, "71").unwrap();
        let frames = form.view_adapter().frames.len();

        assert!(form.set_unit_system(UnitSystem::Imperial));
        assert_eq!(form.view_adapter().frames.len(), frames + 1);
        assert!(!form.has_pending());

        let view = last(&form);
        assert_eq!(view.unit_system, UnitSystem::Imperial);
        assert!(view.is_welcome());
        assert!(view.fields.iter().all(|f| f.value.is_empty() && f.error.is_none()));
    }

    #[test]
    fn test_toggle_same_unit_is_noop() {
        let clock = ManualClock::new();
        let mut form = form(&clock);
        form.input(Field::HeightCm, "175").unwrap();
        let frames = form.view_adapter().frames.len();

        assert!(!form.set_unit_system(UnitSystem::Metric));
        assert_eq!(form.view_adapter().frames.len(), frames);
        assert!(form.has_pending());
        assert_eq!(form.state().raw(Field::HeightCm), "175");
    }

    #[test]
    fn test_inactive_field_is_error() {
        let clock = ManualClock::new();
        let mut form = form(&clock);
        assert!(form.input(Field::WeightStone, "10").is_err());
        assert!(form.blur(Field::WeightPounds).is_err());
        assert!(!form.has_pending());
    }

    #[test]
    fn test_independent_forms() {
        let clock = ManualClock::new();
        let mut a = form(&clock);
        let mut b = form(&clock);

        a.input(Field::HeightCm, "175").unwrap();
        a.input(Field::WeightKg, "70").unwrap();
        a.flush();
        b.set_unit_system(UnitSystem::Imperial);

        assert!(last(&a).result.is_some());
        assert_eq!(last(&a).unit_system, UnitSystem::Metric);
        assert_eq!(last(&b).unit_system, UnitSystem::Imperial);
        assert!(last(&b).is_welcome());
    }

    #[test]
    fn test_from_height_range_policy() {
        let clock = ManualClock::new();
        let config = FormConfig {
            range_policy: RangePolicy::FromHeight,
            ..FormConfig::default()
        };
        let mut form = BmiForm::new(&config, &clock, RecordingView::default());
        form.input(Field::HeightCm, "175").unwrap();
        form.flush();

        assert!(last(&form).is_welcome());
        assert_eq!(last(&form).healthy_range.as_deref(), Some("56.7kgs - 76.3kgs"));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_field("heightCm").unwrap(), Field::HeightCm);
        assert_eq!(
            parse_field("waist").unwrap_err(),
            FormError::UnknownField("waist".to_string())
        );
        assert_eq!(parse_unit_system("imperial").unwrap(), UnitSystem::Imperial);
        assert!(parse_unit_system("cubits").is_err());
    }
}
