//! Debounced task scheduling
//!
//! A [`Debouncer`] holds at most one pending task. Scheduling again replaces
//! the pending task and restarts the quiescence window, so a burst of calls
//! yields a single trailing run. Nothing runs on its own: the owner polls
//! with the current time from a [`Clock`] and runs whatever is due on its
//! own thread.
//!
//! Time is a [`Duration`] since an arbitrary clock origin. This keeps the
//! core usable where `std::time::Instant` is unavailable (wasm) and lets
//! tests drive time by hand.

use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::trace;

/// Source of monotonic time
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time. Never moves backwards.
    pub fn set(&self, to: Duration) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

#[derive(Debug)]
struct Pending<T> {
    due: Duration,
    task: T,
}

/// Single-slot trailing debouncer
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `task` to run one window after `now`, replacing any pending
    /// task. Returns the replaced task, if there was one.
    pub fn schedule(&mut self, now: Duration, task: T) -> Option<T> {
        let due = now + self.window;
        trace!(due_ms = due.as_millis() as u64, "debounce scheduled");
        self.pending
            .replace(Pending { due, task })
            .map(|p| p.task)
    }

    /// Drop the pending task without running it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.task)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending task becomes due
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Take the pending task if it is due at `now`
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some(p) if p.due <= now => {
                trace!(now_ms = now.as_millis() as u64, "debounce fired");
                self.pending.take().map(|p| p.task)
            }
            _ => None,
        }
    }

    /// Take the pending task regardless of its deadline
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }
}
