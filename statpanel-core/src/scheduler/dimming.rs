//! Lux-check window state machine
//!
//! Two states: [`LuxCheck::Active`] (display power follows ambient light)
//! and [`LuxCheck::Inactive`] (display forced on). The state is recomputed
//! only once the scheduled evaluation time has passed, so a tick costs one
//! comparison on the common path.
//!
//! The dimmer tracks the display power flag it last commanded. It is the
//! only place that decides display power; the agent applies the returned
//! [`PowerCommand`]s verbatim.

use chrono::{Days, NaiveDateTime};

use crate::config::DimmingWindow;

/// Lux-check state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LuxCheck {
    /// Display power gated by ambient light
    Active,
    /// Display forced on, lux not sampled
    Inactive,
}

impl LuxCheck {
    /// Check if lux gating applies
    pub fn is_active(&self) -> bool {
        matches!(self, LuxCheck::Active)
    }
}

/// Display power change requested by the dimmer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerCommand {
    On,
    Off,
}

/// Result of one window evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Next time the window must be recomputed
    pub next_evaluation: NaiveDateTime,
    /// Whether lux gating applies until `next_evaluation`
    pub lux_check_active: bool,
    /// Power change forced by leaving the active window
    pub command: Option<PowerCommand>,
}

/// Compute the lux-check state at `now` and when it next changes
///
/// - before `to` today: active until `to` today
/// - else before `from` today: inactive until `from` today
/// - otherwise: active until `to` tomorrow
///
/// Boundaries are whole times of day; sub-second parts of `now` are only
/// used for the comparisons.
pub fn next_lux_boundary(window: &DimmingWindow, now: NaiveDateTime) -> (NaiveDateTime, bool) {
    let today = now.date();
    let to = today.and_time(window.to);
    let from = today.and_time(window.from);

    if now < to {
        (to, true)
    } else if now < from {
        (from, false)
    } else {
        let tomorrow = to.checked_add_days(Days::new(1)).unwrap_or(NaiveDateTime::MAX);
        (tomorrow, true)
    }
}

/// Time-windowed auto-dimming state machine
#[derive(Debug, Clone)]
pub struct AutoDimmer {
    window: DimmingWindow,
    /// `None` until the first evaluation
    next_evaluation: Option<NaiveDateTime>,
    state: LuxCheck,
    display_on: bool,
}

impl AutoDimmer {
    /// Create a dimmer; the display is assumed on after initialization
    pub fn new(window: DimmingWindow) -> Self {
        Self {
            window,
            next_evaluation: None,
            state: LuxCheck::Inactive,
            display_on: true,
        }
    }

    /// Current lux-check state
    pub fn state(&self) -> LuxCheck {
        self.state
    }

    /// Whether the dimmer last left the display on
    pub fn display_on(&self) -> bool {
        self.display_on
    }

    /// Scheduled re-evaluation time, if evaluated at least once
    pub fn next_evaluation(&self) -> Option<NaiveDateTime> {
        self.next_evaluation
    }

    /// Re-evaluate the window if its scheduled time has passed
    ///
    /// Leaving a window while the display is dimmed forces it back on,
    /// whatever the new state is; the lux rule re-applies on the same tick
    /// if the new state is active.
    pub fn evaluate(&mut self, now: NaiveDateTime) -> Evaluation {
        let mut command = None;

        let due = match self.next_evaluation {
            Some(next) => now > next,
            None => true,
        };

        if due {
            if self.state.is_active() && !self.display_on {
                self.display_on = true;
                command = Some(PowerCommand::On);
            }

            let (next, active) = next_lux_boundary(&self.window, now);
            self.next_evaluation = Some(next);
            self.state = if active {
                LuxCheck::Active
            } else {
                LuxCheck::Inactive
            };
        }

        Evaluation {
            next_evaluation: self.next_evaluation.unwrap_or(now),
            lux_check_active: self.state.is_active(),
            command,
        }
    }

    /// Apply a lux reading (single threshold, no hysteresis)
    ///
    /// Returns a command only when the power state changes. Readings are
    /// ignored while the check is inactive.
    pub fn apply_lux(&mut self, lux: f32) -> Option<PowerCommand> {
        if !self.state.is_active() {
            return None;
        }

        if lux < self.window.lux_min {
            if self.display_on {
                self.display_on = false;
                return Some(PowerCommand::Off);
            }
        } else if !self.display_on {
            self.display_on = true;
            return Some(PowerCommand::On);
        }

        None
    }
}
