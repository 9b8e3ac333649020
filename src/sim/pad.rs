//! Held-button repeat logic
//!
//! A pressed control button fires its action once per interval until
//! released, like a hardware autorepeat. Time comes from the host loop via
//! `advance(dt)` accumulation, never from OS timers, so behavior is
//! deterministic and testable.

use serde::{Deserialize, Serialize};

use super::control::Action;
use crate::consts::CONTROL_REPEAT_INTERVAL;

/// Periodic fire generator for one held button.
///
/// The first fire lands one full interval after the press; a press followed
/// immediately by a release fires zero times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRepeater {
    interval: f32,
    elapsed: f32,
}

impl InputRepeater {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt` and return how many fires elapsed in it
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt;
        let fires = (self.elapsed / self.interval) as u32;
        self.elapsed -= fires as f32 * self.interval;
        fires
    }
}

/// One repeater slot per control button.
///
/// At most one repeater runs per [`Action`]; distinct actions repeat
/// concurrently (e.g. forward + turn). Fires drain in the fixed
/// [`Action::ALL`] order for deterministic downstream application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlPad {
    slots: [Option<InputRepeater>; 4],
}

impl ControlPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin repeating `action` at the default ~100 Hz cadence.
    ///
    /// Pressing an already-held button restarts its interval.
    pub fn press(&mut self, action: Action) {
        self.press_with_interval(action, CONTROL_REPEAT_INTERVAL);
    }

    /// Begin repeating `action` every `interval` seconds
    pub fn press_with_interval(&mut self, action: Action, interval: f32) {
        self.slots[Self::slot(action)] = Some(InputRepeater::new(interval));
    }

    /// Stop repeating `action`. Idempotent.
    ///
    /// Fires only materialize inside [`advance`](Self::advance), so once
    /// `release` returns no further fire for this action can be observed.
    pub fn release(&mut self, action: Action) {
        self.slots[Self::slot(action)] = None;
    }

    /// True if any button is currently held
    pub fn any_held(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Advance all held buttons by `dt`, collecting fired actions in fixed
    /// action order
    pub fn advance(&mut self, dt: f32) -> Vec<Action> {
        let mut fired = Vec::new();
        for action in Action::ALL {
            if let Some(repeater) = &mut self.slots[Self::slot(action)] {
                for _ in 0..repeater.advance(dt) {
                    fired.push(action);
                }
            }
        }
        fired
    }

    #[inline]
    fn slot(action: Action) -> usize {
        match action {
            Action::Forward => 0,
            Action::Backward => 1,
            Action::TurnLeft => 2,
            Action::TurnRight => 3,
        }
    }
}
