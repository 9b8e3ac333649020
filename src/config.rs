//! Session tuning with JSON persistence
//!
//! Knobs the host may adjust without recompiling. Defaults match the
//! constants in [`crate::consts`]; the wall cross-section stays fixed there
//! as part of the host geometry contract.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CONTROL_REPEAT_INTERVAL, DRIVE_FORCE, MIN_REPEAT_INTERVAL, PLACEMENT_CLEARANCE, TURN_TORQUE,
    WALL_LIFT,
};

/// Host-adjustable session tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Continuous drive force magnitude along the kart's local Z axis
    pub drive_force: f32,
    /// Continuous turn torque magnitude about the kart's local Y axis
    pub turn_torque: f32,
    /// Seconds between action fires while a control button is held
    pub repeat_interval: f32,
    /// Vertical clearance added to a placement tap
    pub placement_clearance: f32,
    /// Vertical lift applied to every boundary wall
    pub wall_lift: f32,
    /// Host frame-loop rate in Hz
    pub sim_hz: u32,
    /// Log each drained scene command (demo/debugging)
    pub log_commands: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drive_force: DRIVE_FORCE,
            turn_torque: TURN_TORQUE,
            repeat_interval: CONTROL_REPEAT_INTERVAL,
            placement_clearance: PLACEMENT_CLEARANCE,
            wall_lift: WALL_LIFT,
            sim_hz: 120,
            log_commands: false,
        }
    }
}

/// Why tuning could not be loaded.
///
/// A missing file is not an error (defaults apply); a present-but-malformed
/// file is fatal at startup rather than silently swallowed.
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {e}"),
            TuningError::Parse(e) => write!(f, "malformed tuning file: {e}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Fixed timestep derived from `sim_hz`
    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.sim_hz.max(1) as f32
    }

    /// Clamp out-of-range values to safe ones, logging what changed.
    ///
    /// A non-positive or non-finite repeat interval would flood the command
    /// buffer with one fire per [`MIN_REPEAT_INTERVAL`]-worth of time, so it
    /// gets floored here.
    pub fn sanitized(mut self) -> Self {
        if !(self.repeat_interval >= MIN_REPEAT_INTERVAL) {
            log::warn!(
                "repeat_interval {} below {MIN_REPEAT_INTERVAL}, clamping",
                self.repeat_interval
            );
            self.repeat_interval = MIN_REPEAT_INTERVAL;
        }
        self
    }

    /// Load tuning from a JSON file.
    ///
    /// Missing file falls back to defaults; an unreadable or malformed
    /// file is an error the caller should treat as fatal at startup.
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        if !path.exists() {
            log::info!("no tuning file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(TuningError::Io)?;
        let tuning: Self = serde_json::from_str(&json).map_err(TuningError::Parse)?;
        log::info!("loaded tuning from {}", path.display());
        Ok(tuning.sanitized())
    }

    /// Save tuning as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), TuningError> {
        let json = serde_json::to_string_pretty(self).map_err(TuningError::Parse)?;
        std::fs::write(path, json).map_err(TuningError::Io)?;
        log::info!("tuning saved to {}", path.display());
        Ok(())
    }
}
