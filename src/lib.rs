//! RC Kart - headless core for an AR toy-kart demo
//!
//! Core modules:
//! - `sim`: Deterministic control/track logic (input repeat, force mapping,
//!   track boundaries, kart placement, session state machine)
//! - `config`: Data-driven tuning with JSON persistence
//!
//! AR tracking, rendering, and touch plumbing live in the host application.
//! The host feeds plane/tap/button events into a [`sim::Session`] and drains
//! [`sim::SceneCommand`]s each frame to drive its scene graph and physics
//! engine.

pub mod config;
pub mod sim;

pub use config::Tuning;
pub use sim::{Action, ImpulseSpec, PlaneRegion, SceneCommand, Session, Wall};

use glam::{Quat, Vec3};

/// Core constants shared by the sim and the host loop
pub mod consts {
    /// Fixed host-loop timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Continuous drive force magnitude along the kart's local Z axis
    pub const DRIVE_FORCE: f32 = 5.0;
    /// Continuous turn torque magnitude about the kart's local Y axis
    pub const TURN_TORQUE: f32 = 0.5;
    /// Repeat cadence for a held control button (~100 Hz)
    pub const CONTROL_REPEAT_INTERVAL: f32 = 0.01;
    /// Floor for a tuned repeat cadence; keeps a bad tuning file from
    /// flooding the command buffer
    pub const MIN_REPEAT_INTERVAL: f32 = 0.001;

    /// Vertical clearance added to a placement tap so the kart's origin
    /// does not intersect the plane surface
    pub const PLACEMENT_CLEARANCE: f32 = 0.1;

    /// Vertical lift applied to every wall so it sits above the mat
    pub const WALL_LIFT: f32 = 0.025;
    /// Wall cross-section
    pub const WALL_THICKNESS: f32 = 0.02;
    pub const WALL_HEIGHT: f32 = 0.05;
}

/// Rotate a local-frame vector into world space using the kart's current
/// orientation.
///
/// Local-frame [`ImpulseSpec`] forces must go through this with the physics
/// body's orientation before being handed to the engine; orientation is
/// owned by the body, not by the mapper.
#[inline]
pub fn rotate_to_world(orientation: Quat, local: Vec3) -> Vec3 {
    orientation * local
}
