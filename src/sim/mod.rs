//! Deterministic control and track-building module
//!
//! All kart logic lives here. This module must be pure and deterministic:
//! - Fixed timestep / tick-accumulated time only, no OS timers
//! - Stable iteration order (controls fire in fixed Action order)
//! - No rendering, AR, or platform dependencies
//!
//! The host delivers plane, tap, and button events serially on its scene
//! thread and drains the resulting [`SceneCommand`]s each frame.

pub mod control;
pub mod pad;
pub mod placement;
pub mod session;
pub mod track;

pub use control::{Action, ImpulseSpec, ReferenceFrame, map_action, map_action_tuned};
pub use pad::{ControlPad, InputRepeater};
pub use placement::{placement_point, placement_point_cleared};
pub use session::{BodyCategory, Phase, Rejection, SceneCommand, Session};
pub use track::{
    AnchorId, PlaneRegion, TrackState, Wall, WallOrientation, build_walls, build_walls_lifted,
};
