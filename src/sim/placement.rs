//! Kart placement from hit-test points
//!
//! A tap resolves (via the host's AR hit test) to a world point on the mat.
//! The kart's origin must not start inside the plane, so placement lifts
//! the point by a fixed clearance. The session emits the result as a single
//! place command that also resets the body's kinetic state.

use glam::Vec3;

use crate::consts::PLACEMENT_CLEARANCE;

/// Offset a tapped world point so the placed kart clears the plane surface,
/// using the stock [`PLACEMENT_CLEARANCE`].
///
/// Pure: repeated calls carry no hidden state, so the kart can be re-placed
/// by tapping again while already on the mat.
#[inline]
pub fn placement_point(tap_world_point: Vec3) -> Vec3 {
    placement_point_cleared(tap_world_point, PLACEMENT_CLEARANCE)
}

/// [`placement_point`] with a host-tuned clearance
#[inline]
pub fn placement_point_cleared(tap_world_point: Vec3, clearance: f32) -> Vec3 {
    tap_world_point + Vec3::new(0.0, clearance, 0.0)
}
