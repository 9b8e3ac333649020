//! Driving actions and their physics impulse mapping
//!
//! A held D-pad button repeats a discrete [`Action`]; each fire maps to one
//! [`ImpulseSpec`] handed to the external rigid-body engine. Magnitudes are
//! not scaled by elapsed time - the fixed repeat cadence is the throttle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{DRIVE_FORCE, TURN_TORQUE};

/// A discrete driving command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl Action {
    /// All actions in a fixed order, for deterministic iteration
    pub const ALL: [Action; 4] = [
        Action::Forward,
        Action::Backward,
        Action::TurnLeft,
        Action::TurnRight,
    ];
}

/// Reference frame an impulse vector is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// The kart body's local frame; the caller must rotate into world space
    /// with the body's current orientation before applying
    Local,
    World,
}

/// A physics instruction for the external rigid-body engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ImpulseSpec {
    /// Linear force
    Force {
        vector: Vec3,
        frame: ReferenceFrame,
        /// true = instantaneous impulse, false = continuous force
        impulse: bool,
    },
    /// Torque about an axis
    Torque {
        axis: Vec3,
        magnitude: f32,
        frame: ReferenceFrame,
        impulse: bool,
    },
}

/// Map a driving action to its impulse specification at the stock
/// magnitudes.
///
/// Pure and total over the four actions. Forward and backward are
/// opposite-signed forces along the local Z axis (forward is -Z); left and
/// right are opposite-signed torques about the local Y axis. All four are
/// continuous, never impulses.
pub fn map_action(action: Action) -> ImpulseSpec {
    map_action_tuned(action, DRIVE_FORCE, TURN_TORQUE)
}

/// [`map_action`] with host-tuned magnitudes.
///
/// The structural invariants hold for any magnitudes: forward/backward stay
/// additive inverses along local Z, left/right stay opposite-signed about
/// local Y.
pub fn map_action_tuned(action: Action, drive_force: f32, turn_torque: f32) -> ImpulseSpec {
    match action {
        Action::Forward => ImpulseSpec::Force {
            vector: Vec3::new(0.0, 0.0, -drive_force),
            frame: ReferenceFrame::Local,
            impulse: false,
        },
        Action::Backward => ImpulseSpec::Force {
            vector: Vec3::new(0.0, 0.0, drive_force),
            frame: ReferenceFrame::Local,
            impulse: false,
        },
        Action::TurnLeft => ImpulseSpec::Torque {
            axis: Vec3::Y,
            magnitude: turn_torque,
            frame: ReferenceFrame::Local,
            impulse: false,
        },
        Action::TurnRight => ImpulseSpec::Torque {
            axis: Vec3::Y,
            magnitude: -turn_torque,
            frame: ReferenceFrame::Local,
            impulse: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_map_action_deterministic() {
        for action in Action::ALL {
            assert_eq!(map_action(action), map_action(action));
        }
    }

    #[test]
    fn test_forward_backward_are_inverses() {
        let (f, b) = (map_action(Action::Forward), map_action(Action::Backward));
        match (f, b) {
            (
                ImpulseSpec::Force { vector: vf, frame: ff, impulse: pf },
                ImpulseSpec::Force { vector: vb, frame: fb, impulse: pb },
            ) => {
                assert_eq!(vf, -vb);
                assert_eq!(ff, fb);
                assert!(!pf && !pb);
            }
            _ => panic!("drive actions must map to forces"),
        }
    }

    #[test]
    fn test_turns_are_inverses() {
        let (l, r) = (map_action(Action::TurnLeft), map_action(Action::TurnRight));
        match (l, r) {
            (
                ImpulseSpec::Torque { axis: al, magnitude: ml, .. },
                ImpulseSpec::Torque { axis: ar, magnitude: mr, .. },
            ) => {
                assert_eq!(al, ar);
                assert_eq!(al, Vec3::Y);
                assert_eq!(ml, -mr);
            }
            _ => panic!("turn actions must map to torques"),
        }
    }

    #[test]
    fn test_forward_is_negative_z() {
        match map_action(Action::Forward) {
            ImpulseSpec::Force { vector, frame, .. } => {
                assert_eq!(vector, Vec3::new(0.0, 0.0, -DRIVE_FORCE));
                assert_eq!(frame, ReferenceFrame::Local);
            }
            _ => panic!("forward must be a force"),
        }
    }

    #[test]
    fn test_tuned_magnitudes_keep_invariants() {
        match map_action_tuned(Action::Forward, 2.0, 0.25) {
            ImpulseSpec::Force { vector, .. } => assert_eq!(vector, Vec3::new(0.0, 0.0, -2.0)),
            _ => panic!("forward must be a force"),
        }
        match (
            map_action_tuned(Action::TurnLeft, 2.0, 0.25),
            map_action_tuned(Action::TurnRight, 2.0, 0.25),
        ) {
            (
                ImpulseSpec::Torque { magnitude: ml, .. },
                ImpulseSpec::Torque { magnitude: mr, .. },
            ) => {
                assert_eq!(ml, 0.25);
                assert_eq!(ml, -mr);
            }
            _ => panic!("turn actions must map to torques"),
        }
    }

    #[test]
    fn test_world_rotation_of_local_force() {
        // Kart yawed 90 degrees: local -Z forward becomes world -X
        let orientation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let world = crate::rotate_to_world(orientation, Vec3::new(0.0, 0.0, -DRIVE_FORCE));
        assert!((world.x - (-DRIVE_FORCE)).abs() < 1e-4);
        assert!(world.y.abs() < 1e-4);
        assert!(world.z.abs() < 1e-4);
    }
}
