//! Session state machine and scene command buffer
//!
//! One `Session` owns the tracked plane, the control pad, and the pending
//! commands for the host. The host delivers AR/tap/button events, calls
//! `advance(dt)` from its frame loop, and drains commands to apply to its
//! scene graph and physics engine. All mutation happens on that one thread;
//! the session holds no interior locks.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::control::{Action, ImpulseSpec, map_action_tuned};
use super::pad::ControlPad;
use super::placement::placement_point_cleared;
use super::track::{AnchorId, PlaneRegion, TrackState, Wall};
use crate::config::Tuning;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No horizontal plane seen yet
    AwaitingPlane,
    /// A plane is tracked and the track is built; waiting for a placement tap
    PlaneTracked,
    /// Kart is on the mat; driving and re-placement are live
    KartPlaced,
}

/// Why an event was ignored.
///
/// None of these are fatal: every rejection degrades to inaction, per the
/// demo's "never crash mid-session" posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The event needs geometry (a plane or a placed kart) that doesn't
    /// exist yet
    MissingGeometry,
    /// The event carried unusable geometry (non-finite or negative extents)
    InvalidAnchor,
    /// A second distinct plane while one is tracked; first plane wins
    ConcurrentPlaneConflict,
}

/// Physics collision categories, matching the bitmask scheme the host
/// assigns to bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum BodyCategory {
    Kart = 1,
    Mat = 2,
    Barrier = 4,
}

impl BodyCategory {
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Collision mask: which categories this body collides with
    pub fn collides_with(self) -> u32 {
        match self {
            BodyCategory::Kart => BodyCategory::Mat.bits() | BodyCategory::Barrier.bits(),
            BodyCategory::Mat | BodyCategory::Barrier => BodyCategory::Kart.bits(),
        }
    }
}

/// An instruction for the host's scene graph / physics engine.
///
/// Commands are drained in order; each is a single logical operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneCommand {
    /// Create the mat plane node for the newly tracked region
    ShowMat { region: PlaneRegion },
    /// Resize/re-position the existing mat to the updated region
    ResizeMat { region: PlaneRegion },
    /// Remove all current barrier walls and add these four, atomically:
    /// no frame may render with zero or a partial wall set
    ReplaceWalls { walls: [Wall; 4] },
    /// Clear the kart body's accumulated forces and velocity, then set its
    /// position - one operation, in that order
    PlaceKart { position: Vec3 },
    /// Apply one continuous force/torque to the kart body. Local-frame
    /// forces must be rotated into world space with the body's current
    /// orientation first ([`crate::rotate_to_world`]).
    ApplyImpulse { spec: ImpulseSpec },
}

/// Top-level session state: tracked plane, control pad, pending commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    phase: Phase,
    track: Option<TrackState>,
    pad: ControlPad,
    tuning: Tuning,
    #[serde(skip)]
    commands: Vec<SceneCommand>,
}

impl Session {
    /// Build a session from tuning; out-of-range values are clamped via
    /// [`Tuning::sanitized`] so a hand-built tuning can't flood the
    /// command buffer either.
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: Phase::AwaitingPlane,
            track: None,
            pad: ControlPad::new(),
            tuning: tuning.clone().sanitized(),
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The tracked plane and walls, if a plane has been acquired
    #[inline]
    pub fn track(&self) -> Option<&TrackState> {
        self.track.as_ref()
    }

    /// A new plane was detected by the AR service.
    ///
    /// Only the first plane is accepted; later distinct detections are
    /// ignored so the scene never holds two overlapping mats.
    pub fn on_plane_detected(
        &mut self,
        anchor: AnchorId,
        region: PlaneRegion,
    ) -> Result<(), Rejection> {
        if !region.is_valid() {
            log::debug!("ignoring plane {anchor:?}: invalid geometry");
            return Err(Rejection::InvalidAnchor);
        }
        if let Some(track) = &self.track {
            log::debug!(
                "ignoring plane {anchor:?}: already tracking {:?} (first plane wins)",
                track.anchor()
            );
            return Err(Rejection::ConcurrentPlaneConflict);
        }

        let track = TrackState::with_lift(anchor, region, self.tuning.wall_lift);
        self.commands.push(SceneCommand::ShowMat { region });
        self.commands.push(SceneCommand::ReplaceWalls {
            walls: *track.walls(),
        });
        self.track = Some(track);
        self.phase = Phase::PlaneTracked;
        log::info!(
            "tracking plane {anchor:?}: {:.2} x {:.2} at {:?}",
            region.extent_width,
            region.extent_height,
            region.center
        );
        Ok(())
    }

    /// The tracked plane's geometry was refined by the AR service.
    ///
    /// Resizes the mat and rebuilds all four walls in one step. Updates for
    /// any other anchor are ignored.
    pub fn on_plane_updated(
        &mut self,
        anchor: AnchorId,
        region: PlaneRegion,
    ) -> Result<(), Rejection> {
        if !region.is_valid() {
            log::debug!("ignoring update for {anchor:?}: invalid geometry");
            return Err(Rejection::InvalidAnchor);
        }
        let Some(track) = &mut self.track else {
            log::debug!("ignoring update for {anchor:?}: no tracked plane");
            return Err(Rejection::MissingGeometry);
        };
        if track.anchor() != anchor {
            log::debug!(
                "ignoring update for {anchor:?}: tracking {:?}",
                track.anchor()
            );
            return Err(Rejection::ConcurrentPlaneConflict);
        }

        let walls = *track.update(region);
        self.commands.push(SceneCommand::ResizeMat { region });
        self.commands.push(SceneCommand::ReplaceWalls { walls });
        Ok(())
    }

    /// A placement tap, already hit-tested to a world point on the mat.
    ///
    /// Re-tapping while placed moves the kart: its kinetic state is reset
    /// and it is set down at the new point.
    pub fn on_tap(&mut self, tap_world_point: Vec3) -> Result<(), Rejection> {
        if self.track.is_none() {
            log::debug!("ignoring tap: no tracked plane to place on");
            return Err(Rejection::MissingGeometry);
        }
        if !tap_world_point.is_finite() {
            log::debug!("ignoring tap: non-finite hit point");
            return Err(Rejection::InvalidAnchor);
        }

        let position = placement_point_cleared(tap_world_point, self.tuning.placement_clearance);
        self.commands.push(SceneCommand::PlaceKart { position });
        self.phase = Phase::KartPlaced;
        log::info!("kart placed at {position:?}");
        Ok(())
    }

    /// A control button went down. Re-press restarts the repeat interval.
    pub fn press(&mut self, action: Action) {
        self.pad.press_with_interval(action, self.tuning.repeat_interval);
    }

    /// A control button came up. Idempotent; no fire for this action can
    /// be observed after this returns.
    pub fn release(&mut self, action: Action) {
        self.pad.release(action);
    }

    /// Advance held buttons by `dt`, queuing one impulse per fire.
    ///
    /// Fires before the kart is placed are dropped (silent no-op).
    pub fn advance(&mut self, dt: f32) {
        let fired = self.pad.advance(dt);
        if fired.is_empty() {
            return;
        }
        if self.phase != Phase::KartPlaced {
            log::debug!("dropping {} control fire(s): kart not placed", fired.len());
            return;
        }
        for action in fired {
            self.commands.push(SceneCommand::ApplyImpulse {
                spec: map_action_tuned(action, self.tuning.drive_force, self.tuning.turn_torque),
            });
        }
    }

    /// Take all pending commands, oldest first
    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&Tuning::default())
    }

    fn region(w: f32, h: f32) -> PlaneRegion {
        PlaneRegion::new(Vec3::new(0.0, -0.5, 0.0), w, h)
    }

    #[test]
    fn test_first_plane_wins() {
        let mut s = session();
        assert!(s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).is_ok());
        let err = s.on_plane_detected(AnchorId(2), region(9.0, 9.0));
        assert_eq!(err, Err(Rejection::ConcurrentPlaneConflict));

        let track = s.track().expect("plane tracked");
        assert_eq!(track.anchor(), AnchorId(1));
        assert_eq!(track.region().extent_width, 1.0);
    }

    #[test]
    fn test_update_for_foreign_anchor_ignored() {
        let mut s = session();
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        let err = s.on_plane_updated(AnchorId(2), region(5.0, 5.0));
        assert_eq!(err, Err(Rejection::ConcurrentPlaneConflict));
        assert_eq!(s.track().unwrap().region().extent_width, 1.0);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let mut s = session();
        assert_eq!(
            s.on_plane_detected(AnchorId(1), region(-1.0, 1.0)),
            Err(Rejection::InvalidAnchor)
        );
        assert_eq!(s.phase(), Phase::AwaitingPlane);
        assert!(s.drain_commands().is_empty());
    }

    #[test]
    fn test_update_replaces_walls_atomically() {
        let mut s = session();
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        s.drain_commands();

        s.on_plane_updated(AnchorId(1), region(2.0, 3.0)).unwrap();
        let commands = s.drain_commands();

        // Exactly one wall command per update, carrying all four walls
        let wall_cmds: Vec<_> = commands
            .iter()
            .filter(|c| matches!(c, SceneCommand::ReplaceWalls { .. }))
            .collect();
        assert_eq!(wall_cmds.len(), 1);
        if let SceneCommand::ReplaceWalls { walls } = wall_cmds[0] {
            assert_eq!(walls.len(), 4);
            assert_eq!(walls[0].length, 2.0);
        }
        // Tracked state always holds a full wall set
        assert_eq!(s.track().unwrap().walls().len(), 4);
    }

    #[test]
    fn test_tap_before_plane_is_noop() {
        let mut s = session();
        assert_eq!(
            s.on_tap(Vec3::new(0.0, 0.0, 0.0)),
            Err(Rejection::MissingGeometry)
        );
        assert_eq!(s.phase(), Phase::AwaitingPlane);
        assert!(s.drain_commands().is_empty());
    }

    #[test]
    fn test_tap_places_with_clearance() {
        let mut s = session();
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        s.drain_commands();

        s.on_tap(Vec3::new(0.2, -0.5, 0.1)).unwrap();
        assert_eq!(s.phase(), Phase::KartPlaced);

        let commands = s.drain_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0],
            SceneCommand::PlaceKart {
                position: Vec3::new(0.2, -0.4, 0.1)
            }
        );
    }

    #[test]
    fn test_retap_moves_kart() {
        let mut s = session();
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        s.on_tap(Vec3::ZERO).unwrap();
        s.on_tap(Vec3::new(0.3, 0.0, 0.3)).unwrap();
        assert_eq!(s.phase(), Phase::KartPlaced);

        let places: Vec<_> = s
            .drain_commands()
            .into_iter()
            .filter(|c| matches!(c, SceneCommand::PlaceKart { .. }))
            .collect();
        assert_eq!(places.len(), 2);
        assert_ne!(places[0], places[1]);
    }

    #[test]
    fn test_fires_before_placement_are_dropped() {
        let mut s = session();
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        s.drain_commands();

        s.press(Action::Forward);
        s.advance(0.1);
        assert!(s.drain_commands().is_empty());
    }

    #[test]
    fn test_held_forward_applies_forces() {
        let mut s = session();
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        s.on_tap(Vec3::ZERO).unwrap();
        s.drain_commands();

        s.press(Action::Forward);
        s.advance(0.05); // 5 fires at the default 10 ms cadence
        s.release(Action::Forward);
        s.advance(0.05); // nothing after release

        let impulses: Vec<_> = s
            .drain_commands()
            .into_iter()
            .filter(|c| matches!(c, SceneCommand::ApplyImpulse { .. }))
            .collect();
        assert_eq!(impulses.len(), 5);
        assert!(impulses.iter().all(|c| matches!(
            c,
            SceneCommand::ApplyImpulse {
                spec: ImpulseSpec::Force { .. }
            }
        )));
    }

    #[test]
    fn test_tuned_values_flow_through() {
        let tuning = Tuning {
            drive_force: 2.0,
            turn_torque: 0.25,
            placement_clearance: 0.2,
            wall_lift: 0.05,
            ..Tuning::default()
        };
        let mut s = Session::new(&tuning);

        let r = PlaneRegion::new(Vec3::ZERO, 1.0, 1.0);
        s.on_plane_detected(AnchorId(1), r).unwrap();
        let commands = s.drain_commands();
        let Some(SceneCommand::ReplaceWalls { walls }) = commands.last() else {
            panic!("expected walls after detection");
        };
        for wall in walls {
            assert_eq!(wall.position.y, 0.05);
        }

        s.on_tap(Vec3::ZERO).unwrap();
        assert_eq!(
            s.drain_commands(),
            vec![SceneCommand::PlaceKart {
                position: Vec3::new(0.0, 0.2, 0.0)
            }]
        );

        s.press(Action::Forward);
        s.press(Action::TurnLeft);
        s.advance(0.02);
        for command in s.drain_commands() {
            match command {
                SceneCommand::ApplyImpulse {
                    spec: ImpulseSpec::Force { vector, .. },
                } => assert_eq!(vector, Vec3::new(0.0, 0.0, -2.0)),
                SceneCommand::ApplyImpulse {
                    spec: ImpulseSpec::Torque { magnitude, .. },
                } => assert_eq!(magnitude, 0.25),
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn test_zero_repeat_interval_is_bounded() {
        let tuning = Tuning {
            repeat_interval: 0.0,
            ..Tuning::default()
        };
        let mut s = Session::new(&tuning);
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        s.on_tap(Vec3::ZERO).unwrap();
        s.drain_commands();

        s.press(Action::Forward);
        s.advance(crate::consts::SIM_DT);
        // Clamped to the 1 ms floor: at most ~8 fires per 120 Hz step
        let fires = s.drain_commands().len();
        assert!((1..=9).contains(&fires), "got {fires} fires");
    }

    #[test]
    fn test_no_new_plane_after_placement() {
        let mut s = session();
        s.on_plane_detected(AnchorId(1), region(1.0, 1.0)).unwrap();
        s.on_tap(Vec3::ZERO).unwrap();
        assert_eq!(
            s.on_plane_detected(AnchorId(3), region(2.0, 2.0)),
            Err(Rejection::ConcurrentPlaneConflict)
        );
        // But updates to the tracked plane still land
        assert!(s.on_plane_updated(AnchorId(1), region(2.0, 2.0)).is_ok());
        assert_eq!(s.phase(), Phase::KartPlaced);
    }

    #[test]
    fn test_body_category_masks() {
        assert_eq!(BodyCategory::Kart.bits(), 1);
        assert_eq!(BodyCategory::Mat.bits(), 2);
        assert_eq!(BodyCategory::Barrier.bits(), 4);
        assert_eq!(BodyCategory::Kart.collides_with(), 6);
        assert_eq!(BodyCategory::Barrier.collides_with(), 1);
    }
}
