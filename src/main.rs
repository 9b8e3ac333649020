//! RC Kart entry point
//!
//! Runs a scripted headless session: a plane is detected and refined, the
//! kart is placed by a tap, then driven with held forward/turn buttons.
//! Drained scene commands stand in for a real scene graph and physics
//! engine; a host application would apply them instead of logging them.

use std::path::Path;

use glam::Vec3;

use rc_kart::Tuning;
use rc_kart::consts::MAX_SUBSTEPS;
use rc_kart::sim::{Action, AnchorId, PlaneRegion, SceneCommand, Session};

/// Demo host loop: fixed-rate frames feeding a fixed-timestep session
struct Demo {
    session: Session,
    tuning: Tuning,
    accumulator: f32,
    /// Sim time in completed substeps
    time: f32,
    commands_applied: usize,
    impulses_applied: usize,
}

impl Demo {
    fn new(tuning: Tuning) -> Self {
        Self {
            session: Session::new(&tuning),
            tuning,
            accumulator: 0.0,
            time: 0.0,
            commands_applied: 0,
            impulses_applied: 0,
        }
    }

    /// Advance one host frame of `frame_dt` seconds
    fn frame(&mut self, frame_dt: f32) {
        let dt = self.tuning.dt();
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            self.run_script(self.time);
            self.session.advance(dt);
            self.accumulator -= dt;
            self.time += dt;
            substeps += 1;
        }

        for command in self.session.drain_commands() {
            self.apply(command);
        }
    }

    /// Scripted stand-ins for AR and touch events, keyed on sim time
    fn run_script(&mut self, t: f32) {
        let dt = self.tuning.dt();
        let at = |mark: f32| t <= mark && mark < t + dt;
        let mat_y = -0.4;

        if at(0.0) {
            let region = PlaneRegion::new(Vec3::new(0.0, mat_y, -0.5), 0.6, 0.4);
            let _ = self.session.on_plane_detected(AnchorId(1), region);
        }
        if at(0.25) {
            // Tracking refines the plane as the camera moves
            let region = PlaneRegion::new(Vec3::new(0.05, mat_y, -0.5), 1.0, 0.7);
            let _ = self.session.on_plane_updated(AnchorId(1), region);
        }
        if at(0.4) {
            // A second surface shows up; first plane wins
            let region = PlaneRegion::new(Vec3::new(2.0, 0.1, 0.0), 0.5, 0.5);
            let _ = self.session.on_plane_detected(AnchorId(2), region);
        }
        if at(0.5) {
            let region = PlaneRegion::new(Vec3::new(0.05, mat_y, -0.5), 1.2, 0.8);
            let _ = self.session.on_plane_updated(AnchorId(1), region);
        }
        if at(0.75) {
            let _ = self.session.on_tap(Vec3::new(0.1, mat_y, -0.5));
        }
        if at(1.0) {
            self.session.press(Action::Forward);
        }
        if at(1.5) {
            self.session.press(Action::TurnLeft);
        }
        if at(2.0) {
            self.session.release(Action::Forward);
            self.session.release(Action::TurnLeft);
        }
    }

    fn apply(&mut self, command: SceneCommand) {
        self.commands_applied += 1;
        match &command {
            SceneCommand::ApplyImpulse { .. } => {
                self.impulses_applied += 1;
                // ~100 Hz while held; keep per-fire logging at trace
                log::trace!("[{:6.3}s] {command:?}", self.time);
            }
            _ => {
                if self.tuning.log_commands {
                    log::info!("[{:6.3}s] {command:?}", self.time);
                } else {
                    log::debug!("[{:6.3}s] {command:?}", self.time);
                }
            }
        }
    }
}

fn main() -> std::process::ExitCode {
    env_logger::init();

    let tuning = match Tuning::load(Path::new("tuning.json")) {
        Ok(t) => t,
        Err(e) => {
            log::error!("{e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    log::info!(
        "rc-kart demo starting ({} Hz sim, {:.0} Hz control repeat)",
        tuning.sim_hz,
        1.0 / tuning.repeat_interval
    );

    let mut demo = Demo::new(tuning);
    // 2.5 seconds of session at 60 FPS host frames
    let frame_dt = 1.0 / 60.0;
    for _ in 0..150 {
        demo.frame(frame_dt);
    }

    log::info!(
        "demo finished: phase {:?}, {} commands ({} impulses)",
        demo.session.phase(),
        demo.commands_applied,
        demo.impulses_applied
    );
    std::process::ExitCode::SUCCESS
}
