use gallery_input::{InputEvent, InputTracker, Intents};
use gallery_scene::{PaintingDescriptor, SceneGraph, build_gallery, default_paintings};
use gallery_walk::{CaptureNotice, MovementConfig, MovementStep, PointerLockRig, effective_dt};
use glam::Vec3;
use std::time::Instant;

/// What the gallery is built from.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub paintings: Vec<PaintingDescriptor>,
    pub particle_seed: u64,
    pub movement: MovementConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            paintings: default_paintings(),
            particle_seed: 42,
            movement: MovementConfig::default(),
        }
    }
}

/// Side effect the window layer must carry out after an event is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Ask the platform for pointer capture; answer with `CaptureGranted`/`CaptureDenied`.
    RequestCapture,
    /// Capture state changed; refresh the hint text.
    Notice(CaptureNotice),
}

fn notice_effect(notice: Option<CaptureNotice>) -> Effect {
    notice.map(Effect::Notice).unwrap_or(Effect::None)
}

/// Measures wall-clock time between frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Seconds since the previous call. The first call reports zero.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt
    }
}

/// Outcome of one frame tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frame time actually integrated, after clamping.
    pub dt: f32,
    /// Distances walked, or `None` when the pointer was not captured.
    pub moved: Option<MovementStep>,
    pub position: Vec3,
}

/// The application state: scene, camera rig, held keys and frame clock.
///
/// Owned by the render loop for the process lifetime. Event handlers and the frame tick both
/// take `&mut self`, so they can never interleave.
pub struct Gallery {
    scene: SceneGraph,
    rig: PointerLockRig,
    input: InputTracker,
    movement: MovementConfig,
    clock: FrameClock,
    frames: u64,
}

impl Gallery {
    pub fn new(config: GalleryConfig) -> Self {
        let scene = build_gallery(&config.paintings, config.particle_seed);
        Self::with_scene(scene, config.movement)
    }

    pub fn with_scene(scene: SceneGraph, movement: MovementConfig) -> Self {
        Self {
            scene,
            rig: PointerLockRig::default(),
            input: InputTracker::new(),
            movement,
            clock: FrameClock::default(),
            frames: 0,
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn rig(&self) -> &PointerLockRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut PointerLockRig {
        &mut self.rig
    }

    pub fn intents(&self) -> Intents {
        self.input.snapshot()
    }

    pub fn hint(&self) -> &'static str {
        self.rig.capture.hint()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply one event. The returned effect tells the window layer what to do next.
    pub fn dispatch(&mut self, event: InputEvent) -> Effect {
        match event {
            InputEvent::Key { code, pressed } => {
                self.input.handle_key(code, pressed);
                Effect::None
            }
            InputEvent::PointerMotion { dx, dy } => {
                self.rig.look(dx, dy);
                Effect::None
            }
            InputEvent::Click => {
                if self.rig.lock() {
                    Effect::RequestCapture
                } else {
                    Effect::None
                }
            }
            InputEvent::CaptureGranted => notice_effect(self.rig.capture.grant()),
            InputEvent::CaptureDenied => {
                self.rig.capture.deny();
                Effect::None
            }
            InputEvent::CaptureReleased => notice_effect(self.rig.capture.release()),
            InputEvent::FocusLost => {
                self.input.clear();
                notice_effect(self.rig.capture.release())
            }
            InputEvent::Resized { width, height } => {
                self.rig.set_viewport(width, height);
                Effect::None
            }
        }
    }

    /// Tick using the wall clock.
    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let raw = self.clock.tick(now);
        self.advance(raw)
    }

    /// Tick with an explicit frame time: drift the particles, then walk if captured.
    ///
    /// The clamped dt drives the particles and the report; `step` applies the same clamp to it
    /// again, which leaves it unchanged.
    pub fn advance(&mut self, raw_dt: f32) -> FrameReport {
        let _span = tracing::debug_span!("frame", n = self.frames).entered();
        let dt = effective_dt(raw_dt, self.movement.max_dt);

        if let Some(particles) = self.scene.particles_mut() {
            particles.advance(dt);
        }

        let intents = self.input.snapshot();
        let moved = gallery_walk::step(&mut self.rig, &intents, dt, &self.movement);
        self.frames += 1;

        FrameReport {
            dt,
            moved,
            position: self.rig.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_walk::EYE_HEIGHT;
    use std::time::Duration;
    use winit::keyboard::KeyCode;

    fn gallery() -> Gallery {
        Gallery::new(GalleryConfig::default())
    }

    fn enter(g: &mut Gallery) {
        assert_eq!(g.dispatch(InputEvent::Click), Effect::RequestCapture);
        assert_eq!(
            g.dispatch(InputEvent::CaptureGranted),
            Effect::Notice(CaptureNotice::Locked)
        );
    }

    #[test]
    fn click_then_grant_locks_and_switches_hint() {
        let mut g = gallery();
        assert!(g.hint().starts_with("Click to enter"));
        enter(&mut g);
        assert!(g.rig().capture.is_locked());
        assert!(!g.hint().starts_with("Click"));
    }

    #[test]
    fn held_keys_do_nothing_until_locked() {
        let mut g = gallery();
        g.dispatch(InputEvent::key_down(KeyCode::KeyW));
        let start = g.rig().position;
        for _ in 0..30 {
            let r = g.advance(0.016);
            assert_eq!(r.moved, None);
        }
        assert_eq!(g.rig().position, start);

        enter(&mut g);
        let r = g.advance(0.016);
        assert!(r.moved.is_some());
        // forward passes its backward-pointing z through, so the camera backs toward +Z
        assert!(g.rig().position.z > start.z);
    }

    #[test]
    fn capture_denied_camera_never_moves() {
        let mut g = gallery();
        g.dispatch(InputEvent::Click);
        assert_eq!(g.dispatch(InputEvent::CaptureDenied), Effect::None);
        g.dispatch(InputEvent::key_down(KeyCode::KeyW));
        g.dispatch(InputEvent::key_down(KeyCode::ShiftLeft));
        let start = g.rig().position;
        for _ in 0..120 {
            g.advance(0.016);
        }
        assert_eq!(g.rig().position, start);
        assert!(g.hint().starts_with("Click to enter"));
    }

    #[test]
    fn escape_release_stops_walking() {
        let mut g = gallery();
        enter(&mut g);
        g.dispatch(InputEvent::key_down(KeyCode::KeyD));
        g.advance(0.02);
        assert_eq!(
            g.dispatch(InputEvent::CaptureReleased),
            Effect::Notice(CaptureNotice::Unlocked)
        );
        let held = g.rig().position;
        g.advance(0.02);
        assert_eq!(g.rig().position, held);
        // the key is still held; it just has no effect while unlocked
        assert!(g.intents().right);
    }

    #[test]
    fn focus_loss_releases_capture_and_keys() {
        let mut g = gallery();
        enter(&mut g);
        g.dispatch(InputEvent::key_down(KeyCode::KeyW));
        assert_eq!(
            g.dispatch(InputEvent::FocusLost),
            Effect::Notice(CaptureNotice::Unlocked)
        );
        assert!(g.intents().is_idle());
    }

    #[test]
    fn particles_drift_even_while_unlocked() {
        let mut g = gallery();
        g.advance(0.02);
        let r = g.scene().particles().unwrap().rotation_y();
        assert!((r - 0.02 * 0.06).abs() < 1e-7);
    }

    #[test]
    fn long_pause_is_clamped() {
        let mut g = gallery();
        enter(&mut g);
        g.dispatch(InputEvent::key_down(KeyCode::KeyW));
        let r = g.advance(3.0);
        assert_eq!(r.dt, 0.033);
        let walked = g.rig().position.z - 8.0;
        assert!((walked - 4.2 * 0.033).abs() < 1e-5);
    }

    #[test]
    fn position_stays_in_bounds_at_eye_height() {
        let mut g = gallery();
        enter(&mut g);
        g.dispatch(InputEvent::key_down(KeyCode::KeyW));
        g.dispatch(InputEvent::key_down(KeyCode::KeyA));
        g.dispatch(InputEvent::key_down(KeyCode::ShiftRight));
        for _ in 0..1_000 {
            let r = g.advance(0.033);
            assert!((-26.0..=26.0).contains(&r.position.x));
            assert!((-28.0..=20.0).contains(&r.position.z));
            assert_eq!(r.position.y, EYE_HEIGHT);
        }
    }

    #[test]
    fn mouse_look_changes_walk_heading() {
        let mut g = gallery();
        enter(&mut g);
        // quarter turn to the right: now facing +X, so W carries the camera toward -X
        let px = std::f32::consts::FRAC_PI_2 / g.rig().sensitivity;
        g.dispatch(InputEvent::PointerMotion { dx: px, dy: 0.0 });
        g.dispatch(InputEvent::key_down(KeyCode::KeyW));
        g.advance(0.02);
        assert!(g.rig().position.x < -0.05);
        assert!((g.rig().position.z - 8.0).abs() < 1e-3);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut g = gallery();
        g.dispatch(InputEvent::Resized {
            width: 1000,
            height: 500,
        });
        assert_eq!(g.rig().aspect, 2.0);
    }

    #[test]
    fn frame_clock_measures_between_calls() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now();
        assert_eq!(clock.tick(t0), 0.0);
        let dt = clock.tick(t0 + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-6);
    }

    #[test]
    fn frame_uses_measured_time() {
        let mut g = gallery();
        let t0 = Instant::now();
        assert_eq!(g.frame(t0).dt, 0.0);
        let r = g.frame(t0 + Duration::from_millis(10));
        assert!((r.dt - 0.01).abs() < 1e-6);
        assert_eq!(g.frames(), 2);
    }
}
