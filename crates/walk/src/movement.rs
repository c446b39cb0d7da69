use crate::rig::CameraRig;
use gallery_input::Intents;
use glam::{Vec2, Vec3};

pub const WALK_SPEED: f32 = 4.2;
pub const SPRINT_SPEED: f32 = 7.0;
/// Longest frame the walk will integrate, seconds. A stalled tab must not teleport the camera.
pub const MAX_FRAME_DT: f32 = 0.033;
pub const EYE_HEIGHT: f32 = 1.65;

/// Walkable rectangle on the ground plane. Both intervals are closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl GalleryBounds {
    /// The gallery footprint. Deliberately not square: the far end runs deeper than the entrance.
    pub const GALLERY: GalleryBounds = GalleryBounds {
        min_x: -26.0,
        max_x: 26.0,
        min_z: -28.0,
        max_z: 20.0,
    };

    pub fn contains(&self, p: Vec3) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_z..=self.max_z).contains(&p.z)
    }

    /// Clamp onto the rectangle and pin the height.
    pub fn clamp(&self, p: Vec3, height: f32) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min_x, self.max_x),
            height,
            p.z.clamp(self.min_z, self.max_z),
        )
    }
}

impl Default for GalleryBounds {
    fn default() -> Self {
        Self::GALLERY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub max_dt: f32,
    pub eye_height: f32,
    pub bounds: GalleryBounds,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            sprint_speed: SPRINT_SPEED,
            max_dt: MAX_FRAME_DT,
            eye_height: EYE_HEIGHT,
            bounds: GalleryBounds::GALLERY,
        }
    }
}

/// Distances handed to the rig by one movement tick. Zero means the primitive was not called.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementStep {
    pub forward: f32,
    pub right: f32,
}

/// Clamp a measured frame time to `[0, max_dt]`. Non-finite input counts as no time.
pub fn effective_dt(raw: f32, max_dt: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    raw.min(max_dt)
}

/// Unit walk direction in camera space: `x` strafes right, `y` points backward.
///
/// Opposing intents cancel exactly; no intents give the zero vector, never NaN.
pub fn walk_direction(intents: &Intents) -> Vec2 {
    let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
    let raw = Vec2::new(
        axis(intents.right, intents.left),
        axis(intents.back, intents.forward),
    );
    if raw == Vec2::ZERO {
        return Vec2::ZERO;
    }
    raw.normalize()
}

/// One frame of walking.
///
/// Does nothing and returns `None` while the rig is not locked. Otherwise moves along the
/// intent direction, then clamps into the bounds at eye height.
///
/// `dt` is clamped here with [`effective_dt`], so raw frame times are safe to pass. The clamp is
/// idempotent: a caller that already clamped for its own use hands the same value through.
///
/// The backward-pointing `z` of the direction goes to `move_forward` unchanged, so holding
/// forward passes a negative distance.
pub fn step<R: CameraRig + ?Sized>(
    rig: &mut R,
    intents: &Intents,
    dt: f32,
    config: &MovementConfig,
) -> Option<MovementStep> {
    if !rig.is_locked() {
        return None;
    }
    let dt = effective_dt(dt, config.max_dt);
    let speed = if intents.sprint {
        config.sprint_speed
    } else {
        config.walk_speed
    };
    let dir = walk_direction(intents);

    let mut moved = MovementStep::default();
    if dir.y != 0.0 {
        moved.forward = dir.y * speed * dt;
        rig.move_forward(moved.forward);
    }
    if dir.x != 0.0 {
        moved.right = dir.x * speed * dt;
        rig.move_right(moved.right);
    }

    let clamped = config.bounds.clamp(rig.position(), config.eye_height);
    rig.set_position(clamped);
    Some(moved)
}
