use crate::capture::PointerCapture;
use glam::{Mat4, Vec3};

/// What the movement update needs from a camera: capture state, relative moves, and position.
pub trait CameraRig {
    fn is_locked(&self) -> bool;

    /// Move along the look direction projected onto the ground plane. Positive is forward.
    fn move_forward(&mut self, distance: f32);

    /// Move along the horizontal right vector. Positive is right.
    fn move_right(&mut self, distance: f32);

    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);
}

/// First-person camera coupled to pointer capture.
///
/// Yaw 0 looks down +X; the default yaw of -90° looks down -Z. Camera motion lives outside
/// the scene graph and never mutates it.
#[derive(Debug, Clone)]
pub struct PointerLockRig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Radians of rotation per pixel of mouse travel.
    pub sensitivity: f32,
    pub capture: PointerCapture,
}

impl Default for PointerLockRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.65, 8.0),
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
            fov: 70.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 200.0,
            sensitivity: 0.002,
            capture: PointerCapture::new(),
        }
    }
}

impl PointerLockRig {
    /// Request pointer capture. Returns true when the platform should be asked for it.
    /// Completion arrives later through [`PointerCapture::grant`].
    pub fn lock(&mut self) -> bool {
        self.capture.request()
    }

    /// Full look direction, including pitch.
    pub fn look_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Look direction flattened onto the ground plane.
    pub fn ground_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    pub fn ground_right(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Apply raw mouse motion. Ignored unless the pointer is captured.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if !self.capture.is_locked() {
            return;
        }
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.look_direction(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl CameraRig for PointerLockRig {
    fn is_locked(&self) -> bool {
        self.capture.is_locked()
    }

    fn move_forward(&mut self, distance: f32) {
        self.position += self.ground_forward() * distance;
    }

    fn move_right(&mut self, distance: f32) {
        self.position += self.ground_right() * distance;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
