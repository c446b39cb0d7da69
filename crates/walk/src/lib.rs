//! First-person walking: the pointer-lock camera rig and the per-frame movement update.
//!
//! # Invariants
//! - The camera only moves while pointer capture is active.
//! - After every movement tick the camera is inside the gallery bounds at eye height.
//! - Diagonal movement is no faster than axis-aligned movement.

pub mod capture;
pub mod movement;
pub mod rig;

pub use capture::{CaptureNotice, CaptureState, PointerCapture};
pub use movement::{
    EYE_HEIGHT, GalleryBounds, MAX_FRAME_DT, MovementConfig, MovementStep, SPRINT_SPEED,
    WALK_SPEED, effective_dt, step, walk_direction,
};
pub use rig::{CameraRig, PointerLockRig};
