//! Gallery kernel: the one application-state struct the render loop owns.
//!
//! # Invariants
//! - All state changes flow through `dispatch` (events) or `advance`/`frame` (time).
//! - The scene graph is fixed after construction except for particle rotation.
//! - Everything runs on the thread that owns the event loop; no locking.

pub mod gallery;

pub use gallery::{Effect, FrameClock, FrameReport, Gallery, GalleryConfig};
