//! Rendering interface.
//!
//! # Invariants
//! - A renderer reads the scene graph and a view; it never mutates either.
//! - The view is derived from the camera rig each frame.
//!
//! The GPU backend lives in `gallery-render-wgpu`. [`DebugTextRenderer`] produces a plain-text
//! dump of the same inputs for the CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
