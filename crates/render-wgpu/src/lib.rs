//! wgpu render backend for the gallery.
//!
//! Draws the hall as instanced boxes and planes under fog, spot and point lights; canvases
//! with images get a textured pipeline, and the dust field is drawn last as blended sprites.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Camera state arrives as a `RenderView` each frame.

mod frame;
mod gpu;
mod mesh;
mod shaders;

pub use frame::MAX_LIGHTS;
pub use gpu::WgpuRenderer;
