//! Gallery scene: a static, append-only scene graph and the routines that assemble it.
//!
//! # Invariants
//! - Nodes are created once at startup and never removed or reparented.
//! - Painting placement depends only on the painting's index in the sequence.
//! - Particle rotation is the only state that changes after assembly.

pub mod graph;
pub mod layout;
pub mod light;
pub mod material;
pub mod painting;
pub mod particles;

pub use graph::{Fog, Geometry, Mesh, SceneGraph, SceneNode, SceneSummary};
pub use layout::{build_gallery, default_paintings};
pub use light::{Light, SpotLight};
pub use material::{Material, MaterialId};
pub use painting::{ACCENT_PALETTE, PaintingDescriptor, PlacedPainting, Placement, hang_paintings};
pub use particles::ParticleField;
