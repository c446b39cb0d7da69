//! Shared types used by every gallery crate.

pub mod types;

pub use types::{NodeId, Rgb, Transform};
