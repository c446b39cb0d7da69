//! Input: raw key and window events mapped to walkthrough intents.
//!
//! # Invariants
//! - Intents reflect held state only; repeats and unmapped keys never change them.
//! - Tracking input has no side effects beyond the intent snapshot.

pub mod event;
pub mod intent;

pub use event::InputEvent;
pub use intent::{Intent, InputTracker, Intents};
