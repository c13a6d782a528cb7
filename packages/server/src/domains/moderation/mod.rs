//! Moderation domain - the gate between a posted listing and the public feed

pub mod actions;
pub mod visibility;

pub use visibility::{is_visible, retain_visible};
