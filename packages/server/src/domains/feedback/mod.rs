//! Feedback domain - append-only messages from members to administrators

pub mod actions;
pub mod models;

pub use models::{Feedback, FeedbackEntry};
