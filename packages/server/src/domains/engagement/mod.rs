//! Engagement domain - favorites and ratings with their derived aggregates

pub mod actions;
pub mod data;
pub mod models;

pub use data::{RateInput, RatingResult};
pub use models::{FavoriteToggle, RatingEntry, RatingSummary, Score};
