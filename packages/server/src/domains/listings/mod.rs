//! Listings domain - vehicle posts and their owner-managed content
//!
//! Moderation state lives on the listing but is changed only through the
//! moderation domain; engagement aggregates only through the engagement domain.

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CreateListingInput, ListingData, ListingFeedQuery, UpdateListingInput};
pub use models::listing::{Condition, Listing, ListingContent, ListingPatch, ListingQuery};
