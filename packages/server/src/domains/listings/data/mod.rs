pub mod listing;
pub mod types;

pub use listing::ListingData;
pub use types::{CreateListingInput, ListingFeedQuery, UpdateListingInput};
