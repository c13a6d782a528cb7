//! Typed ID definitions for all domain entities.
//!
//! ```rust
//! use market_core::common::{ListingId, MemberId};
//!
//! let member_id = MemberId::new();
//! let listing_id = ListingId::new();
//! // let wrong: ListingId = member_id; // compile error
//! # let _ = (member_id, listing_id);
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Member entities (users resolved by the identity context).
pub struct Member;

/// Marker type for Listing entities (vehicle posts).
pub struct Listing;

/// Marker type for Comment entities.
pub struct Comment;

/// Marker type for Feedback entities.
pub struct Feedback;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type MemberId = Id<Member>;

pub type ListingId = Id<Listing>;

pub type CommentId = Id<Comment>;

pub type FeedbackId = Id<Feedback>;
