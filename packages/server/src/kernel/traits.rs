// Trait definitions for dependency injection
//
// These are STORE traits only - no business logic. Authorization, validation
// and visibility live in the domain actions that call them.
//
// Naming convention: Base* for trait names (e.g., BaseListingStore)

use async_trait::async_trait;
use thiserror::Error;

use crate::common::{CommentId, ListingId, MemberId};
use crate::domains::comments::models::Comment;
use crate::domains::engagement::models::{FavoriteToggle, RatingSummary, Score};
use crate::domains::feedback::models::{Feedback, FeedbackEntry};
use crate::domains::listings::models::{Listing, ListingPatch, ListingQuery};

// =============================================================================
// Store errors
// =============================================================================

/// Failures reported by a store, classified by whether a retry can help.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection or pool trouble; the same request may succeed shortly
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Lost a race for a row (serialization failure, deadlock, lock timeout)
    #[error("write contention: {0}")]
    Contention(String),

    /// A database constraint rejected the write
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Contention(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let message = err.to_string();
        if matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        ) {
            return StoreError::Unavailable(message);
        }

        let code = err
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map(|code| code.into_owned());

        match code.as_deref() {
            // serialization_failure, deadlock_detected, lock_not_available
            Some("40001") | Some("40P01") | Some("55P03") => StoreError::Contention(message),
            // integrity_constraint_violation class
            Some(code) if code.starts_with("23") => StoreError::Constraint(message),
            _ => StoreError::Other(err.into()),
        }
    }
}

// =============================================================================
// Listing Store
// =============================================================================

#[async_trait]
pub trait BaseListingStore: Send + Sync {
    async fn insert(&self, listing: &Listing) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// Listings matching the query, newest first
    async fn list(&self, query: &ListingQuery) -> Result<Vec<Listing>, StoreError>;

    /// Overwrite the patched content fields, leaving the rest as stored;
    /// returns `None` if the listing does not exist
    async fn update_content(
        &self,
        id: ListingId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, StoreError>;

    /// Set the moderation flag; returns `None` if the listing does not exist
    async fn set_authorized(
        &self,
        id: ListingId,
        authorized: bool,
    ) -> Result<Option<Listing>, StoreError>;

    /// Delete the listing with its favorites, ratings and comments
    async fn delete(&self, id: ListingId) -> Result<bool, StoreError>;
}

// =============================================================================
// Engagement Store
// =============================================================================

/// Favorites and ratings mutations.
///
/// Each method is one atomic step per listing: the source collection and its
/// derived aggregate change together, serialized against every other
/// engagement mutation on the same listing. `None` means the listing does not
/// exist.
#[async_trait]
pub trait BaseEngagementStore: Send + Sync {
    async fn toggle_favorite(
        &self,
        listing_id: ListingId,
        member_id: MemberId,
    ) -> Result<Option<FavoriteToggle>, StoreError>;

    async fn upsert_rating(
        &self,
        listing_id: ListingId,
        member_id: MemberId,
        score: Score,
    ) -> Result<Option<RatingSummary>, StoreError>;
}

// =============================================================================
// Comment Store
// =============================================================================

#[async_trait]
pub trait BaseCommentStore: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, StoreError>;

    /// Comments for a listing in insertion order
    async fn list_for_listing(&self, listing_id: ListingId) -> Result<Vec<Comment>, StoreError>;

    /// Replace the text and mark the comment edited
    async fn update_text(&self, id: CommentId, text: &str) -> Result<Option<Comment>, StoreError>;

    async fn delete(&self, id: CommentId) -> Result<bool, StoreError>;
}

// =============================================================================
// Feedback Store
// =============================================================================

/// Append-only feedback inbox.
#[async_trait]
pub trait BaseFeedbackStore: Send + Sync {
    async fn append(&self, feedback: &Feedback) -> Result<(), StoreError>;

    /// All feedback newest first, with the submitter resolved when known
    async fn list_newest_first(&self) -> Result<Vec<FeedbackEntry>, StoreError>;
}
