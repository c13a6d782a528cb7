//! Postgres-backed stores. Every method delegates to the model's SQL.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    BaseCommentStore, BaseEngagementStore, BaseFeedbackStore, BaseListingStore, StoreError,
};
use crate::common::{CommentId, ListingId, MemberId};
use crate::domains::comments::models::Comment;
use crate::domains::engagement::models::{
    Favorite, FavoriteToggle, RatingEntry, RatingSummary, Score,
};
use crate::domains::feedback::models::{Feedback, FeedbackEntry};
use crate::domains::listings::models::{Listing, ListingPatch, ListingQuery};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseListingStore for PostgresStore {
    async fn insert(&self, listing: &Listing) -> Result<(), StoreError> {
        listing.insert(&self.pool).await
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        Listing::find_by_id(id, &self.pool).await
    }

    async fn list(&self, query: &ListingQuery) -> Result<Vec<Listing>, StoreError> {
        Listing::find_matching(query, &self.pool).await
    }

    async fn update_content(
        &self,
        id: ListingId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, StoreError> {
        Listing::update_content(id, patch, &self.pool).await
    }

    async fn set_authorized(
        &self,
        id: ListingId,
        authorized: bool,
    ) -> Result<Option<Listing>, StoreError> {
        Listing::set_authorized(id, authorized, &self.pool).await
    }

    async fn delete(&self, id: ListingId) -> Result<bool, StoreError> {
        Listing::delete(id, &self.pool).await
    }
}

#[async_trait]
impl BaseEngagementStore for PostgresStore {
    async fn toggle_favorite(
        &self,
        listing_id: ListingId,
        member_id: MemberId,
    ) -> Result<Option<FavoriteToggle>, StoreError> {
        Favorite::toggle(listing_id, member_id, &self.pool).await
    }

    async fn upsert_rating(
        &self,
        listing_id: ListingId,
        member_id: MemberId,
        score: Score,
    ) -> Result<Option<RatingSummary>, StoreError> {
        RatingEntry::upsert(listing_id, member_id, score, &self.pool).await
    }
}

#[async_trait]
impl BaseCommentStore for PostgresStore {
    async fn insert(&self, comment: &Comment) -> Result<(), StoreError> {
        comment.insert(&self.pool).await
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        Comment::find_by_id(id, &self.pool).await
    }

    async fn list_for_listing(&self, listing_id: ListingId) -> Result<Vec<Comment>, StoreError> {
        Comment::find_for_listing(listing_id, &self.pool).await
    }

    async fn update_text(&self, id: CommentId, text: &str) -> Result<Option<Comment>, StoreError> {
        Comment::update_text(id, text, &self.pool).await
    }

    async fn delete(&self, id: CommentId) -> Result<bool, StoreError> {
        Comment::delete(id, &self.pool).await
    }
}

#[async_trait]
impl BaseFeedbackStore for PostgresStore {
    async fn append(&self, feedback: &Feedback) -> Result<(), StoreError> {
        feedback.insert(&self.pool).await
    }

    async fn list_newest_first(&self) -> Result<Vec<FeedbackEntry>, StoreError> {
        Feedback::find_all_with_submitters(&self.pool).await
    }
}
