// TestDependencies - in-memory stores for testing
//
// Provides an in-memory implementation of every store trait that can be
// injected into ServerDeps for tests, plus failure injection for exercising
// the engagement retry path.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::{
    BaseCommentStore, BaseEngagementStore, BaseFeedbackStore, BaseListingStore, RetryPolicy,
    ServerDeps, StoreError,
};
use crate::common::{CommentId, ListingId, MemberId};
use crate::domains::auth::JwtService;
use crate::domains::comments::models::Comment;
use crate::domains::engagement::models::{FavoriteToggle, RatingSummary, Score};
use crate::domains::feedback::models::{Feedback, FeedbackEntry};
use crate::domains::listings::models::{Listing, ListingPatch, ListingQuery};
use crate::domains::member::models::MemberProfile;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

// =============================================================================
// Injected failures
// =============================================================================

/// A failure the in-memory store reports instead of performing an
/// engagement mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Unavailable,
    Contention,
}

impl InjectedFailure {
    fn into_error(self) -> StoreError {
        match self {
            InjectedFailure::Unavailable => StoreError::Unavailable("injected outage".into()),
            InjectedFailure::Contention => StoreError::Contention("injected contention".into()),
        }
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Every store trait over process memory.
///
/// Each listing sits behind its own mutex, so engagement mutations on one
/// listing serialize while different listings proceed in parallel.
/// Comments and feedback keep insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    listings: RwLock<HashMap<ListingId, Arc<Mutex<Listing>>>>,
    comments: RwLock<Vec<Comment>>,
    feedback: RwLock<Vec<Feedback>>,
    members: RwLock<HashMap<MemberId, MemberProfile>>,
    engagement_failures: Mutex<VecDeque<InjectedFailure>>,
    engagement_calls: Mutex<u32>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile to the member directory
    pub async fn register_member(&self, profile: MemberProfile) {
        self.members.write().await.insert(profile.id, profile);
    }

    /// Make the next `times` engagement mutations fail with `failure`
    pub async fn fail_engagement(&self, failure: InjectedFailure, times: usize) {
        let mut failures = self.engagement_failures.lock().await;
        failures.extend(std::iter::repeat(failure).take(times));
    }

    /// Engagement mutations attempted so far, including injected failures
    pub async fn engagement_calls(&self) -> u32 {
        *self.engagement_calls.lock().await
    }

    /// Snapshot of a listing, bypassing visibility
    pub async fn listing(&self, id: ListingId) -> Option<Listing> {
        let entry = self.listing_entry(id).await?;
        let listing = entry.lock().await;
        Some(listing.clone())
    }

    async fn listing_entry(&self, id: ListingId) -> Option<Arc<Mutex<Listing>>> {
        self.listings.read().await.get(&id).cloned()
    }

    async fn begin_engagement(&self) -> Result<(), StoreError> {
        *self.engagement_calls.lock().await += 1;
        match self.engagement_failures.lock().await.pop_front() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BaseListingStore for InMemoryStore {
    async fn insert(&self, listing: &Listing) -> Result<(), StoreError> {
        let mut listings = self.listings.write().await;
        if listings.contains_key(&listing.id) {
            return Err(StoreError::Constraint(format!(
                "listing {} already exists",
                listing.id
            )));
        }
        listings.insert(listing.id, Arc::new(Mutex::new(listing.clone())));
        Ok(())
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        Ok(self.listing(id).await)
    }

    async fn list(&self, query: &ListingQuery) -> Result<Vec<Listing>, StoreError> {
        let entries: Vec<_> = self.listings.read().await.values().cloned().collect();

        let mut matching = Vec::new();
        for entry in entries {
            let listing = entry.lock().await;
            if query.matches(&listing) {
                matching.push(listing.clone());
            }
        }
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matching)
    }

    async fn update_content(
        &self,
        id: ListingId,
        patch: &ListingPatch,
    ) -> Result<Option<Listing>, StoreError> {
        let Some(entry) = self.listing_entry(id).await else {
            return Ok(None);
        };
        let mut listing = entry.lock().await;
        patch.apply(&mut listing.content);
        listing.updated_at = Utc::now();
        Ok(Some(listing.clone()))
    }

    async fn set_authorized(
        &self,
        id: ListingId,
        authorized: bool,
    ) -> Result<Option<Listing>, StoreError> {
        let Some(entry) = self.listing_entry(id).await else {
            return Ok(None);
        };
        let mut listing = entry.lock().await;
        listing.is_authorized = authorized;
        listing.updated_at = Utc::now();
        Ok(Some(listing.clone()))
    }

    async fn delete(&self, id: ListingId) -> Result<bool, StoreError> {
        let removed = self.listings.write().await.remove(&id).is_some();
        if removed {
            self.comments
                .write()
                .await
                .retain(|comment| comment.listing_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl BaseEngagementStore for InMemoryStore {
    async fn toggle_favorite(
        &self,
        listing_id: ListingId,
        member_id: MemberId,
    ) -> Result<Option<FavoriteToggle>, StoreError> {
        self.begin_engagement().await?;
        let Some(entry) = self.listing_entry(listing_id).await else {
            return Ok(None);
        };

        let mut listing = entry.lock().await;
        let favorited = if listing.favorited_by.remove(&member_id) {
            false
        } else {
            listing.favorited_by.insert(member_id);
            true
        };
        listing.recompute_aggregates();

        Ok(Some(FavoriteToggle {
            favorited,
            favorites_count: listing.favorites_count,
        }))
    }

    async fn upsert_rating(
        &self,
        listing_id: ListingId,
        member_id: MemberId,
        score: Score,
    ) -> Result<Option<RatingSummary>, StoreError> {
        self.begin_engagement().await?;
        let Some(entry) = self.listing_entry(listing_id).await else {
            return Ok(None);
        };

        let mut listing = entry.lock().await;
        listing.ratings.insert(member_id, score);
        listing.recompute_aggregates();

        Ok(Some(listing.ratings_summary))
    }
}

#[async_trait]
impl BaseCommentStore for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), StoreError> {
        // Held until the push so a concurrent listing delete cannot slip in
        let listings = self.listings.read().await;
        if !listings.contains_key(&comment.listing_id) {
            return Err(StoreError::Constraint(format!(
                "listing {} does not exist",
                comment.listing_id
            )));
        }
        self.comments.write().await.push(comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|comment| comment.id == id).cloned())
    }

    async fn list_for_listing(&self, listing_id: ListingId) -> Result<Vec<Comment>, StoreError> {
        let comments = self.comments.read().await;
        Ok(comments
            .iter()
            .filter(|comment| comment.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn update_text(&self, id: CommentId, text: &str) -> Result<Option<Comment>, StoreError> {
        let mut comments = self.comments.write().await;
        let Some(comment) = comments.iter_mut().find(|comment| comment.id == id) else {
            return Ok(None);
        };
        comment.text = text.to_string();
        comment.edited = true;
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete(&self, id: CommentId) -> Result<bool, StoreError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|comment| comment.id != id);
        Ok(comments.len() < before)
    }
}

#[async_trait]
impl BaseFeedbackStore for InMemoryStore {
    async fn append(&self, feedback: &Feedback) -> Result<(), StoreError> {
        self.feedback.write().await.push(feedback.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<FeedbackEntry>, StoreError> {
        let members = self.members.read().await;
        let mut entries: Vec<FeedbackEntry> = self
            .feedback
            .read()
            .await
            .iter()
            .map(|feedback| FeedbackEntry {
                feedback: feedback.clone(),
                submitter: members.get(&feedback.member_id).cloned(),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.feedback
                .created_at
                .cmp(&a.feedback.created_at)
                .then_with(|| b.feedback.id.cmp(&a.feedback.id))
        });
        Ok(entries)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub store: Arc<InMemoryStore>,
    pub jwt_service: Arc<JwtService>,
    pub retry_policy: RetryPolicy,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            jwt_service: Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                TEST_JWT_ISSUER.to_string(),
            )),
            // Short delays keep retry tests fast
            retry_policy: RetryPolicy::new(3, Duration::from_millis(1)),
        }
    }

    /// Set a pre-populated store
    pub fn with_store(mut self, store: Arc<InMemoryStore>) -> Self {
        self.store = store;
        self
    }

    /// Set the engagement retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Convert into ServerDeps backed by the in-memory store
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store,
            self.jwt_service,
            self.retry_policy,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
