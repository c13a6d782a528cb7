//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. Every store sits behind a trait so tests can swap in memory.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::{
    BaseCommentStore, BaseEngagementStore, BaseFeedbackStore, BaseListingStore, PostgresStore,
    RetryPolicy,
};

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub listings: Arc<dyn BaseListingStore>,
    /// Favorites and ratings; each call is atomic per listing
    pub engagement: Arc<dyn BaseEngagementStore>,
    pub comments: Arc<dyn BaseCommentStore>,
    pub feedback: Arc<dyn BaseFeedbackStore>,
    /// JWT service for token verification in the HTTP layer
    pub jwt_service: Arc<JwtService>,
    /// Applied to engagement mutations only
    pub retry_policy: RetryPolicy,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        listings: Arc<dyn BaseListingStore>,
        engagement: Arc<dyn BaseEngagementStore>,
        comments: Arc<dyn BaseCommentStore>,
        feedback: Arc<dyn BaseFeedbackStore>,
        jwt_service: Arc<JwtService>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            listings,
            engagement,
            comments,
            feedback,
            jwt_service,
            retry_policy,
        }
    }

    /// All stores backed by one Postgres pool
    pub fn postgres(pool: PgPool, jwt_service: Arc<JwtService>, retry_policy: RetryPolicy) -> Self {
        let store = Arc::new(PostgresStore::new(pool));
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            jwt_service,
            retry_policy,
        )
    }
}
