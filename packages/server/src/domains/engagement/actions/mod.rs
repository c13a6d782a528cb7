//! Engagement actions - favorites and ratings
//!
//! Each mutation is one atomic store step per listing (membership or score
//! plus the derived aggregate). Retryable store failures are re-attempted per
//! `ServerDeps::retry_policy`; validation, permission and not-found outcomes
//! surface immediately.

use tracing::{debug, info};

use crate::common::auth::{Actor, Capability};
use crate::common::{ListingId, MarketError, MarketResult, Principal};
use crate::domains::engagement::data::RatingResult;
use crate::domains::engagement::models::{FavoriteToggle, Score};
use crate::kernel::{with_retry, ServerDeps};

/// Flip the caller's favorite on a listing and return the new count.
///
/// Works on pending listings too; favoriting is independent of moderation.
pub async fn toggle_favorite(
    listing_id: ListingId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<FavoriteToggle> {
    let member = Actor::new(principal).can(Capability::Engage).check()?;
    let member_id = member.member_id;

    debug!(listing_id = %listing_id, member_id = %member_id, "Toggling favorite");

    let store = deps.engagement.as_ref();
    let toggle = with_retry(&deps.retry_policy, "toggle_favorite", move || {
        store.toggle_favorite(listing_id, member_id)
    })
    .await?
    .ok_or_else(|| MarketError::not_found("Listing", listing_id))?;

    info!(
        listing_id = %listing_id,
        member_id = %member_id,
        favorited = toggle.favorited,
        favorites_count = toggle.favorites_count,
        "Favorite toggled"
    );

    Ok(toggle)
}

/// Record or replace the caller's score for a listing.
///
/// The score is range-checked before the store is touched; the listing's
/// existence is checked inside the same atomic step that writes the rating.
pub async fn rate_listing(
    listing_id: ListingId,
    score: i64,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<RatingResult> {
    let member = Actor::new(principal).can(Capability::Engage).check()?;
    let member_id = member.member_id;
    let score = Score::new(score)?;

    debug!(listing_id = %listing_id, member_id = %member_id, score = score.value(), "Rating listing");

    let store = deps.engagement.as_ref();
    let summary = with_retry(&deps.retry_policy, "upsert_rating", move || {
        store.upsert_rating(listing_id, member_id, score)
    })
    .await?
    .ok_or_else(|| MarketError::not_found("Listing", listing_id))?;

    info!(
        listing_id = %listing_id,
        member_id = %member_id,
        ratings_count = summary.count,
        "Listing rated"
    );

    Ok(RatingResult::new(summary, score))
}
