//! Moderation actions - admin control over listing visibility
//!
//! Authorize and unauthorize are idempotent: repeating either leaves the flag
//! where it is and still returns the listing.

use tracing::info;

use crate::common::auth::{Actor, Capability};
use crate::common::{ListingId, MarketError, MarketResult, Principal};
use crate::domains::listings::models::{Listing, ListingQuery};
use crate::kernel::ServerDeps;

/// Make a listing publicly visible (admin only)
pub async fn authorize_listing(
    listing_id: ListingId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Listing> {
    set_authorized(listing_id, true, principal, deps).await
}

/// Hide a listing from the public again (admin only)
pub async fn unauthorize_listing(
    listing_id: ListingId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Listing> {
    set_authorized(listing_id, false, principal, deps).await
}

async fn set_authorized(
    listing_id: ListingId,
    authorized: bool,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Listing> {
    let admin = Actor::new(principal)
        .can(Capability::ModerateListing)
        .check()?;

    info!(
        listing_id = %listing_id,
        admin_id = %admin.member_id,
        authorized,
        "Setting listing moderation flag"
    );

    deps.listings
        .set_authorized(listing_id, authorized)
        .await?
        .ok_or_else(|| MarketError::not_found("Listing", listing_id))
}

/// Listings awaiting moderation, newest first (admin only)
pub async fn list_pending_listings(
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Vec<Listing>> {
    Actor::new(principal)
        .can(Capability::ReviewPendingListings)
        .check()?;

    let pending = deps.listings.list(&ListingQuery::pending()).await?;
    info!(count = pending.len(), "Listed pending listings");
    Ok(pending)
}
