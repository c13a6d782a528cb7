//! Listing actions - entry-point functions for listing operations
//!
//! Called directly from the HTTP routes. Actions are self-contained: they take
//! the resolved principal and raw input, do the auth checks, and return final
//! models.

use tracing::info;

use crate::common::auth::{Actor, Capability, Resource};
use crate::common::{ListingId, MarketError, MarketResult, MemberId, Principal};
use crate::domains::listings::data::{CreateListingInput, UpdateListingInput};
use crate::domains::listings::models::{Listing, ListingContent, ListingQuery};
use crate::domains::moderation::{is_visible, retain_visible};
use crate::kernel::ServerDeps;

/// Post a new listing. It starts unauthorized and invisible to the public.
pub async fn create_listing(
    input: CreateListingInput,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Listing> {
    let owner = Actor::new(principal)
        .can(Capability::CreateListing)
        .check()?;

    let content = ListingContent::from(input).normalized()?;
    let listing = Listing::new(owner.member_id, content);

    info!(
        listing_id = %listing.id,
        owner_id = %owner.member_id,
        brand = %listing.content.brand,
        "Creating listing"
    );

    deps.listings.insert(&listing).await?;
    Ok(listing)
}

/// A single listing; invisible listings are reported as missing
pub async fn get_listing(
    listing_id: ListingId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Listing> {
    find_visible(listing_id, principal.as_ref(), deps).await
}

/// The public feed, optionally narrowed to one brand (case-insensitive)
pub async fn list_feed(
    brand: Option<String>,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Vec<Listing>> {
    let query = match brand.filter(|b| !b.trim().is_empty()) {
        Some(brand) => ListingQuery::by_brand(brand),
        None => ListingQuery::default(),
    };

    let listings = deps.listings.list(&query).await?;
    Ok(retain_visible(listings, principal.as_ref()))
}

/// Listings posted by `owner_id` that the caller may see
pub async fn list_member_listings(
    owner_id: MemberId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Vec<Listing>> {
    let listings = deps.listings.list(&ListingQuery::by_owner(owner_id)).await?;
    Ok(retain_visible(listings, principal.as_ref()))
}

/// The caller's own listings, pending ones included
pub async fn list_my_listings(
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Vec<Listing>> {
    let principal = Principal::required(principal)?;
    let listings = deps
        .listings
        .list(&ListingQuery::by_owner(principal.member_id))
        .await?;
    Ok(listings)
}

/// Edit content fields (owner or admin). Engagement and moderation state are
/// untouched.
pub async fn update_listing(
    listing_id: ListingId,
    input: UpdateListingInput,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Listing> {
    let principal = Principal::required(principal)?;
    let listing = find_visible(listing_id, Some(&principal), deps).await?;

    Actor::new(Some(principal))
        .can(Capability::EditListing)
        .on(Resource::OwnedBy(listing.owner_id))
        .check()?;

    if input.is_empty() {
        return Err(MarketError::validation("no fields to update"));
    }

    let patch = input.into_patch(listing.content)?;

    info!(listing_id = %listing_id, member_id = %principal.member_id, "Updating listing");

    deps.listings
        .update_content(listing_id, &patch)
        .await?
        .ok_or_else(|| MarketError::not_found("Listing", listing_id))
}

/// Delete a listing with its favorites, ratings and comments (owner or admin)
pub async fn delete_listing(
    listing_id: ListingId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<()> {
    let principal = Principal::required(principal)?;
    let listing = find_visible(listing_id, Some(&principal), deps).await?;

    Actor::new(Some(principal))
        .can(Capability::DeleteListing)
        .on(Resource::OwnedBy(listing.owner_id))
        .check()?;

    info!(listing_id = %listing_id, member_id = %principal.member_id, "Deleting listing");

    if !deps.listings.delete(listing_id).await? {
        return Err(MarketError::not_found("Listing", listing_id));
    }
    Ok(())
}

/// Load a listing, treating one the caller may not see as absent
pub(crate) async fn find_visible(
    listing_id: ListingId,
    principal: Option<&Principal>,
    deps: &ServerDeps,
) -> MarketResult<Listing> {
    deps.listings
        .find_by_id(listing_id)
        .await?
        .filter(|listing| is_visible(listing, principal))
        .ok_or_else(|| MarketError::not_found("Listing", listing_id))
}
