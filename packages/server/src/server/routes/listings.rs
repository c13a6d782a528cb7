use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};

use super::caller;
use crate::common::{ListingId, MarketResult, MemberId, Principal};
use crate::domains::listings::actions;
use crate::domains::listings::{
    CreateListingInput, Listing, ListingData, ListingFeedQuery, UpdateListingInput,
};
use crate::server::app::AppState;
use crate::server::extract::ValidJson;

fn to_data(listings: Vec<Listing>) -> Vec<ListingData> {
    listings.into_iter().map(ListingData::from).collect()
}

/// GET /listings?brand=
pub async fn list_listings_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<ListingFeedQuery>,
) -> MarketResult<Json<Vec<ListingData>>> {
    let listings = actions::list_feed(query.brand, caller(principal), &state.deps).await?;
    Ok(Json(to_data(listings)))
}

/// GET /listings/mine
pub async fn my_listings_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
) -> MarketResult<Json<Vec<ListingData>>> {
    let listings = actions::list_my_listings(caller(principal), &state.deps).await?;
    Ok(Json(to_data(listings)))
}

/// GET /members/:id/listings
pub async fn member_listings_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(member_id): Path<MemberId>,
) -> MarketResult<Json<Vec<ListingData>>> {
    let listings =
        actions::list_member_listings(member_id, caller(principal), &state.deps).await?;
    Ok(Json(to_data(listings)))
}

/// POST /listings
pub async fn create_listing_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    ValidJson(input): ValidJson<CreateListingInput>,
) -> MarketResult<(StatusCode, Json<ListingData>)> {
    let listing = actions::create_listing(input, caller(principal), &state.deps).await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// GET /listings/:id
pub async fn get_listing_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
) -> MarketResult<Json<ListingData>> {
    let listing = actions::get_listing(listing_id, caller(principal), &state.deps).await?;
    Ok(Json(listing.into()))
}

/// PATCH /listings/:id
pub async fn update_listing_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
    ValidJson(input): ValidJson<UpdateListingInput>,
) -> MarketResult<Json<ListingData>> {
    let listing =
        actions::update_listing(listing_id, input, caller(principal), &state.deps).await?;
    Ok(Json(listing.into()))
}

/// DELETE /listings/:id
pub async fn delete_listing_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
) -> MarketResult<StatusCode> {
    actions::delete_listing(listing_id, caller(principal), &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
