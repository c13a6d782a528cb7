use axum::{
    extract::{Extension, Path},
    Json,
};

use super::caller;
use crate::common::{ListingId, MarketResult, Principal};
use crate::domains::listings::ListingData;
use crate::domains::moderation::actions;
use crate::server::app::AppState;

/// GET /admin/listings/pending
pub async fn pending_listings_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
) -> MarketResult<Json<Vec<ListingData>>> {
    let pending = actions::list_pending_listings(caller(principal), &state.deps).await?;
    Ok(Json(pending.into_iter().map(ListingData::from).collect()))
}

/// POST /admin/listings/:id/authorize
pub async fn authorize_listing_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
) -> MarketResult<Json<ListingData>> {
    let listing = actions::authorize_listing(listing_id, caller(principal), &state.deps).await?;
    Ok(Json(listing.into()))
}

/// POST /admin/listings/:id/unauthorize
pub async fn unauthorize_listing_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
) -> MarketResult<Json<ListingData>> {
    let listing =
        actions::unauthorize_listing(listing_id, caller(principal), &state.deps).await?;
    Ok(Json(listing.into()))
}
