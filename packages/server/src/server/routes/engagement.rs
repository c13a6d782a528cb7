use axum::{
    extract::{Extension, Path},
    Json,
};

use super::caller;
use crate::common::{ListingId, MarketResult, Principal};
use crate::domains::engagement::actions;
use crate::domains::engagement::{FavoriteToggle, RateInput, RatingResult};
use crate::server::app::AppState;
use crate::server::extract::ValidJson;

/// POST /listings/:id/favorite
pub async fn toggle_favorite_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
) -> MarketResult<Json<FavoriteToggle>> {
    let toggle = actions::toggle_favorite(listing_id, caller(principal), &state.deps).await?;
    Ok(Json(toggle))
}

/// POST /listings/:id/rating
pub async fn rate_listing_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
    ValidJson(input): ValidJson<RateInput>,
) -> MarketResult<Json<RatingResult>> {
    let result =
        actions::rate_listing(listing_id, input.score, caller(principal), &state.deps).await?;
    Ok(Json(result))
}
