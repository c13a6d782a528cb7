use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::caller;
use crate::common::{CommentId, ListingId, MarketResult, Principal};
use crate::domains::comments::actions;
use crate::domains::comments::Comment;
use crate::server::app::AppState;
use crate::server::extract::ValidJson;

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub text: String,
}

/// GET /listings/:id/comments
pub async fn list_comments_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
) -> MarketResult<Json<Vec<Comment>>> {
    let comments = actions::list_comments(listing_id, caller(principal), &state.deps).await?;
    Ok(Json(comments))
}

/// POST /listings/:id/comments
pub async fn add_comment_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(listing_id): Path<ListingId>,
    ValidJson(input): ValidJson<CommentInput>,
) -> MarketResult<(StatusCode, Json<Comment>)> {
    let comment =
        actions::add_comment(listing_id, input.text, caller(principal), &state.deps).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /comments/:id
pub async fn edit_comment_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(comment_id): Path<CommentId>,
    ValidJson(input): ValidJson<CommentInput>,
) -> MarketResult<Json<Comment>> {
    let comment =
        actions::edit_comment(comment_id, input.text, caller(principal), &state.deps).await?;
    Ok(Json(comment))
}

/// DELETE /comments/:id
pub async fn delete_comment_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    Path(comment_id): Path<CommentId>,
) -> MarketResult<StatusCode> {
    actions::delete_comment(comment_id, caller(principal), &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}
