use axum::{extract::Extension, http::StatusCode, Json};
use serde::Deserialize;

use super::caller;
use crate::common::{MarketResult, Principal};
use crate::domains::feedback::actions;
use crate::domains::feedback::{Feedback, FeedbackEntry};
use crate::server::app::AppState;
use crate::server::extract::ValidJson;

#[derive(Debug, Deserialize)]
pub struct FeedbackInput {
    pub message: String,
}

/// POST /feedback
pub async fn submit_feedback_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
    ValidJson(input): ValidJson<FeedbackInput>,
) -> MarketResult<(StatusCode, Json<Feedback>)> {
    let feedback = actions::submit_feedback(input.message, caller(principal), &state.deps).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// GET /admin/feedback
pub async fn list_feedback_handler(
    Extension(state): Extension<AppState>,
    principal: Option<Extension<Principal>>,
) -> MarketResult<Json<Vec<FeedbackEntry>>> {
    let entries = actions::list_feedback(caller(principal), &state.deps).await?;
    Ok(Json(entries))
}
