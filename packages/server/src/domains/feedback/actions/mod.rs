//! Feedback actions - members write in, admins read

use tracing::info;

use crate::common::auth::{Actor, Capability};
use crate::common::{MarketResult, Principal};
use crate::domains::feedback::models::{Feedback, FeedbackEntry};
use crate::kernel::ServerDeps;

/// Append a feedback message from the caller
pub async fn submit_feedback(
    message: String,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Feedback> {
    let member = Actor::new(principal)
        .can(Capability::SubmitFeedback)
        .check()?;

    let feedback = Feedback::new(member.member_id, &message)?;
    info!(feedback_id = %feedback.id, member_id = %member.member_id, "Feedback submitted");

    deps.feedback.append(&feedback).await?;
    Ok(feedback)
}

/// Every feedback message, newest first, with submitters resolved (admin only)
pub async fn list_feedback(
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Vec<FeedbackEntry>> {
    Actor::new(principal)
        .can(Capability::ReadFeedback)
        .check()?;

    Ok(deps.feedback.list_newest_first().await?)
}
