use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{FeedbackId, MarketError, MarketResult, MemberId};
use crate::domains::member::models::MemberProfile;
use crate::kernel::StoreError;

/// Feedback - a member's message to the administrators (append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub member_id: MemberId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Build a record from raw input, rejecting blank messages
    pub fn new(member_id: MemberId, message: &str) -> MarketResult<Self> {
        let message = message.trim();
        if message.is_empty() {
            return Err(MarketError::validation("Message is required"));
        }

        Ok(Self {
            id: FeedbackId::new(),
            member_id,
            message: message.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Feedback with its submitter resolved from the member directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    #[serde(flatten)]
    pub feedback: Feedback,
    /// `None` when the submitter is unknown to the directory
    pub submitter: Option<MemberProfile>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

#[derive(sqlx::FromRow)]
struct FeedbackEntryRow {
    id: FeedbackId,
    member_id: MemberId,
    message: String,
    created_at: DateTime<Utc>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl From<FeedbackEntryRow> for FeedbackEntry {
    fn from(row: FeedbackEntryRow) -> Self {
        let submitter = row.email.map(|email| MemberProfile {
            id: row.member_id,
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            email,
        });

        FeedbackEntry {
            feedback: Feedback {
                id: row.id,
                member_id: row.member_id,
                message: row.message,
                created_at: row.created_at,
            },
            submitter,
        }
    }
}

impl Feedback {
    pub async fn insert(&self, pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO feedback (id, member_id, message, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(self.id)
        .bind(self.member_id)
        .bind(&self.message)
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// All feedback newest first, joined with the member directory
    pub async fn find_all_with_submitters(pool: &PgPool) -> Result<Vec<FeedbackEntry>, StoreError> {
        let rows = sqlx::query_as::<_, FeedbackEntryRow>(
            r#"
            SELECT f.id, f.member_id, f.message, f.created_at,
                   m.first_name, m.last_name, m.email
              FROM feedback f
              LEFT JOIN members m ON m.id = f.member_id
             ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(FeedbackEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_is_rejected() {
        let result = Feedback::new(MemberId::new(), "   ");
        assert!(matches!(result, Err(MarketError::Validation(_))));
    }

    #[test]
    fn message_is_trimmed() {
        let feedback = Feedback::new(MemberId::new(), "  The search is slow  ").unwrap();
        assert_eq!(feedback.message, "The search is slow");
    }
}
