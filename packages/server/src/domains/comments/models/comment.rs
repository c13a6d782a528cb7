use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CommentId, ListingId, MarketError, MarketResult, MemberId};
use crate::kernel::StoreError;

/// Comment - a member's remark on a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub listing_id: ListingId,
    pub author_id: MemberId,
    pub text: String,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(listing_id: ListingId, author_id: MemberId, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: CommentId::new(),
            listing_id,
            author_id,
            text,
            edited: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trimmed comment text, rejecting blanks
pub fn normalize_text(text: &str) -> MarketResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MarketError::validation("comment text is required"));
    }
    Ok(text.to_string())
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

const COMMENT_COLUMNS: &str = "id, listing_id, author_id, text, edited, created_at, updated_at";

impl Comment {
    pub async fn find_by_id(id: CommentId, pool: &PgPool) -> Result<Option<Self>, StoreError> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(comment)
    }

    /// Comments for a listing in insertion order
    pub async fn find_for_listing(
        listing_id: ListingId,
        pool: &PgPool,
    ) -> Result<Vec<Self>, StoreError> {
        let sql = format!(
            "SELECT {} FROM comments WHERE listing_id = $1 ORDER BY seq ASC",
            COMMENT_COLUMNS
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(listing_id)
            .fetch_all(pool)
            .await?;
        Ok(comments)
    }

    pub async fn insert(&self, pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, listing_id, author_id, text, edited, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(self.id)
        .bind(self.listing_id)
        .bind(self.author_id)
        .bind(&self.text)
        .bind(self.edited)
        .bind(self.created_at)
        .bind(self.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn update_text(
        id: CommentId,
        text: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>, StoreError> {
        let sql = format!(
            "UPDATE comments SET text = $2, edited = TRUE, updated_at = NOW()
              WHERE id = $1
          RETURNING {}",
            COMMENT_COLUMNS
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .bind(text)
            .fetch_optional(pool)
            .await?;
        Ok(comment)
    }

    pub async fn delete(id: CommentId, pool: &PgPool) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
