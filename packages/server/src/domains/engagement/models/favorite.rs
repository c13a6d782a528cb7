use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ListingId, MemberId};
use crate::kernel::StoreError;

/// A member's favorite of a listing (one row per member per listing)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub listing_id: ListingId,
    pub member_id: MemberId,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a favorite toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    /// Whether the member is a favoriter after the toggle
    pub favorited: bool,
    pub favorites_count: i64,
}

impl Favorite {
    /// Flip membership and rewrite `favorites_count` in one transaction.
    ///
    /// The listing row is locked first, so every engagement mutation on the
    /// same listing queues behind it. Returns `None` if the listing is gone.
    pub async fn toggle(
        listing_id: ListingId,
        member_id: MemberId,
        pool: &PgPool,
    ) -> Result<Option<FavoriteToggle>, StoreError> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_scalar::<_, ListingId>(
            "SELECT id FROM listings WHERE id = $1 FOR UPDATE",
        )
        .bind(listing_id)
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query(
            "DELETE FROM listing_favorites WHERE listing_id = $1 AND member_id = $2",
        )
        .bind(listing_id)
        .bind(member_id)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if !removed {
            sqlx::query("INSERT INTO listing_favorites (listing_id, member_id) VALUES ($1, $2)")
                .bind(listing_id)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;
        }

        let favorites_count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE listings
               SET favorites_count = (SELECT COUNT(*) FROM listing_favorites WHERE listing_id = $1)
             WHERE id = $1
         RETURNING favorites_count
            "#,
        )
        .bind(listing_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(FavoriteToggle {
            favorited: !removed,
            favorites_count: favorites_count as i64,
        }))
    }
}
