use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ListingId, MarketError, MarketResult, MemberId};
use crate::kernel::StoreError;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

/// A rating score, guaranteed to lie in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub fn new(value: i64) -> MarketResult<Self> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(MarketError::validation(format!(
                "score must be between {} and {}, got {}",
                MIN_SCORE, MAX_SCORE, value
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = MarketError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        score.0 as i64
    }
}

/// One rater's entry in a listing's rating map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    // rows aggregated in SQL arrive snake_case
    #[serde(alias = "member_id")]
    pub member_id: MemberId,
    pub score: Score,
}

/// Aggregate over a listing's rating map.
///
/// Holds the exact sum and count; the average is only derived (and rounded)
/// when read, so repeated re-rates never accumulate rounding drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub sum: i64,
    pub count: i64,
}

impl RatingSummary {
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = Score>,
    {
        scores.into_iter().fold(Self::default(), |acc, score| Self {
            sum: acc.sum + score.value() as i64,
            count: acc.count + 1,
        })
    }

    /// Exact mean of the scores, `0.0` when nobody has rated.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    /// Mean rounded to one decimal place, for responses.
    pub fn rounded_average(&self) -> f64 {
        (self.average() * 10.0).round() / 10.0
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl RatingEntry {
    /// Insert or replace a member's score and recompute the listing aggregate
    /// from the full rating set, in one transaction under the listing row lock.
    /// Returns `None` if the listing is gone.
    pub async fn upsert(
        listing_id: ListingId,
        member_id: MemberId,
        score: Score,
        pool: &PgPool,
    ) -> Result<Option<RatingSummary>, StoreError> {
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

        sqlx::query(
            r#"
            INSERT INTO listing_ratings (listing_id, member_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (listing_id, member_id)
            DO UPDATE SET score = EXCLUDED.score, updated_at = NOW()
            "#,
        )
        .bind(listing_id)
        .bind(member_id)
        .bind(score.value() as i16)
        .execute(&mut *tx)
        .await?;

        let (sum, count) = sqlx::query_as::<_, (i64, i32)>(
            r#"
            UPDATE listings l
               SET rating_sum = agg.sum, rating_count = agg.count
              FROM (SELECT COALESCE(SUM(score), 0)::bigint AS sum, COUNT(*)::int AS count
                      FROM listing_ratings
                     WHERE listing_id = $1) agg
             WHERE l.id = $1
         RETURNING l.rating_sum, l.rating_count
            "#,
        )
        .bind(listing_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(RatingSummary {
            sum,
            count: count as i64,
        }))
    }
}
