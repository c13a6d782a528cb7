use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet};

use crate::common::{ListingId, MarketError, MarketResult, MemberId};
use crate::domains::engagement::models::{RatingEntry, RatingSummary, Score};
use crate::kernel::StoreError;

pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// The first production automobile.
pub const EARLIEST_MANUFACTURING_YEAR: i32 = 1886;

/// Vehicle condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    Used,
    #[serde(alias = "like-new", alias = "like new")]
    LikeNew,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::New => write!(f, "new"),
            Condition::Used => write!(f, "used"),
            Condition::LikeNew => write!(f, "like_new"),
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = MarketError;

    fn from_str(s: &str) -> MarketResult<Self> {
        match s {
            "new" => Ok(Condition::New),
            "used" => Ok(Condition::Used),
            "like_new" | "like-new" | "like new" => Ok(Condition::LikeNew),
            _ => Err(MarketError::validation(format!("Invalid condition: {}", s))),
        }
    }
}

/// The owner-editable fields of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingContent {
    pub title: String,
    pub description: String,
    pub condition: Condition,
    pub brand: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub price: Decimal,
    /// Ordered image references; the first one is the cover
    pub images: Vec<String>,
    pub related_link: Option<String>,
}

impl ListingContent {
    /// Trim free-text fields and check every content rule.
    pub fn normalized(mut self) -> MarketResult<Self> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.brand = self.brand.trim().to_string();
        self.model = self.model.trim().to_string();
        self.images = self
            .images
            .into_iter()
            .map(|image| image.trim().to_string())
            .collect();
        self.related_link = self
            .related_link
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty());

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> MarketResult<()> {
        if self.title.trim().is_empty() {
            return Err(MarketError::validation("title is required"));
        }

        let description_len = self.description.trim().chars().count();
        if description_len == 0 || description_len > DESCRIPTION_MAX_CHARS {
            return Err(MarketError::validation(format!(
                "description must be between 1 and {} characters",
                DESCRIPTION_MAX_CHARS
            )));
        }

        if self.brand.trim().is_empty() {
            return Err(MarketError::validation("brand is required"));
        }
        if self.model.trim().is_empty() {
            return Err(MarketError::validation("model is required"));
        }

        let latest_year = Utc::now().year() + 1;
        if !(EARLIEST_MANUFACTURING_YEAR..=latest_year).contains(&self.manufacturing_year) {
            return Err(MarketError::validation(format!(
                "manufacturing year must be between {} and {}",
                EARLIEST_MANUFACTURING_YEAR, latest_year
            )));
        }

        if self.price < Decimal::ZERO {
            return Err(MarketError::validation("price must not be negative"));
        }

        if self.images.is_empty() {
            return Err(MarketError::validation("at least one image is required"));
        }
        if self.images.iter().any(|image| image.trim().is_empty()) {
            return Err(MarketError::validation("image references must not be empty"));
        }

        Ok(())
    }
}

/// Content columns to overwrite; `None` leaves the stored value alone.
///
/// Stores apply a patch column by column, so concurrent edits of different
/// fields both land.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub condition: Option<Condition>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub manufacturing_year: Option<i32>,
    pub price: Option<Decimal>,
    pub images: Option<Vec<String>>,
    /// `Some(None)` clears the link
    pub related_link: Option<Option<String>>,
}

impl ListingPatch {
    pub fn apply(&self, content: &mut ListingContent) {
        if let Some(title) = &self.title {
            content.title = title.clone();
        }
        if let Some(description) = &self.description {
            content.description = description.clone();
        }
        if let Some(condition) = self.condition {
            content.condition = condition;
        }
        if let Some(brand) = &self.brand {
            content.brand = brand.clone();
        }
        if let Some(model) = &self.model {
            content.model = model.clone();
        }
        if let Some(year) = self.manufacturing_year {
            content.manufacturing_year = year;
        }
        if let Some(price) = self.price {
            content.price = price;
        }
        if let Some(images) = &self.images {
            content.images = images.clone();
        }
        if let Some(link) = &self.related_link {
            content.related_link = link.clone();
        }
    }
}

/// Listing - a vehicle posted for sale
///
/// `favorites_count` and `ratings_summary` are derived from `favorited_by` and
/// `ratings`. Stores only ever write them in the same atomic step as their
/// source collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: MemberId,
    pub content: ListingContent,
    pub is_authorized: bool,
    pub favorited_by: BTreeSet<MemberId>,
    pub favorites_count: i64,
    pub ratings: BTreeMap<MemberId, Score>,
    pub ratings_summary: RatingSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// A freshly posted listing: unauthorized, no engagement.
    pub fn new(owner_id: MemberId, content: ListingContent) -> Self {
        let now = Utc::now();
        Self {
            id: ListingId::new(),
            owner_id,
            content,
            is_authorized: false,
            favorited_by: BTreeSet::new(),
            favorites_count: 0,
            ratings: BTreeMap::new(),
            ratings_summary: RatingSummary::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn average_rating(&self) -> f64 {
        self.ratings_summary.rounded_average()
    }

    pub fn rating_entries(&self) -> Vec<RatingEntry> {
        self.ratings
            .iter()
            .map(|(member_id, score)| RatingEntry {
                member_id: *member_id,
                score: *score,
            })
            .collect()
    }

    /// Recompute both derived fields from their sources.
    pub fn recompute_aggregates(&mut self) {
        self.favorites_count = self.favorited_by.len() as i64;
        self.ratings_summary = RatingSummary::from_scores(self.ratings.values().copied());
    }

    /// Whether the stored aggregates agree with their source collections.
    pub fn aggregates_consistent(&self) -> bool {
        self.favorites_count == self.favorited_by.len() as i64
            && self.ratings_summary == RatingSummary::from_scores(self.ratings.values().copied())
    }
}

/// Filters for listing queries. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive brand ("car kind") match
    pub brand: Option<String>,
    pub owner_id: Option<MemberId>,
    pub is_authorized: Option<bool>,
}

impl ListingQuery {
    pub fn by_brand(brand: impl Into<String>) -> Self {
        Self {
            brand: Some(brand.into()),
            ..Default::default()
        }
    }

    pub fn by_owner(owner_id: MemberId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Default::default()
        }
    }

    pub fn pending() -> Self {
        Self {
            is_authorized: Some(false),
            ..Default::default()
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.brand
            .as_ref()
            .map_or(true, |brand| listing.content.brand.eq_ignore_ascii_case(brand.trim()))
            && self.owner_id.map_or(true, |owner| listing.owner_id == owner)
            && self
                .is_authorized
                .map_or(true, |authorized| listing.is_authorized == authorized)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

/// Listing row plus its favorites and ratings, read in one statement so the
/// collections and aggregates come from the same snapshot.
const LISTING_SELECT: &str = r#"
    SELECT l.id, l.owner_id, l.title, l.description, l.condition, l.brand, l.model,
           l.manufacturing_year, l.price, l.images, l.related_link, l.is_authorized,
           l.favorites_count, l.rating_sum, l.rating_count, l.created_at, l.updated_at,
           COALESCE(
               (SELECT array_agg(f.member_id ORDER BY f.created_at, f.member_id)
                  FROM listing_favorites f
                 WHERE f.listing_id = l.id),
               '{}'::uuid[]
           ) AS favorited_by,
           COALESCE(
               (SELECT jsonb_agg(jsonb_build_object('member_id', r.member_id, 'score', r.score)
                                 ORDER BY r.created_at)
                  FROM listing_ratings r
                 WHERE r.listing_id = l.id),
               '[]'::jsonb
           ) AS ratings
      FROM listings l
"#;

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: ListingId,
    owner_id: MemberId,
    title: String,
    description: String,
    condition: String,
    brand: String,
    model: String,
    manufacturing_year: i32,
    price: Decimal,
    images: Vec<String>,
    related_link: Option<String>,
    is_authorized: bool,
    favorites_count: i32,
    rating_sum: i64,
    rating_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    favorited_by: Vec<MemberId>,
    ratings: Json<Vec<RatingEntry>>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = StoreError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let condition = row
            .condition
            .parse()
            .map_err(|e: MarketError| StoreError::Other(anyhow::anyhow!(e.to_string())))?;

        Ok(Listing {
            id: row.id,
            owner_id: row.owner_id,
            content: ListingContent {
                title: row.title,
                description: row.description,
                condition,
                brand: row.brand,
                model: row.model,
                manufacturing_year: row.manufacturing_year,
                price: row.price,
                images: row.images,
                related_link: row.related_link,
            },
            is_authorized: row.is_authorized,
            favorited_by: row.favorited_by.into_iter().collect(),
            favorites_count: row.favorites_count as i64,
            ratings: row
                .ratings
                .0
                .into_iter()
                .map(|entry| (entry.member_id, entry.score))
                .collect(),
            ratings_summary: RatingSummary {
                sum: row.rating_sum,
                count: row.rating_count as i64,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Listing {
    /// Find listing by ID
    pub async fn find_by_id(id: ListingId, pool: &PgPool) -> Result<Option<Self>, StoreError> {
        let sql = format!("{} WHERE l.id = $1", LISTING_SELECT);
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Listing::try_from).transpose()
    }

    /// Find listings matching a query, newest first
    pub async fn find_matching(query: &ListingQuery, pool: &PgPool) -> Result<Vec<Self>, StoreError> {
        let sql = format!(
            "{} WHERE ($1::text IS NULL OR lower(l.brand) = lower(btrim($1)))
                 AND ($2::uuid IS NULL OR l.owner_id = $2)
                 AND ($3::bool IS NULL OR l.is_authorized = $3)
               ORDER BY l.created_at DESC, l.id DESC",
            LISTING_SELECT
        );
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(query.brand.as_deref())
            .bind(query.owner_id)
            .bind(query.is_authorized)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(Listing::try_from).collect()
    }

    /// Insert a new listing (engagement collections start empty)
    pub async fn insert(&self, pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                id, owner_id, title, description, condition, brand, model,
                manufacturing_year, price, images, related_link, is_authorized,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(self.id)
        .bind(self.owner_id)
        .bind(&self.content.title)
        .bind(&self.content.description)
        .bind(self.content.condition.to_string())
        .bind(&self.content.brand)
        .bind(&self.content.model)
        .bind(self.content.manufacturing_year)
        .bind(self.content.price)
        .bind(&self.content.images)
        .bind(&self.content.related_link)
        .bind(self.is_authorized)
        .bind(self.created_at)
        .bind(self.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Overwrite the patched content columns only; engagement columns are
    /// never touched here
    pub async fn update_content(
        id: ListingId,
        patch: &ListingPatch,
        pool: &PgPool,
    ) -> Result<Option<Self>, StoreError> {
        let updated = sqlx::query_scalar::<_, ListingId>(
            r#"
            UPDATE listings
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   condition = COALESCE($4, condition),
                   brand = COALESCE($5, brand),
                   model = COALESCE($6, model),
                   manufacturing_year = COALESCE($7, manufacturing_year),
                   price = COALESCE($8, price),
                   images = COALESCE($9, images),
                   related_link = CASE WHEN $11 THEN $10 ELSE related_link END,
                   updated_at = NOW()
             WHERE id = $1
         RETURNING id
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.condition.map(|condition| condition.to_string()))
        .bind(&patch.brand)
        .bind(&patch.model)
        .bind(patch.manufacturing_year)
        .bind(patch.price)
        .bind(&patch.images)
        .bind(patch.related_link.clone().flatten())
        .bind(patch.related_link.is_some())
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(id, pool).await,
            None => Ok(None),
        }
    }

    /// Set the moderation flag
    pub async fn set_authorized(
        id: ListingId,
        authorized: bool,
        pool: &PgPool,
    ) -> Result<Option<Self>, StoreError> {
        let updated = sqlx::query_scalar::<_, ListingId>(
            "UPDATE listings SET is_authorized = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(authorized)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(id, pool).await,
            None => Ok(None),
        }
    }

    /// Delete a listing; favorites, ratings and comments cascade
    pub async fn delete(id: ListingId, pool: &PgPool) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn content() -> ListingContent {
        ListingContent {
            title: "  2015 Corolla  ".to_string(),
            description: "One owner, full service history".to_string(),
            condition: Condition::Used,
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            manufacturing_year: 2015,
            price: Decimal::new(850000, 2),
            images: vec!["corolla-front.jpg".to_string()],
            related_link: Some("   ".to_string()),
        }
    }

    #[test]
    fn normalized_trims_and_drops_blank_link() {
        let content = content().normalized().unwrap();
        assert_eq!(content.title, "2015 Corolla");
        assert_eq!(content.related_link, None);
    }

    #[test]
    fn description_length_bounds() {
        let mut too_long = content();
        too_long.description = "x".repeat(DESCRIPTION_MAX_CHARS + 1);
        assert!(matches!(too_long.validate(), Err(MarketError::Validation(_))));

        let mut exact = content();
        exact.description = "x".repeat(DESCRIPTION_MAX_CHARS);
        assert!(exact.validate().is_ok());

        let mut empty = content();
        empty.description = "   ".to_string();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn rejects_negative_price_and_missing_images() {
        let mut negative = content();
        negative.price = Decimal::new(-1, 0);
        assert!(negative.validate().is_err());

        let mut free = content();
        free.price = Decimal::ZERO;
        assert!(free.validate().is_ok());

        let mut no_images = content();
        no_images.images.clear();
        assert!(no_images.validate().is_err());
    }

    #[test]
    fn rejects_implausible_year() {
        let mut ancient = content();
        ancient.manufacturing_year = 1700;
        assert!(ancient.validate().is_err());
    }

    #[test]
    fn condition_parsing_accepts_spellings() {
        assert_eq!(Condition::from_str("like new").unwrap(), Condition::LikeNew);
        assert_eq!(Condition::from_str("like-new").unwrap(), Condition::LikeNew);
        assert_eq!(
            serde_json::from_str::<Condition>("\"like-new\"").unwrap(),
            Condition::LikeNew
        );
        assert!(Condition::from_str("broken").is_err());
    }

    #[test]
    fn new_listing_is_unauthorized_and_consistent() {
        let listing = Listing::new(MemberId::new(), content());
        assert!(!listing.is_authorized);
        assert!(listing.aggregates_consistent());
        assert_eq!(listing.average_rating(), 0.0);
    }

    #[test]
    fn query_brand_match_is_case_insensitive() {
        let listing = Listing::new(MemberId::new(), content());
        assert!(ListingQuery::by_brand("toyota").matches(&listing));
        assert!(ListingQuery::by_brand(" TOYOTA ").matches(&listing));
        assert!(!ListingQuery::by_brand("honda").matches(&listing));
        assert!(!ListingQuery::pending().matches(&Listing {
            is_authorized: true,
            ..listing
        }));
    }
}
