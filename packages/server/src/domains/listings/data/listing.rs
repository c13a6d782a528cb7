use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::{ListingId, MemberId};
use crate::domains::engagement::models::RatingEntry;
use crate::domains::listings::models::{Condition, Listing};

/// Listing as returned over the API
///
/// The average is rounded to one decimal place here and nowhere else.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData {
    pub id: ListingId,
    pub owner_id: MemberId,
    pub title: String,
    pub description: String,
    pub condition: Condition,
    pub brand: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub price: Decimal,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_link: Option<String>,
    pub is_authorized: bool,
    pub favorited_by: Vec<MemberId>,
    pub favorites_count: i64,
    pub ratings: Vec<RatingEntry>,
    pub ratings_count: i64,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingData {
    fn from(listing: Listing) -> Self {
        let ratings = listing.rating_entries();
        let average_rating = listing.average_rating();
        let content = listing.content;

        Self {
            id: listing.id,
            owner_id: listing.owner_id,
            title: content.title,
            description: content.description,
            condition: content.condition,
            brand: content.brand,
            model: content.model,
            manufacturing_year: content.manufacturing_year,
            price: content.price,
            images: content.images,
            related_link: content.related_link,
            is_authorized: listing.is_authorized,
            favorited_by: listing.favorited_by.into_iter().collect(),
            favorites_count: listing.favorites_count,
            ratings,
            ratings_count: listing.ratings_summary.count,
            average_rating,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}
