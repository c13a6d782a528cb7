use rust_decimal::Decimal;
use serde::Deserialize;

use crate::common::MarketResult;
use crate::domains::listings::models::{Condition, ListingContent, ListingPatch};

/// Input for posting a new listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingInput {
    pub title: String,
    pub description: String,
    pub condition: Condition,
    pub brand: String,
    pub model: String,
    pub manufacturing_year: i32,
    pub price: Decimal,
    pub images: Vec<String>,
    #[serde(default)]
    pub related_link: Option<String>,
}

impl From<CreateListingInput> for ListingContent {
    fn from(input: CreateListingInput) -> Self {
        ListingContent {
            title: input.title,
            description: input.description,
            condition: input.condition,
            brand: input.brand,
            model: input.model,
            manufacturing_year: input.manufacturing_year,
            price: input.price,
            images: input.images,
            related_link: input.related_link,
        }
    }
}

/// Partial content edit; absent fields keep their current value.
/// An empty `relatedLink` clears the link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub condition: Option<Condition>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub manufacturing_year: Option<i32>,
    pub price: Option<Decimal>,
    pub images: Option<Vec<String>>,
    pub related_link: Option<String>,
}

impl UpdateListingInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.condition.is_none()
            && self.brand.is_none()
            && self.model.is_none()
            && self.manufacturing_year.is_none()
            && self.price.is_none()
            && self.images.is_none()
            && self.related_link.is_none()
    }

    /// Overlay the provided fields on `current`
    pub fn apply_to(self, current: ListingContent) -> ListingContent {
        ListingContent {
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            condition: self.condition.unwrap_or(current.condition),
            brand: self.brand.unwrap_or(current.brand),
            model: self.model.unwrap_or(current.model),
            manufacturing_year: self.manufacturing_year.unwrap_or(current.manufacturing_year),
            price: self.price.unwrap_or(current.price),
            images: self.images.unwrap_or(current.images),
            related_link: match self.related_link {
                Some(link) => Some(link),
                None => current.related_link,
            },
        }
    }

    /// Validate the edit against `current` and keep only the provided fields,
    /// normalized, as a column patch.
    pub fn into_patch(self, current: ListingContent) -> MarketResult<ListingPatch> {
        let provided = self.clone();
        let merged = self.apply_to(current).normalized()?;

        Ok(ListingPatch {
            title: provided.title.map(|_| merged.title),
            description: provided.description.map(|_| merged.description),
            condition: provided.condition.map(|_| merged.condition),
            brand: provided.brand.map(|_| merged.brand),
            model: provided.model.map(|_| merged.model),
            manufacturing_year: provided.manufacturing_year.map(|_| merged.manufacturing_year),
            price: provided.price.map(|_| merged.price),
            images: provided.images.map(|_| merged.images),
            related_link: provided.related_link.map(|_| merged.related_link),
        })
    }
}

/// Query string for the listing feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFeedQuery {
    /// Brand ("car kind"); blank or absent lists every brand
    pub brand: Option<String>,
}
