//! Test fixtures for creating test data.

use anyhow::Result;
use axum::http::StatusCode;
use market_core::common::{ListingId, MemberId, Principal};
use market_core::domains::member::models::{Member, MemberProfile};
use serde_json::{json, Value};
use sqlx::PgPool;

use super::ApiClient;

/// JSON body for a valid listing of the given brand
pub fn listing_body(brand: &str) -> Value {
    json!({
        "title": format!("{} in great shape", brand),
        "description": "Garage kept, full service history",
        "condition": "used",
        "brand": brand,
        "model": "Sedan",
        "manufacturingYear": 2017,
        "price": "12500.00",
        "images": ["front.jpg", "interior.jpg"],
    })
}

pub fn member() -> Principal {
    Principal::member(MemberId::new())
}

pub fn admin() -> Principal {
    Principal::admin(MemberId::new())
}

/// Post a listing through the API (it starts pending)
pub async fn create_listing(api: &ApiClient, owner: Principal, brand: &str) -> ListingId {
    let body = api
        .post("/listings", listing_body(brand), Some(owner))
        .await
        .expect_status(StatusCode::CREATED);
    body["id"]
        .as_str()
        .and_then(|id| ListingId::parse(id).ok())
        .expect("created listing has an id")
}

/// Post a listing and have an admin authorize it
pub async fn create_authorized_listing(api: &ApiClient, owner: Principal, brand: &str) -> ListingId {
    let listing_id = create_listing(api, owner, brand).await;
    api.post(
        &format!("/admin/listings/{}/authorize", listing_id),
        Value::Null,
        Some(admin()),
    )
    .await
    .expect_status(StatusCode::OK);
    listing_id
}

/// Insert a member directory entry
pub async fn create_test_member(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
) -> Result<MemberId> {
    let id = MemberId::new();
    let profile = MemberProfile::new(
        id,
        first_name,
        last_name,
        format!("{}.{}@example.com", first_name.to_lowercase(), id),
    );
    Member::upsert(&profile, pool).await?;
    Ok(id)
}
