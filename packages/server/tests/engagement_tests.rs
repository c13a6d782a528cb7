//! Favorites and ratings through the HTTP API, including concurrent
//! mutations on the same listing.

mod common;

use crate::common::{create_authorized_listing, create_listing, member, ApiClient};
use axum::http::StatusCode;
use futures::future::join_all;
use market_core::common::MemberId;
use serde_json::{json, Value};

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn two_members_favorite_then_one_leaves() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Toyota").await;
    let path = format!("/listings/{}/favorite", listing_id);
    let (a, b) = (member(), member());

    let first = api.post(&path, Value::Null, Some(a)).await.expect_status(StatusCode::OK);
    assert_eq!(first, json!({ "favorited": true, "favoritesCount": 1 }));

    let second = api.post(&path, Value::Null, Some(b)).await.expect_status(StatusCode::OK);
    assert_eq!(second["favoritesCount"], 2);

    let undo = api.post(&path, Value::Null, Some(a)).await.expect_status(StatusCode::OK);
    assert_eq!(undo, json!({ "favorited": false, "favoritesCount": 1 }));

    let listing = store.listing(listing_id).await.unwrap();
    assert!(listing.favorited_by.contains(&b.member_id));
    assert!(!listing.favorited_by.contains(&a.member_id));
    assert!(listing.aggregates_consistent());
}

#[tokio::test]
async fn concurrent_favorites_from_two_members_both_count() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Nissan").await;
    let path = format!("/listings/{}/favorite", listing_id);
    let (a, b) = (member(), member());

    let (ra, rb) = tokio::join!(
        api.post(&path, Value::Null, Some(a)),
        api.post(&path, Value::Null, Some(b))
    );
    assert_eq!(ra.status, StatusCode::OK);
    assert_eq!(rb.status, StatusCode::OK);

    let listing = store.listing(listing_id).await.unwrap();
    assert_eq!(listing.favorites_count, 2);
    assert!(listing.favorited_by.contains(&a.member_id));
    assert!(listing.favorited_by.contains(&b.member_id));

    let undo = api.post(&path, Value::Null, Some(a)).await.expect_status(StatusCode::OK);
    assert_eq!(undo["favoritesCount"], 1);
    let listing = store.listing(listing_id).await.unwrap();
    assert!(listing.favorited_by.contains(&b.member_id));
}

#[tokio::test]
async fn many_concurrent_toggles_never_drift() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Peugeot").await;
    let path = format!("/listings/{}/favorite", listing_id);

    // 40 members; every third one toggles twice (ends unfavorited)
    let members: Vec<_> = (0..40).map(|_| member()).collect();
    let requests = members.iter().enumerate().flat_map(|(i, m)| {
        let times = if i % 3 == 0 { 2 } else { 1 };
        std::iter::repeat(*m).take(times)
    });
    let responses = join_all(
        requests
            .map(|m| {
                let api = api.clone();
                let path = path.clone();
                tokio::spawn(async move { api.post(&path, Value::Null, Some(m)).await })
            })
            .collect::<Vec<_>>(),
    )
    .await;
    for response in responses {
        assert_eq!(response.unwrap().status, StatusCode::OK);
    }

    let listing = store.listing(listing_id).await.unwrap();
    let expected = members.len() - members.len().div_ceil(3);
    assert_eq!(listing.favorites_count as usize, expected);
    assert!(listing.aggregates_consistent());
}

#[tokio::test]
async fn owner_may_favorite_pending_listing() {
    let (api, _) = ApiClient::in_memory();
    let owner = member();
    let listing_id = create_listing(&api, owner, "Smart").await;

    let body = api
        .post(&format!("/listings/{}/favorite", listing_id), Value::Null, Some(owner))
        .await
        .expect_status(StatusCode::OK);
    assert_eq!(body["favoritesCount"], 1);
}

#[tokio::test]
async fn favorite_requires_authentication() {
    let (api, _) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Alfa Romeo").await;

    let response = api
        .post(&format!("/listings/{}/favorite", listing_id), Value::Null, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthenticated");
}

#[tokio::test]
async fn favorite_unknown_listing_is_not_found() {
    let (api, _) = ApiClient::in_memory();
    let response = api
        .post(
            &format!("/listings/{}/favorite", MemberId::new()),
            Value::Null,
            Some(member()),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Ratings
// ============================================================================

#[tokio::test]
async fn three_ratings_average_to_one_decimal() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Volvo").await;
    let path = format!("/listings/{}/rating", listing_id);

    for score in [2, 4, 5] {
        api.post(&path, json!({ "score": score }), Some(member()))
            .await
            .expect_status(StatusCode::OK);
    }

    let detail = api
        .get(&format!("/listings/{}", listing_id), None)
        .await
        .expect_status(StatusCode::OK);
    assert_eq!(detail["averageRating"], 3.7);
    assert_eq!(detail["ratingsCount"], 3);
    assert_eq!(detail["ratings"].as_array().map(Vec::len), Some(3));

    let listing = store.listing(listing_id).await.unwrap();
    assert_eq!(listing.ratings_summary.sum, 11);
}

#[tokio::test]
async fn rerating_keeps_one_entry_per_member() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Subaru").await;
    let path = format!("/listings/{}/rating", listing_id);
    let rater = member();

    api.post(&path, json!({ "score": 3 }), Some(rater))
        .await
        .expect_status(StatusCode::OK);
    let body = api
        .post(&path, json!({ "score": 5 }), Some(rater))
        .await
        .expect_status(StatusCode::OK);
    assert_eq!(body, json!({ "averageRating": 5.0, "ratingsCount": 1, "score": 5 }));

    let listing = store.listing(listing_id).await.unwrap();
    assert_eq!(listing.ratings.len(), 1);
    assert_eq!(listing.ratings[&rater.member_id].value(), 5);
}

#[tokio::test]
async fn out_of_range_scores_are_rejected() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Saab").await;
    let path = format!("/listings/{}/rating", listing_id);

    for score in [0, 6, -1] {
        let response = api.post(&path, json!({ "score": score }), Some(member())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "validation");
    }

    assert_eq!(store.engagement_calls().await, 0);
    assert!(store.listing(listing_id).await.unwrap().ratings.is_empty());
}

#[tokio::test]
async fn malformed_rating_bodies_are_validation_errors() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Alfa Romeo").await;
    let path = format!("/listings/{}/rating", listing_id);

    for body in [json!({}), json!({ "score": 4.5 }), json!({ "score": "five" })] {
        let response = api.post(&path, body, Some(member())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "validation");
    }

    assert_eq!(store.engagement_calls().await, 0);
}

#[tokio::test]
async fn concurrent_ratings_keep_mean_exact() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Citroen").await;
    let path = format!("/listings/{}/rating", listing_id);

    let raters: Vec<_> = (0..30).map(|i| (member(), (i % 5) + 1)).collect();
    let responses = join_all(
        raters
            .iter()
            .map(|(rater, score)| {
                let api = api.clone();
                let path = path.clone();
                let (rater, score) = (*rater, *score);
                tokio::spawn(async move {
                    api.post(&path, json!({ "score": score }), Some(rater)).await
                })
            })
            .collect::<Vec<_>>(),
    )
    .await;
    for response in responses {
        assert_eq!(response.unwrap().status, StatusCode::OK);
    }

    let listing = store.listing(listing_id).await.unwrap();
    assert_eq!(listing.ratings.len(), 30);
    assert_eq!(listing.ratings_summary.count, 30);
    assert_eq!(listing.ratings_summary.sum, 90);
    assert_eq!(listing.average_rating(), 3.0);
    assert!(listing.aggregates_consistent());
}

// ============================================================================
// Favorites and ratings together
// ============================================================================

#[tokio::test]
async fn interleaved_favorites_and_ratings_stay_consistent() {
    let (api, store) = ApiClient::in_memory();
    let listing_id = create_authorized_listing(&api, member(), "Mini").await;
    let favorite_path = format!("/listings/{}/favorite", listing_id);
    let rating_path = format!("/listings/{}/rating", listing_id);

    let members: Vec<_> = (0..20).map(|_| member()).collect();
    let mut tasks = Vec::new();
    for (i, member) in members.iter().copied().enumerate() {
        let api_for_favorite = api.clone();
        let path = favorite_path.clone();
        tasks.push(tokio::spawn(async move {
            api_for_favorite.post(&path, Value::Null, Some(member)).await
        }));

        let api_for_rating = api.clone();
        let path = rating_path.clone();
        let score = (i % 5) as i64 + 1;
        tasks.push(tokio::spawn(async move {
            api_for_rating
                .post(&path, json!({ "score": score }), Some(member))
                .await
        }));
    }
    for response in join_all(tasks).await {
        assert_eq!(response.unwrap().status, StatusCode::OK);
    }

    let listing = store.listing(listing_id).await.unwrap();
    assert_eq!(listing.favorites_count, 20);
    assert_eq!(listing.ratings_summary.count, 20);
    assert_eq!(listing.ratings_summary.sum, 60);
    assert!(listing.aggregates_consistent());
}
