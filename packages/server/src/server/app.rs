//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    add_comment_handler, authorize_listing_handler, create_listing_handler,
    delete_comment_handler, delete_listing_handler, edit_comment_handler, get_listing_handler,
    health_handler, list_comments_handler, list_feedback_handler, list_listings_handler,
    member_listings_handler, my_listings_handler, pending_listings_handler,
    rate_listing_handler, submit_feedback_handler, toggle_favorite_handler,
    unauthorize_listing_handler, update_listing_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    /// Present when running against Postgres; used by the health check only
    pub db_pool: Option<PgPool>,
}

/// CORS for the configured origins; an empty list allows any origin
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, db_pool: Option<PgPool>, allowed_origins: &[String]) -> Router {
    let jwt_service = deps.jwt_service.clone();
    let state = AppState {
        deps: Arc::new(deps),
        db_pool,
    };

    Router::new()
        .route("/health", get(health_handler))
        // Listings
        .route(
            "/listings",
            get(list_listings_handler).post(create_listing_handler),
        )
        .route("/listings/mine", get(my_listings_handler))
        .route(
            "/listings/:id",
            get(get_listing_handler)
                .patch(update_listing_handler)
                .delete(delete_listing_handler),
        )
        .route("/members/:id/listings", get(member_listings_handler))
        // Engagement
        .route("/listings/:id/favorite", post(toggle_favorite_handler))
        .route("/listings/:id/rating", post(rate_listing_handler))
        // Comments
        .route(
            "/listings/:id/comments",
            get(list_comments_handler).post(add_comment_handler),
        )
        .route(
            "/comments/:id",
            patch(edit_comment_handler).delete(delete_comment_handler),
        )
        // Feedback
        .route("/feedback", post(submit_feedback_handler))
        // Admin
        .route("/admin/listings/pending", get(pending_listings_handler))
        .route(
            "/admin/listings/:id/authorize",
            post(authorize_listing_handler),
        )
        .route(
            "/admin/listings/:id/unauthorize",
            post(unauthorize_listing_handler),
        )
        .route("/admin/feedback", get(list_feedback_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        })) // JWT authentication
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
