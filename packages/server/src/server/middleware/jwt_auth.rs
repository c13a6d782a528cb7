use crate::common::Principal;
use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds the
/// resolved `Principal` to request extensions. If no token or invalid token,
/// request continues without one (anonymous access); actions that need a
/// principal answer `Unauthenticated`.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_principal(&request, &jwt_service) {
        Some(principal) => {
            debug!(
                "Authenticated member: {} (admin: {})",
                principal.member_id, principal.is_admin
            );
            request.extensions_mut().insert(principal);
        }
        None => debug!("No valid authentication token"),
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_principal(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<Principal> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;
    Some(claims.principal())
}
