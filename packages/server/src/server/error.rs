//! HTTP mapping for core outcomes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::common::MarketError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl MarketError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketError::Unauthenticated => StatusCode::UNAUTHORIZED,
            MarketError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketError::Conflict(_) => StatusCode::CONFLICT,
            MarketError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            MarketError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::Validation(_) => "validation",
            MarketError::Unauthenticated => "unauthenticated",
            MarketError::PermissionDenied(_) => "permission_denied",
            MarketError::NotFound { .. } => "not_found",
            MarketError::Conflict(_) => "conflict",
            MarketError::Transient(_) => "transient",
            MarketError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let message = match &self {
            MarketError::Internal(e) => {
                error!(error = %e, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
        };
        (self.status_code(), Json(body)).into_response()
    }
}
