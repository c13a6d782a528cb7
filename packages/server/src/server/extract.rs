//! Request body extraction that reports malformed input as a validation error.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::common::MarketError;

/// JSON body extractor. A missing field, a wrong type or an unreadable body
/// becomes `MarketError::Validation` instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(validation_error(rejection)),
        }
    }
}

fn validation_error(rejection: JsonRejection) -> MarketError {
    let message = rejection.body_text();
    debug!(status = %rejection.status(), message = %message, "Rejected request body");
    MarketError::validation(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Message {
        message: String,
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/feedback")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn missing_field_is_validation_error() {
        let result = ValidJson::<Message>::from_request(request("{}"), &()).await;
        match result {
            Err(MarketError::Validation(message)) => assert!(message.contains("message")),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_validation_error() {
        let result = ValidJson::<Message>::from_request(request("{\"message\":"), &()).await;
        assert!(matches!(result, Err(MarketError::Validation(_))));
    }

    #[tokio::test]
    async fn well_formed_body_passes_through() {
        let body = request(r#"{"message":"hi"}"#);
        let ValidJson(body) = ValidJson::<Message>::from_request(body, &()).await.unwrap();
        assert_eq!(body.message, "hi");
    }
}
