//! HTTP client for integration testing.
//!
//! Drives the real axum router with `tower::ServiceExt::oneshot`, so requests
//! pass through the JWT middleware, extractors and error mapping without a
//! socket.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use market_core::common::Principal;
use market_core::domains::auth::JwtService;
use market_core::kernel::{InMemoryStore, ServerDeps, TestDependencies};
use market_core::server::build_app;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Response of a single request.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Panics unless the status is `expected`, showing the body.
    pub fn expect_status(self, expected: StatusCode) -> Value {
        assert_eq!(self.status, expected, "unexpected body: {}", self.body);
        self.body
    }
}

/// API client for executing requests in tests.
#[derive(Clone)]
pub struct ApiClient {
    router: Router,
    jwt_service: Arc<JwtService>,
}

impl ApiClient {
    pub fn new(deps: ServerDeps) -> Self {
        let jwt_service = deps.jwt_service.clone();
        Self {
            router: build_app(deps, None, &[]),
            jwt_service,
        }
    }

    /// Client over a fresh in-memory store; the store is returned for
    /// direct inspection.
    pub fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let deps = TestDependencies::new().with_store(store.clone()).into_deps();
        (Self::new(deps), store)
    }

    pub async fn get(&self, path: &str, principal: Option<Principal>) -> ApiResponse {
        self.send(Method::GET, path, None, principal).await
    }

    pub async fn post(&self, path: &str, body: Value, principal: Option<Principal>) -> ApiResponse {
        self.send(Method::POST, path, Some(body), principal).await
    }

    pub async fn patch(&self, path: &str, body: Value, principal: Option<Principal>) -> ApiResponse {
        self.send(Method::PATCH, path, Some(body), principal).await
    }

    pub async fn delete(&self, path: &str, principal: Option<Principal>) -> ApiResponse {
        self.send(Method::DELETE, path, None, principal).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        principal: Option<Principal>,
    ) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(principal) = principal {
            let token = self
                .jwt_service
                .create_token(principal.member_id, principal.is_admin)
                .expect("Failed to create test token");
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        ApiResponse { status, body }
    }
}
