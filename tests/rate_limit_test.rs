//! Rate limiting through the router. Kept in its own test binary because
//! the limiter is process-global.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use page_sentry::api::{create_router, handlers::AppState};
use page_sentry::RelayConfig;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn prediction_request(client: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/prediction")
        .header("content-type", "application/json")
        .header("x-forwarded-for", client)
        .body(Body::from(r#"{"type":"prediction","prediction":0}"#))
        .unwrap()
}

#[tokio::test]
async fn test_rate_limit_per_client() {
    let config = RelayConfig {
        rate_limit_per_minute: 2,
        ..RelayConfig::default()
    };
    let app = create_router(Arc::new(AppState::default()), &config);

    for expected_remaining in ["1", "0"] {
        let response = app
            .clone()
            .oneshot(prediction_request("198.51.100.1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-ratelimit-remaining").unwrap(),
            expected_remaining
        );
    }

    let response = app
        .clone()
        .oneshot(prediction_request("198.51.100.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "API_RATE_LIMITED");

    // another client still gets through
    let response = app
        .clone()
        .oneshot(prediction_request("198.51.100.2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // health checks are never limited
    let health = Request::builder()
        .uri("/health")
        .header("x-forwarded-for", "198.51.100.1")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(health).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
