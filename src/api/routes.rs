//! API Route Configuration

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    routing::{get, post},
    BoxError, Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{self, AppState};
use super::middleware::{logging_middleware, rate_limit_middleware, RATE_LIMITER};
use super::types::{ApiError, ApiResponse};
use crate::models::config::RelayConfig;
use crate::utils::constants::REQUEST_TIMEOUT_SECS;

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>, config: &RelayConfig) -> Router {
    RATE_LIMITER.set_limit(config.rate_limit_per_minute);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Deadline and in-flight cap
    let guard = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_guard_error))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .concurrency_limit(config.max_concurrency.max(1));

    // API v1 routes
    let api_v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/prediction", post(handlers::predict))
        .route("/classify", post(handlers::classify));

    // Build full router
    Router::new()
        .nest("/v1", api_v1)
        // Also expose at root for convenience
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state)
        // Middleware (order matters - bottom runs first)
        .layer(guard)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(rate_limit_middleware))
}

async fn handle_guard_error(err: BoxError) -> (StatusCode, Json<ApiResponse<()>>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request timed out");
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ApiResponse::error(ApiError::timeout(), 0.0)),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(ApiError::internal(err.to_string()), 0.0)),
        )
    }
}
