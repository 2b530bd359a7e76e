//! API Request Handlers

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::types::*;
use crate::core::classifier::PageClassifier;
use crate::models::config::EngineConfig;
use crate::models::errors::{AppError, ErrorCode};
use crate::models::types::{DisplayPayload, PredictionMessage, Verdict};

/// Shared application state
pub struct AppState {
    pub classifier: PageClassifier,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            classifier: PageClassifier::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

type Rejection = (StatusCode, Json<ApiResponse<()>>);

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn reject(err: &AppError, start: Instant) -> Rejection {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(ApiError::from(err), elapsed_ms(start))),
    )
}

fn reject_body(rejection: JsonRejection, start: Instant) -> Rejection {
    warn!("Malformed request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(
            ApiError::bad_request(rejection.body_text()),
            elapsed_ms(start),
        )),
    )
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weights_version: state.classifier.scorer().weights().version.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Prediction Exchange
// ============================================

/// Answer a `{"type":"prediction"}` message with the display payload.
/// Responds with the bare payload so the page side reads it directly.
pub async fn predict(
    payload: Result<Json<PredictionMessage>, JsonRejection>,
) -> Result<Json<DisplayPayload>, Rejection> {
    let start = Instant::now();
    let Json(message) = payload.map_err(|e| reject_body(e, start))?;

    if !message.is_prediction() {
        let err = AppError::bad_request(format!("Unsupported message type {:?}", message.kind));
        warn!("[{}] {}", err.code_str(), err.message);
        return Err(reject(&err, start));
    }

    let verdict = Verdict::from_prediction(message.prediction).map_err(|e| {
        warn!("[{}] {}", e.code_str(), e.message);
        reject(&e, start)
    })?;

    info!("{} Prediction {} -> {}", verdict.emoji(), message.prediction, verdict);
    Ok(Json(DisplayPayload::for_verdict(verdict)))
}

// ============================================
// Page Classification
// ============================================

pub async fn classify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ClassifyData>>, Rejection> {
    let start = Instant::now();
    let Json(req) = payload.map_err(|e| reject_body(e, start))?;

    let classification = state
        .classifier
        .classify(&req.url, &req.document)
        .map_err(|e| {
            warn!("[{}] {}", e.code_str(), e.message);
            reject(&e, start)
        })?;

    let data = ClassifyData::new(req.url, classification);
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Fallback
// ============================================

pub async fn not_found() -> Rejection {
    let err = AppError::new(ErrorCode::ApiNotFound, "No such endpoint");
    reject(&err, Instant::now())
}
