//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::core::classifier::Classification;
use crate::core::modal::ModalView;
use crate::core::risk_score::{ScoreContribution, ScoreReport};
use crate::models::errors::{AppError, ErrorCode};
use crate::models::types::{DisplayPayload, FeatureVector, Verdict};
use crate::providers::document::PageSnapshot;

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ApiBadRequest.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self {
            code: ErrorCode::ApiRateLimited.as_str().to_string(),
            message: format!("Rate limit exceeded. Retry after {} seconds", retry_after),
            details: Some(format!("retry_after: {}", retry_after)),
        }
    }

    pub fn timeout() -> Self {
        Self {
            code: ErrorCode::ApiTimeout.as_str().to_string(),
            message: "Request took too long".to_string(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ApiInternalError.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: None,
        }
    }
}

// ============================================
// Classification
// ============================================

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Absolute page URL (what the browser reports as location.href)
    pub url: String,
    #[serde(default)]
    pub document: PageSnapshot,
}

#[derive(Debug, Serialize)]
pub struct ClassifyData {
    pub url: String,
    pub verdict: String,
    /// -1 safe, 0 suspicious, 1 malicious
    pub prediction: Verdict,
    pub whitelisted: bool,
    pub display: DisplayPayload,
    pub modal: ModalView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ClassifyData {
    pub fn new(url: String, classification: Classification) -> Self {
        let display = DisplayPayload::for_verdict(classification.verdict);
        let modal = ModalView::from_payload(&display, &url);
        Self {
            verdict: classification.verdict.status().to_string(),
            prediction: classification.verdict,
            whitelisted: classification.whitelisted,
            display,
            modal,
            features: classification.features,
            breakdown: classification.report.map(ScoreBreakdown::from),
            url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub safe_score: f64,
    pub suspicious_score: f64,
    pub malicious_score: f64,
    pub maybe_count: u32,
    pub weights_version: String,
    pub contributions: Vec<ScoreContribution>,
}

impl From<ScoreReport> for ScoreBreakdown {
    fn from(report: ScoreReport) -> Self {
        Self {
            safe_score: report.scores.safe_score,
            suspicious_score: report.scores.suspicious_score,
            malicious_score: report.scores.malicious_score,
            maybe_count: report.scores.maybe_count,
            weights_version: report.weights_version.to_string(),
            contributions: report.contributions,
        }
    }
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub weights_version: String,
    pub uptime_seconds: u64,
}
