//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so logs stay greppable.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - INPUT_xxx: malformed classifier input (rejected, never coerced)
//! - DOC_xxx: document lifecycle errors
//! - RELAY_xxx: transport to the renderer (recoverable locally)
//! - API_xxx: HTTP surface errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors (1xx)
    // ============================================
    /// Feature vector does not have exactly 22 entries
    InputVectorLength,
    /// Categorical feature outside {-1, 0, 1} or non-finite value
    InputFeatureDomain,
    /// Page URL could not be parsed
    InputInvalidUrl,
    /// Numeric prediction outside {-1, 0, 1}
    InputInvalidVerdict,

    // ============================================
    // Document Errors (2xx)
    // ============================================
    /// Document was torn down before it became ready
    DocumentUnavailable,

    // ============================================
    // Relay Errors (3xx)
    // ============================================
    /// Relay endpoint unreachable
    RelayUnavailable,
    /// Relay did not answer in time
    RelayTimeout,
    /// Relay answered with something other than a display payload
    RelayInvalidResponse,

    // ============================================
    // API Errors (4xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,
    /// Request exceeded the server-side deadline
    ApiTimeout,

    // ============================================
    // Configuration Errors (5xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Input Errors
            Self::InputVectorLength => "INPUT_VECTOR_LENGTH",
            Self::InputFeatureDomain => "INPUT_FEATURE_DOMAIN",
            Self::InputInvalidUrl => "INPUT_INVALID_URL",
            Self::InputInvalidVerdict => "INPUT_INVALID_VERDICT",

            // Document Errors
            Self::DocumentUnavailable => "DOC_UNAVAILABLE",

            // Relay Errors
            Self::RelayUnavailable => "RELAY_UNAVAILABLE",
            Self::RelayTimeout => "RELAY_TIMEOUT",
            Self::RelayInvalidResponse => "RELAY_INVALID_RESPONSE",

            // API Errors
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",
            Self::ApiTimeout => "API_TIMEOUT",

            // Configuration Errors
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest
            | Self::InputVectorLength
            | Self::InputFeatureDomain
            | Self::InputInvalidUrl
            | Self::InputInvalidVerdict
            | Self::ConfigInvalidValue => 400,
            Self::ApiNotFound => 404,
            Self::ApiTimeout => 408,
            Self::ApiRateLimited => 429,
            Self::RelayUnavailable | Self::RelayInvalidResponse => 502,
            Self::RelayTimeout => 504,
            _ => 500,
        }
    }

    /// Whether the caller can recover locally (relay failures fall back to
    /// the local status mapping). Nothing in this crate is retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RelayUnavailable | Self::RelayTimeout | Self::RelayInvalidResponse
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Wrong feature vector length
    pub fn vector_length(actual: usize, expected: usize) -> Self {
        Self::new(
            ErrorCode::InputVectorLength,
            format!("Feature vector has {} entries, expected {}", actual, expected),
        )
    }

    /// Feature value out of its domain
    pub fn feature_domain(index: usize, value: f64) -> Self {
        Self::new(
            ErrorCode::InputFeatureDomain,
            format!("Feature {} has out-of-domain value {}", index, value),
        )
    }

    /// Invalid numeric verdict
    pub fn invalid_verdict(value: i64) -> Self {
        Self::new(
            ErrorCode::InputInvalidVerdict,
            format!("Prediction {} is not one of -1, 0, 1", value),
        )
    }

    /// Document never became ready
    pub fn document_unavailable() -> Self {
        Self::new(
            ErrorCode::DocumentUnavailable,
            "Document was dropped before it finished loading",
        )
    }

    /// Relay answered with an unusable payload
    pub fn relay_invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RelayInvalidResponse, msg)
    }

    /// Invalid configuration value
    pub fn config_invalid(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        Self::with_source(ErrorCode::InputInvalidUrl, "URL parse error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::RelayTimeout, "Relay request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::RelayUnavailable, "Relay connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::RelayInvalidResponse, err.to_string())
        } else {
            Self::new(ErrorCode::RelayUnavailable, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::RelayInvalidResponse, "JSON parse error", err)
    }
}
