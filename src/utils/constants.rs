//! Constants Module - Single Source of Truth
//!
//! Every threshold, weight and display string used by the classifier lives
//! here. No hardcoded values in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "PageSentry";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for relay requests
pub const USER_AGENT: &str = concat!("PageSentry/", env!("CARGO_PKG_VERSION"));

// ============================================
// FEATURE VECTOR LAYOUT
// ============================================

/// Total number of features in a vector
pub const FEATURE_COUNT: usize = 22;

/// Indices below this are categorical ({-1, 0, 1})
pub const CATEGORICAL_FEATURE_COUNT: usize = 16;

// ============================================
// WEIGHT TABLE - versioned constant, never recomputed
// ============================================

/// Version tag of the shipped weight table
pub const WEIGHT_TABLE_VERSION: &str = "heuristic-22f-v1";

/// Per-feature weights, index-aligned with the feature vector.
/// Indices 19 and 20 are zero, which disables those features.
pub const SHIPPED_WEIGHTS: [f64; FEATURE_COUNT] = [
    7.80591451e-02,
    2.30999859e-03,
    2.43416917e-02,
    5.60592314e-03,
    2.08000827e-02,
    1.00765788e-01,
    1.97684453e-04,
    5.18847074e-03,
    1.11906348e-03,
    1.77194355e-02,
    6.94259966e-02,
    3.36121563e-09,
    8.10997254e-03,
    1.07759619e-03,
    2.08821802e-02,
    2.20703977e-04,
    4.52107832e-01,
    8.90150883e-02,
    2.00343795e-03,
    0.0,
    0.0,
    1.01049906e-01,
];

// ============================================
// SCORING
// ============================================

/// Share of a categorical weight credited to suspicious when the value is 0
pub const AMBIGUOUS_FACTOR: f64 = 0.4;

/// Rule a: safe when safe >= this and malicious below MALICIOUS_THRESHOLD
pub const SAFE_THRESHOLD: f64 = 0.30;

/// Rule b: safe dominance floor
pub const SAFE_DOMINANCE_FLOOR: f64 = 0.15;

/// Rule c: malicious at or above this
pub const MALICIOUS_THRESHOLD: f64 = 0.15;

/// Rule d: suspicious above this
pub const SUSPICIOUS_THRESHOLD: f64 = 0.08;

/// Rule d: suspicious when this many categorical features are ambiguous
pub const AMBIGUOUS_COUNT_THRESHOLD: u32 = 3;

// ============================================
// FEATURE EXTRACTION THRESHOLDS
// ============================================

/// URL length tier: below this is short
pub const URL_LENGTH_SHORT: usize = 54;

/// URL length tier: at or below this is medium
pub const URL_LENGTH_MEDIUM: usize = 75;

/// Length above which the tiny-URL feature fires
pub const TINY_URL_LENGTH: usize = 20;

/// Authority segments splitting into this many dot parts are multi-domain
pub const MULTI_DOT_PARTS: usize = 5;

/// Image cross-domain ratio tiers (low, high)
pub const IMAGE_RATIO_TIERS: (f64, f64) = (0.22, 0.61);

/// Anchor cross-domain ratio tiers (low, high)
pub const ANCHOR_RATIO_TIERS: (f64, f64) = (0.31, 0.67);

/// Script + link cross-domain ratio tiers (low, high)
pub const SCRIPT_LINK_RATIO_TIERS: (f64, f64) = (0.17, 0.81);

/// TLDs that flag a host as suspicious
pub const SUSPICIOUS_TLDS: [&str; 10] = [
    "tk", "ml", "ga", "cf", "gq", "xyz", "top", "work", "click", "link",
];

// ============================================
// WHITELIST
// ============================================

/// Known-safe domains; exact or subdomain match short-circuits scoring
pub const SAFE_DOMAINS: [&str; 1] = ["google.com"];

// ============================================
// DISPLAY
// ============================================

/// Delay between classification and showing the dialog (milliseconds)
pub const DEFAULT_DISPLAY_DELAY_MS: u64 = 500;

/// Display copy per verdict: (status, title, subtitle)
pub const SAFE_COPY: (&str, &str, &str) = ("safe", "No Issues Detected", "This website is safe.");
pub const SUSPICIOUS_COPY: (&str, &str, &str) =
    ("suspicious", "Suspicious Activity", "Proceed with caution.");
pub const MALICIOUS_COPY: (&str, &str, &str) = (
    "malicious",
    "Malicious Site Detected",
    "This website may be unsafe.",
);

/// Wire `type` tag of the prediction message
pub const PREDICTION_MESSAGE_TYPE: &str = "prediction";

// ============================================
// RELAY DEFAULTS
// ============================================

/// Default relay server host
pub const DEFAULT_RELAY_HOST: &str = "0.0.0.0";

/// Default relay server port
pub const DEFAULT_RELAY_PORT: u16 = 8080;

/// Default relay base URL used by the client
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8080";

/// Default relay request timeout (milliseconds)
pub const DEFAULT_RELAY_TIMEOUT_MS: u64 = 1500;

/// Default requests per client per minute
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 120;

/// Default in-flight request cap
pub const DEFAULT_MAX_CONCURRENCY: usize = 64;

/// Server-side deadline for one request (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Interval between rate limiter cleanups (seconds)
pub const RATE_LIMIT_CLEANUP_SECS: u64 = 60;
