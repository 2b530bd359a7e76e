//! Page Sentry Library
//!
//! Heuristic risk classifier for web pages. Produces one of three verdicts
//! (safe / suspicious / malicious) from the page URL and document:
//! - 22 URL and document features
//! - Fixed weight table with a prioritized decision rule
//! - Known-safe domain short-circuit
//! - Relay to the renderer with local fallback

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{
    Classification, FeatureExtractor, ModalView, PageClassifier, PageSession, ReadinessGate,
    ReadySignal, RiskScorer, SafeDomainList, ScoreAccumulator, ScoreReport, SessionOutcome,
    WeightTable,
};
pub use models::{
    AppError, AppResult, DisplayPayload, EngineConfig, ErrorCode, Feature, FeatureVector,
    PredictionMessage, RelayConfig, Verdict,
};
pub use providers::{display_for, DocumentView, Element, LocalRelay, PageSnapshot, PredictionRelay, RelayClient};
pub use utils::url_parts::PageUrl;
