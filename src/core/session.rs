//! Page session orchestration
//!
//! One session per page visit:
//! 1. Wait for the document to be ready
//! 2. Classify the page
//! 3. Let the page settle for the display delay
//! 4. Exchange the verdict with the renderer (local fallback on failure)
//! 5. Build the dialog view model

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

use crate::core::classifier::{Classification, PageClassifier};
use crate::core::modal::ModalView;
use crate::core::readiness::ReadinessGate;
use crate::models::config::EngineConfig;
use crate::models::errors::AppResult;
use crate::models::types::DisplayPayload;
use crate::providers::document::DocumentView;
use crate::providers::relay::{display_for, PredictionRelay};

/// Everything one page visit produced
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub classification: Classification,
    pub display: DisplayPayload,
    pub modal: ModalView,
}

pub struct PageSession<D, R> {
    url: String,
    document: D,
    relay: R,
    classifier: PageClassifier,
    display_delay: Duration,
}

impl<D, R> PageSession<D, R>
where
    D: DocumentView,
    R: PredictionRelay,
{
    pub fn new(url: impl Into<String>, document: D, relay: R) -> Self {
        let config = EngineConfig::default();
        Self {
            url: url.into(),
            document,
            relay,
            display_delay: config.display_delay,
            classifier: PageClassifier::new(config),
        }
    }

    /// Use a specific engine configuration (weights, safe domains, delay)
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.display_delay = config.display_delay;
        self.classifier = PageClassifier::new(config);
        self
    }

    pub fn with_display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run the visit to completion. Fails only if the document never becomes
    /// ready or the URL is invalid; relay problems are absorbed.
    pub async fn run(&self, gate: ReadinessGate) -> AppResult<SessionOutcome> {
        let start = Instant::now();
        gate.wait().await?;

        let classification = self.classifier.classify(&self.url, &self.document)?;

        if !self.display_delay.is_zero() {
            tokio::time::sleep(self.display_delay).await;
        }

        let payload = display_for(&self.relay, classification.verdict).await;
        let modal = ModalView::from_payload(&payload, &self.url);

        info!(
            "🪟 Session {} -> {} ({}) in {}ms",
            self.url,
            payload.status,
            payload.title,
            start.elapsed().as_millis()
        );

        Ok(SessionOutcome {
            classification,
            display: payload,
            modal,
        })
    }
}
