//! Renderer relay
//!
//! The page side sends `{"type":"prediction","prediction":n}` and receives
//! `{"status","title","sub"}` back. The exchange is fire-and-forget from the
//! page's point of view: any failure falls back to the local mapping.
//!
//! Endpoint: POST {relay_url}/v1/prediction

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::config::RelayConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{DisplayPayload, PredictionMessage, Verdict};
use crate::utils::constants::USER_AGENT;

/// Transport from the classifier to the renderer
pub trait PredictionRelay: Send + Sync {
    fn exchange(
        &self,
        verdict: Verdict,
    ) -> impl Future<Output = AppResult<DisplayPayload>> + Send;
}

// ============================================
// HTTP CLIENT
// ============================================

/// HTTP relay client
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> AppResult<Self> {
        Self::with_timeout(&config.relay_url, config.request_timeout)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/prediction", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionRelay for RelayClient {
    async fn exchange(&self, verdict: Verdict) -> AppResult<DisplayPayload> {
        let message = PredictionMessage::new(verdict);
        debug!("📤 Relaying prediction {} to {}", message.prediction, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::relay_invalid_response(format!(
                "Relay answered HTTP {}",
                status.as_u16()
            )));
        }

        let payload: DisplayPayload = response.json().await?;
        Ok(payload)
    }
}

// ============================================
// IN-PROCESS RELAY
// ============================================

/// Answers with the local mapping, no transport involved
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRelay;

impl PredictionRelay for LocalRelay {
    async fn exchange(&self, verdict: Verdict) -> AppResult<DisplayPayload> {
        Ok(DisplayPayload::for_verdict(verdict))
    }
}

// ============================================
// FALLBACK
// ============================================

/// Exchange with the relay, falling back to the local mapping on any
/// failure or unrecognized status. Never fails, never retries.
pub async fn display_for<R: PredictionRelay>(relay: &R, verdict: Verdict) -> DisplayPayload {
    match relay.exchange(verdict).await {
        Ok(payload) if Verdict::from_status(&payload.status).is_some() => payload,
        Ok(payload) => {
            warn!(
                "⚠️ Relay returned unknown status {:?}, using local display",
                payload.status
            );
            DisplayPayload::for_verdict(verdict)
        }
        Err(e) => {
            warn!("⚠️ Relay exchange failed [{}]: {}, using local display", e.code_str(), e.message);
            DisplayPayload::for_verdict(verdict)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    struct FailingRelay;

    impl PredictionRelay for FailingRelay {
        async fn exchange(&self, _verdict: Verdict) -> AppResult<DisplayPayload> {
            Err(AppError::new(ErrorCode::RelayTimeout, "timed out"))
        }
    }

    struct OddRelay;

    impl PredictionRelay for OddRelay {
        async fn exchange(&self, _verdict: Verdict) -> AppResult<DisplayPayload> {
            Ok(DisplayPayload {
                status: "purple".to_string(),
                title: "?".to_string(),
                sub: "?".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_local_relay() {
        let payload = LocalRelay.exchange(Verdict::Malicious).await.unwrap();
        assert_eq!(payload.status, "malicious");
    }

    #[tokio::test]
    async fn test_fallback_on_error() {
        let payload = display_for(&FailingRelay, Verdict::Suspicious).await;
        assert_eq!(payload, DisplayPayload::for_verdict(Verdict::Suspicious));
    }

    #[tokio::test]
    async fn test_fallback_on_unknown_status() {
        let payload = display_for(&OddRelay, Verdict::Malicious).await;
        assert_eq!(payload.status, "malicious");
        assert_eq!(payload.title, "Malicious Site Detected");
    }

    #[test]
    fn test_endpoint_join() {
        let client =
            RelayClient::with_timeout("http://127.0.0.1:9/", Duration::from_millis(50)).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/v1/prediction");
    }
}
