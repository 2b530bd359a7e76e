//! Classification pipeline
//!
//! URL -> safe-domain check -> feature extraction -> scoring -> verdict.
//! Stateless per call; a classifier can be shared across tasks.

use serde::Serialize;
use std::time::Instant;
use tracing::info;

use crate::core::features::extract_features;
use crate::core::risk_score::{RiskScorer, ScoreReport};
use crate::core::whitelist::SafeDomainList;
use crate::models::config::EngineConfig;
use crate::models::errors::AppResult;
use crate::models::types::{FeatureVector, Verdict};
use crate::providers::document::DocumentView;
use crate::utils::url_parts::PageUrl;

/// Result of classifying one page
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub verdict: Verdict,
    /// True when the page matched the safe-domain list
    pub whitelisted: bool,
    /// Absent for whitelisted pages
    pub features: Option<FeatureVector>,
    /// Absent for whitelisted pages
    pub report: Option<ScoreReport>,
}

impl Classification {
    fn whitelisted() -> Self {
        Self {
            verdict: Verdict::Safe,
            whitelisted: true,
            features: None,
            report: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageClassifier {
    scorer: RiskScorer,
    safe_domains: SafeDomainList,
}

impl Default for PageClassifier {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PageClassifier {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scorer: RiskScorer::new(config.weights),
            safe_domains: SafeDomainList::new(&config.safe_domains),
        }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Classify a page given its URL string and document
    pub fn classify<D: DocumentView + ?Sized>(
        &self,
        url: &str,
        document: &D,
    ) -> AppResult<Classification> {
        let page = PageUrl::parse(url)?;
        self.classify_page(&page, document)
    }

    /// Classify an already-parsed page
    pub fn classify_page<D: DocumentView + ?Sized>(
        &self,
        page: &PageUrl,
        document: &D,
    ) -> AppResult<Classification> {
        let start = Instant::now();

        if self.safe_domains.contains(page) {
            info!(
                "{} {} -> safe (known domain) in {}µs",
                Verdict::Safe.emoji(),
                page.hostname(),
                start.elapsed().as_micros()
            );
            return Ok(Classification::whitelisted());
        }

        let features = extract_features(page, document)?;
        let report = self.scorer.evaluate(&features);

        info!(
            "{} {} -> {} (safe={:.3} sus={:.3} mal={:.3}) in {}µs",
            report.verdict.emoji(),
            page.hostname(),
            report.verdict,
            report.scores.safe_score,
            report.scores.suspicious_score,
            report.scores.malicious_score,
            start.elapsed().as_micros()
        );

        Ok(Classification {
            verdict: report.verdict,
            whitelisted: false,
            features: Some(features),
            report: Some(report),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use crate::providers::document::{Element, PageSnapshot};

    #[test]
    fn test_whitelisted_skips_extraction() {
        let classifier = PageClassifier::default();
        let result = classifier
            .classify("https://www.google.com/search?q=x", &PageSnapshot::new())
            .unwrap();
        assert_eq!(result.verdict, Verdict::Safe);
        assert!(result.whitelisted);
        assert!(result.features.is_none());
        assert!(result.report.is_none());
    }

    #[test]
    fn test_plain_page_is_safe() {
        let doc = PageSnapshot::new()
            .with(Element::new("link").attr_set("rel", "shortcut icon").attr_set("href", "/favicon.ico"));
        let result = PageClassifier::default()
            .classify("https://example.com/", &doc)
            .unwrap();
        assert_eq!(result.verdict, Verdict::Safe);
        assert!(!result.whitelisted);
        assert_eq!(result.features.as_ref().map(|f| f.len()), Some(22));
    }

    #[test]
    fn test_invalid_url() {
        let err = PageClassifier::default()
            .classify("not a url", &PageSnapshot::new())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InputInvalidUrl);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let doc = PageSnapshot::new()
            .with(Element::new("a").attr_set("href", "https://other.example/x"))
            .with(Element::new("iframe"));
        let classifier = PageClassifier::default();
        let url = "http://198.51.100.7/login-verify/account@update.php?id=12345";
        let a = classifier.classify(url, &doc).unwrap();
        let b = classifier.classify(url, &doc).unwrap();
        assert_eq!(a.verdict, b.verdict);
        assert_eq!(a.features, b.features);
    }
}
