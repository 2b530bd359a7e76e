//! Type definitions for page classification
//! Verdicts, the 22-slot feature vector and the renderer payload

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    CATEGORICAL_FEATURE_COUNT, FEATURE_COUNT, MALICIOUS_COPY, PREDICTION_MESSAGE_TYPE,
    SAFE_COPY, SUSPICIOUS_COPY,
};

// ============================================
// VERDICT
// ============================================

/// Final three-way classification of a page.
/// Serialized as its number: -1 safe, 0 suspicious, 1 malicious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Verdict {
    Safe,
    Suspicious,
    Malicious,
}

impl Verdict {
    pub fn as_i8(&self) -> i8 {
        match self {
            Verdict::Safe => -1,
            Verdict::Suspicious => 0,
            Verdict::Malicious => 1,
        }
    }

    /// Parse a numeric prediction, rejecting anything outside {-1, 0, 1}
    pub fn from_prediction(value: i64) -> AppResult<Self> {
        match value {
            -1 => Ok(Verdict::Safe),
            0 => Ok(Verdict::Suspicious),
            1 => Ok(Verdict::Malicious),
            other => Err(AppError::invalid_verdict(other)),
        }
    }

    /// Status keyword used by the renderer
    pub fn status(&self) -> &'static str {
        match self {
            Verdict::Safe => SAFE_COPY.0,
            Verdict::Suspicious => SUSPICIOUS_COPY.0,
            Verdict::Malicious => MALICIOUS_COPY.0,
        }
    }

    /// Inverse of [`Verdict::status`]
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            s if s == SAFE_COPY.0 => Some(Verdict::Safe),
            s if s == SUSPICIOUS_COPY.0 => Some(Verdict::Suspicious),
            s if s == MALICIOUS_COPY.0 => Some(Verdict::Malicious),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Verdict::Safe => "✅",
            Verdict::Suspicious => "🟠",
            Verdict::Malicious => "💀",
        }
    }
}

impl From<Verdict> for i8 {
    fn from(v: Verdict) -> Self {
        v.as_i8()
    }
}

impl TryFrom<i8> for Verdict {
    type Error = AppError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Verdict::from_prediction(value as i64)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}

// ============================================
// FEATURES
// ============================================

/// Named feature positions. The discriminant is the vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    IpLiteralHost = 0,
    UrlLengthTier = 1,
    TinyUrl = 2,
    AtSymbol = 3,
    RedirectChain = 4,
    HyphenInHost = 5,
    MultiDotAuthority = 6,
    FaviconMismatch = 7,
    IllegalHttps = 8,
    ImageCrossDomain = 9,
    AnchorCrossDomain = 10,
    ScriptLinkCrossDomain = 11,
    FormAction = 12,
    Mailto = 13,
    StatusBarTamper = 14,
    Iframe = 15,
    UrlEntropy = 16,
    DigitRatio = 17,
    SpecialChars = 18,
    SuspiciousTld = 19,
    SubdomainDepth = 20,
    PathLength = 21,
}

impl Feature {
    /// All features in vector order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::IpLiteralHost,
        Feature::UrlLengthTier,
        Feature::TinyUrl,
        Feature::AtSymbol,
        Feature::RedirectChain,
        Feature::HyphenInHost,
        Feature::MultiDotAuthority,
        Feature::FaviconMismatch,
        Feature::IllegalHttps,
        Feature::ImageCrossDomain,
        Feature::AnchorCrossDomain,
        Feature::ScriptLinkCrossDomain,
        Feature::FormAction,
        Feature::Mailto,
        Feature::StatusBarTamper,
        Feature::Iframe,
        Feature::UrlEntropy,
        Feature::DigitRatio,
        Feature::SpecialChars,
        Feature::SuspiciousTld,
        Feature::SubdomainDepth,
        Feature::PathLength,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_categorical(self) -> bool {
        self.index() < CATEGORICAL_FEATURE_COUNT
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::IpLiteralHost => "ip_literal_host",
            Feature::UrlLengthTier => "url_length_tier",
            Feature::TinyUrl => "tiny_url",
            Feature::AtSymbol => "at_symbol",
            Feature::RedirectChain => "redirect_chain",
            Feature::HyphenInHost => "hyphen_in_host",
            Feature::MultiDotAuthority => "multi_dot_authority",
            Feature::FaviconMismatch => "favicon_mismatch",
            Feature::IllegalHttps => "illegal_https",
            Feature::ImageCrossDomain => "image_cross_domain",
            Feature::AnchorCrossDomain => "anchor_cross_domain",
            Feature::ScriptLinkCrossDomain => "script_link_cross_domain",
            Feature::FormAction => "form_action",
            Feature::Mailto => "mailto",
            Feature::StatusBarTamper => "status_bar_tamper",
            Feature::Iframe => "iframe",
            Feature::UrlEntropy => "url_entropy",
            Feature::DigitRatio => "digit_ratio",
            Feature::SpecialChars => "special_chars",
            Feature::SuspiciousTld => "suspicious_tld",
            Feature::SubdomainDepth => "subdomain_depth",
            Feature::PathLength => "path_length",
        }
    }
}

/// Fixed 22-slot numeric description of one page visit.
///
/// Slots 0-15 are categorical and must hold -1, 0 or 1. Slots 16-21 carry
/// raw measurements and only need to be finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Validate and wrap raw values
    pub fn new(values: Vec<f64>) -> AppResult<Self> {
        let values: [f64; FEATURE_COUNT] = values
            .try_into()
            .map_err(|v: Vec<f64>| AppError::vector_length(v.len(), FEATURE_COUNT))?;
        Self::from_array(values)
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> AppResult<Self> {
        for (index, value) in values.iter().enumerate() {
            validate_slot(index, *value)?;
        }
        Ok(Self { values })
    }

    /// Copy with one slot replaced
    pub fn with_value(&self, feature: Feature, value: f64) -> AppResult<Self> {
        validate_slot(feature.index(), value)?;
        let mut values = self.values;
        values[feature.index()] = value;
        Ok(Self { values })
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f64>::deserialize(deserializer)?;
        FeatureVector::new(values).map_err(serde::de::Error::custom)
    }
}

fn validate_slot(index: usize, value: f64) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::feature_domain(index, value));
    }
    if index < CATEGORICAL_FEATURE_COUNT && !(value == -1.0 || value == 0.0 || value == 1.0) {
        return Err(AppError::feature_domain(index, value));
    }
    Ok(())
}

// ============================================
// RENDERER BOUNDARY
// ============================================

/// Display payload handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub status: String,
    pub title: String,
    pub sub: String,
}

impl DisplayPayload {
    /// Local mapping from verdict to display copy
    pub fn for_verdict(verdict: Verdict) -> Self {
        let (status, title, sub) = match verdict {
            Verdict::Safe => SAFE_COPY,
            Verdict::Suspicious => SUSPICIOUS_COPY,
            Verdict::Malicious => MALICIOUS_COPY,
        };
        Self {
            status: status.to_string(),
            title: title.to_string(),
            sub: sub.to_string(),
        }
    }
}

/// Message sent from the page side to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub prediction: i64,
}

impl PredictionMessage {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            kind: PREDICTION_MESSAGE_TYPE.to_string(),
            prediction: verdict.as_i8() as i64,
        }
    }

    pub fn is_prediction(&self) -> bool {
        self.kind == PREDICTION_MESSAGE_TYPE
    }
}
