//! Risk Scoring Module
//!
//! Maps a `FeatureVector` onto one `Verdict` with a hand-tuned weight table.
//! Three scores compete (safe / suspicious / malicious); a fixed priority
//! chain, not raw magnitude, settles the outcome.
//!
//! This is a deterministic rule engine. The weight table is a versioned
//! constant and is never updated at runtime.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::types::{Feature, FeatureVector, Verdict};
use crate::utils::constants::{
    AMBIGUOUS_COUNT_THRESHOLD, AMBIGUOUS_FACTOR, FEATURE_COUNT, MALICIOUS_THRESHOLD,
    SAFE_DOMINANCE_FLOOR, SAFE_THRESHOLD, SHIPPED_WEIGHTS, SUSPICIOUS_THRESHOLD,
    WEIGHT_TABLE_VERSION,
};

// ============================================
// WEIGHT TABLE
// ============================================

/// Immutable per-feature weights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable {
    pub version: &'static str,
    pub weights: [f64; FEATURE_COUNT],
}

impl WeightTable {
    /// The table shipped with this build
    pub fn shipped() -> Self {
        Self {
            version: WEIGHT_TABLE_VERSION,
            weights: SHIPPED_WEIGHTS,
        }
    }

    pub fn weight(&self, feature: Feature) -> f64 {
        self.weights[feature.index()]
    }

    /// Sum of all weights (close to 1.0 for the shipped table)
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::shipped()
    }
}

// ============================================
// CONTINUOUS FEATURE RULES
// ============================================

/// Two-threshold rule for a raw-valued feature. Thresholds are exclusive:
/// a value equal to `high` falls to the middle tier.
#[derive(Debug, Clone, Copy)]
enum ContinuousRule {
    Tiered {
        high: f64,
        high_factor: f64,
        mid: f64,
        mid_factor: f64,
        safe_factor: f64,
    },
    /// Binary flag: exactly 1 is malicious, anything else safe
    Flag { factor: f64, safe_factor: f64 },
}

fn continuous_rule(feature: Feature) -> Option<ContinuousRule> {
    use ContinuousRule::*;
    let rule = match feature {
        Feature::UrlEntropy => Tiered { high: 4.5, high_factor: 0.8, mid: 3.5, mid_factor: 0.5, safe_factor: 0.3 },
        Feature::DigitRatio => Tiered { high: 0.3, high_factor: 0.7, mid: 0.15, mid_factor: 0.5, safe_factor: 0.3 },
        Feature::SpecialChars => Tiered { high: 15.0, high_factor: 0.6, mid: 8.0, mid_factor: 0.4, safe_factor: 0.4 },
        Feature::SuspiciousTld => Flag { factor: 1.0, safe_factor: 0.5 },
        Feature::SubdomainDepth => Tiered { high: 3.0, high_factor: 0.7, mid: 1.0, mid_factor: 0.3, safe_factor: 0.4 },
        Feature::PathLength => Tiered { high: 100.0, high_factor: 0.6, mid: 50.0, mid_factor: 0.3, safe_factor: 0.3 },
        _ => return None,
    };
    Some(rule)
}

// ============================================
// SCORES
// ============================================

/// Which score a contribution went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBucket {
    Safe,
    Suspicious,
    Malicious,
}

/// Running totals for one classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreAccumulator {
    pub safe_score: f64,
    pub suspicious_score: f64,
    pub malicious_score: f64,
    /// Categorical features that landed on 0
    pub maybe_count: u32,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, bucket: ScoreBucket, amount: f64) {
        match bucket {
            ScoreBucket::Safe => self.safe_score += amount,
            ScoreBucket::Suspicious => self.suspicious_score += amount,
            ScoreBucket::Malicious => self.malicious_score += amount,
        }
    }

    /// Resolve scores to a verdict. First matching rule wins:
    /// a. safe >= 0.30 and malicious < 0.15
    /// b. safe > malicious and safe > 0.15
    /// c. malicious >= 0.15
    /// d. suspicious > 0.08 or at least 3 ambiguous features
    /// e. otherwise safe
    pub fn resolve(&self) -> Verdict {
        if self.safe_score >= SAFE_THRESHOLD && self.malicious_score < MALICIOUS_THRESHOLD {
            Verdict::Safe
        } else if self.safe_score > self.malicious_score && self.safe_score > SAFE_DOMINANCE_FLOOR
        {
            Verdict::Safe
        } else if self.malicious_score >= MALICIOUS_THRESHOLD {
            Verdict::Malicious
        } else if self.suspicious_score > SUSPICIOUS_THRESHOLD
            || self.maybe_count >= AMBIGUOUS_COUNT_THRESHOLD
        {
            Verdict::Suspicious
        } else {
            Verdict::Safe
        }
    }
}

/// Individual feature contribution, for transparency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub feature: String,
    pub value: f64,
    pub weight: f64,
    pub bucket: ScoreBucket,
    pub amount: f64,
}

/// Full scoring outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub scores: ScoreAccumulator,
    pub contributions: Vec<ScoreContribution>,
    pub verdict: Verdict,
    pub weights_version: &'static str,
}

// ============================================
// SCORER
// ============================================

/// Deterministic weighted scorer
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    weights: WeightTable,
}

impl RiskScorer {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Score a vector and keep the per-feature breakdown
    pub fn evaluate(&self, features: &FeatureVector) -> ScoreReport {
        let mut scores = ScoreAccumulator::new();
        let mut contributions = Vec::with_capacity(FEATURE_COUNT);

        for feature in Feature::ALL {
            let weight = self.weights.weight(feature);
            if weight == 0.0 {
                continue;
            }
            let value = features.get(feature);
            let (bucket, amount) = if feature.is_categorical() {
                categorical_contribution(value, weight, &mut scores)
            } else {
                match continuous_rule(feature) {
                    Some(rule) => continuous_contribution(rule, value, weight),
                    None => continue,
                }
            };
            scores.add(bucket, amount);
            debug!(
                "   {:<26} value={:<8.4} -> {:?} +{:.5}",
                feature.name(),
                value,
                bucket,
                amount
            );
            contributions.push(ScoreContribution {
                feature: feature.name().to_string(),
                value,
                weight,
                bucket,
                amount,
            });
        }

        let verdict = scores.resolve();
        debug!(
            "🧮 Scores: safe={:.4} suspicious={:.4} malicious={:.4} maybe={} -> {:?}",
            scores.safe_score, scores.suspicious_score, scores.malicious_score, scores.maybe_count, verdict
        );

        ScoreReport {
            scores,
            contributions,
            verdict,
            weights_version: self.weights.version,
        }
    }

    /// Score a vector and return only the verdict
    pub fn classify(&self, features: &FeatureVector) -> Verdict {
        self.evaluate(features).verdict
    }
}

/// Categorical values are validated to {-1, 0, 1} by `FeatureVector`
fn categorical_contribution(
    value: f64,
    weight: f64,
    scores: &mut ScoreAccumulator,
) -> (ScoreBucket, f64) {
    if value == 0.0 {
        scores.maybe_count += 1;
        (ScoreBucket::Suspicious, weight * AMBIGUOUS_FACTOR)
    } else if value == 1.0 {
        (ScoreBucket::Malicious, weight)
    } else {
        (ScoreBucket::Safe, weight)
    }
}

fn continuous_contribution(rule: ContinuousRule, value: f64, weight: f64) -> (ScoreBucket, f64) {
    match rule {
        ContinuousRule::Tiered {
            high,
            high_factor,
            mid,
            mid_factor,
            safe_factor,
        } => {
            if value > high {
                (ScoreBucket::Malicious, weight * high_factor)
            } else if value > mid {
                (ScoreBucket::Suspicious, weight * mid_factor)
            } else {
                (ScoreBucket::Safe, weight * safe_factor)
            }
        }
        ContinuousRule::Flag {
            factor,
            safe_factor,
        } => {
            if value == 1.0 {
                (ScoreBucket::Malicious, weight * factor)
            } else {
                (ScoreBucket::Safe, weight * safe_factor)
            }
        }
    }
}
