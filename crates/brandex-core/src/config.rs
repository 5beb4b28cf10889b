//! Scoring configuration and validation.
//!
//! Validation runs before any transformation: a malformed configuration
//! fails the whole run with a message naming the option and what was wrong.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Grouping granularity for trend periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    /// ISO 8601 weeks (`YYYY-Www`).
    #[default]
    Week,
    /// Calendar months (`YYYY-MM`).
    Month,
}

impl std::fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodMode::Week => write!(f, "week"),
            PeriodMode::Month => write!(f, "month"),
        }
    }
}

/// How aggregated composite averages are rescaled to the bounded index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMode {
    /// Min-max within each (period, source) bucket; ties map to 50.
    #[default]
    MinMax,
    /// Z-score within the bucket, squashed to [0, 100] by a logistic curve.
    ZScore,
    /// Leave the index unset on every row.
    None,
}

impl std::fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationMode::MinMax => write!(f, "minmax"),
            NormalizationMode::ZScore => write!(f, "zscore"),
            NormalizationMode::None => write!(f, "none"),
        }
    }
}

/// Named weights for the five composite components.
///
/// Weights must be non-negative and are rescaled proportionally so they sum
/// to 1 before use; supplying e.g. all-equal `1.0` slots is fine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub eng: f64,
    pub adv: f64,
    pub sent: f64,
    pub depth: f64,
    pub service: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            eng: 0.30,
            adv: 0.20,
            sent: 0.20,
            depth: 0.15,
            service: 0.15,
        }
    }
}

impl ComponentWeights {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.eng + self.adv + self.sent + self.depth + self.service
    }

    /// Proportionally rescaled copy summing to 1.
    ///
    /// Callers must have validated the weights first; rescaling a zero or
    /// negative sum is not meaningful.
    #[must_use]
    pub fn rescaled(&self) -> Self {
        let sum = self.sum();
        Self {
            eng: self.eng / sum,
            adv: self.adv / sum,
            sent: self.sent / sum,
            depth: self.depth / sum,
            service: self.service / sum,
        }
    }

    fn slots(&self) -> [(&'static str, f64); 5] {
        [
            ("eng", self.eng),
            ("adv", self.adv),
            ("sent", self.sent),
            ("depth", self.depth),
            ("service", self.service),
        ]
    }
}

/// Full configuration for one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub period: PeriodMode,
    pub normalization: NormalizationMode,
    /// When true, posts with no attribution emit a single synthetic record
    /// under the sentinel "Unattributed" brand instead of being dropped.
    pub include_unattributed: bool,
    /// Per-post gate for the conversation-depth component. Distinct from the
    /// aggregate-level reliability gates, which are fixed policy constants.
    pub depth_coverage_threshold: f64,
    pub weights: ComponentWeights,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            period: PeriodMode::default(),
            normalization: NormalizationMode::default(),
            include_unattributed: false,
            depth_coverage_threshold: 0.6,
            weights: ComponentWeights::default(),
        }
    }
}

impl ScoreConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the option and the
    /// reason when the depth coverage threshold is outside `[0, 1]` or the
    /// weights are negative, non-finite, or sum to zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.depth_coverage_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.depth_coverage_threshold)
        {
            return Err(ConfigError::invalid(
                "depth_coverage_threshold",
                self.depth_coverage_threshold,
                "must be a number within [0, 1]",
            ));
        }

        for (slot, value) in self.weights.slots() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    &format!("weights.{slot}"),
                    value,
                    "must be a non-negative finite number",
                ));
            }
        }

        let sum = self.weights.sum();
        if sum <= 0.0 {
            return Err(ConfigError::invalid(
                "weights",
                sum,
                "weights must sum to a positive value",
            ));
        }

        Ok(())
    }

    /// The configuration actually applied to the run: same options, weights
    /// rescaled to sum to 1. This is what the run summary echoes back.
    #[must_use]
    pub fn effective(&self) -> Self {
        let mut cfg = self.clone();
        cfg.weights = self.weights.rescaled();
        cfg
    }
}
