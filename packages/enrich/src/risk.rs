//! Record-level risk composition and bucketing.

use city_safety_crime_models::{CrimeSeverity, RiskLevel};
use city_safety_enrich_models::{RecordRiskWeights, RiskModifiers, RiskThresholds};

/// Pre-normalization risk components of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordRisk {
    /// Normalized risk of the record's area (0 if the area had none).
    pub area_risk: f64,
    /// `(severity - 1) / 4`.
    pub severity_norm: f64,
    /// Weighted sum of the components.
    pub raw: f64,
}

/// Combines area risk, severity, and flag modifiers into a raw score.
#[derive(Debug, Clone, Copy)]
pub struct RecordRiskComposer {
    weights: RecordRiskWeights,
    modifiers: RiskModifiers,
}

impl RecordRiskComposer {
    /// Creates a composer from already-validated weights.
    #[must_use]
    pub const fn new(weights: RecordRiskWeights, modifiers: RiskModifiers) -> Self {
        Self { weights, modifiers }
    }

    /// Computes the raw score of one record.
    #[must_use]
    pub fn compose(
        &self,
        area_risk: f64,
        severity: CrimeSeverity,
        domestic: bool,
        arrest: bool,
    ) -> RecordRisk {
        let severity_norm = severity.normalized();
        let mut modifier = 0.0;
        if domestic {
            modifier += self.modifiers.domestic;
        }
        if arrest {
            modifier += self.modifiers.arrest;
        }
        let raw = self.weights.area * area_risk
            + self.weights.severity * severity_norm
            + self.weights.modifiers * modifier;
        RecordRisk {
            area_risk,
            severity_norm,
            raw,
        }
    }
}

/// Buckets a final score into a [`RiskLevel`].
#[must_use]
pub fn risk_level(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
    RiskLevel::from_score(score, thresholds.medium, thresholds.high)
}
