//! Enrichment configuration.
//!
//! Everything here is read once at startup and passed by reference to the
//! pipeline stages. Every field has a default, so an empty TOML document is
//! a valid configuration.

use std::path::Path;

use city_safety_crime_models::CrimeSeverity;
use city_safety_crime_models::severity::SeverityTable;
use city_safety_crime_models::victims::{VictimProfile, VictimProfileTable};
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a weight group sums to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Largest `max_count` a victim profile may declare.
pub const MAX_VICTIM_COUNT: u32 = 1_000;

/// Errors from loading or validating an [`EnrichConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A weight group does not sum to 1.
    #[error("{group} weights must sum to 1.0, got {sum}")]
    WeightSum {
        /// Config table holding the weights.
        group: &'static str,
        /// Actual sum.
        sum: f64,
    },

    /// A weight is negative.
    #[error("{group}.{name} must not be negative, got {value}")]
    NegativeWeight {
        /// Config table holding the weight.
        group: &'static str,
        /// Weight name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A weight or modifier is NaN or infinite.
    #[error("{group}.{name} must be finite, got {value}")]
    NonFinite {
        /// Config table holding the value.
        group: &'static str,
        /// Value name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A victim profile has an out-of-range count or probability.
    #[error("victim_profiles.{category}: {reason}")]
    VictimProfile {
        /// Normalized category key.
        category: String,
        /// What is wrong with the profile.
        reason: String,
    },

    /// Thresholds are out of order or outside `[0, 1]`.
    #[error("thresholds must satisfy 0 <= medium < high <= 1, got medium={medium}, high={high}")]
    Thresholds {
        /// Configured medium threshold.
        medium: f64,
        /// Configured high threshold.
        high: f64,
    },
}

/// Weights of the four area risk components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaRiskWeights {
    /// Weight of the count relative to the busiest area.
    pub crime_count: f64,
    /// Weight of the normalized mean severity.
    pub severity: f64,
    /// Weight of the violent-incident ratio.
    pub violent: f64,
    /// Weight of the night-incident ratio.
    pub night: f64,
}

impl Default for AreaRiskWeights {
    fn default() -> Self {
        Self {
            crime_count: 0.4,
            severity: 0.3,
            violent: 0.2,
            night: 0.1,
        }
    }
}

impl AreaRiskWeights {
    fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("crime_count", self.crime_count),
            ("severity", self.severity),
            ("violent", self.violent),
            ("night", self.night),
        ]
    }
}

/// Weights of the three record risk components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordRiskWeights {
    /// Weight of the normalized area risk.
    pub area: f64,
    /// Weight of the normalized record severity.
    pub severity: f64,
    /// Weight of the summed domestic/arrest modifiers.
    pub modifiers: f64,
}

impl Default for RecordRiskWeights {
    fn default() -> Self {
        Self {
            area: 0.6,
            severity: 0.3,
            modifiers: 0.1,
        }
    }
}

impl RecordRiskWeights {
    fn named(&self) -> [(&'static str, f64); 3] {
        [
            ("area", self.area),
            ("severity", self.severity),
            ("modifiers", self.modifiers),
        ]
    }
}

/// Signed adjustments applied when a record carries the domestic or arrest
/// flag. These are not weights and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskModifiers {
    /// Added when the incident is domestic.
    pub domestic: f64,
    /// Added when an arrest was made.
    pub arrest: f64,
}

impl Default for RiskModifiers {
    fn default() -> Self {
        Self {
            domestic: 0.1,
            arrest: -0.1,
        }
    }
}

/// Lower bounds (inclusive) of the medium and high risk levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Scores at or above this are at least medium.
    pub medium: f64,
    /// Scores at or above this are high.
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 0.33,
            high: 0.66,
        }
    }
}

/// Full configuration of an enrichment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Seed of the run's victim-impact random sequence.
    pub seed: u64,
    /// Severity at or above which an incident counts as violent.
    pub violent_severity: CrimeSeverity,
    /// Area risk component weights.
    pub area_weights: AreaRiskWeights,
    /// Record risk component weights.
    pub record_weights: RecordRiskWeights,
    /// Domestic/arrest adjustments.
    pub modifiers: RiskModifiers,
    /// Risk level boundaries.
    pub thresholds: RiskThresholds,
    /// Category to severity mapping.
    pub severity_table: SeverityTable,
    /// Category to victim profile mapping.
    pub victim_profiles: VictimProfileTable,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            violent_severity: CrimeSeverity::High,
            area_weights: AreaRiskWeights::default(),
            record_weights: RecordRiskWeights::default(),
            modifiers: RiskModifiers::default(),
            thresholds: RiskThresholds::default(),
            severity_table: SeverityTable::default(),
            victim_profiles: VictimProfileTable::default(),
        }
    }
}

fn check_group(group: &'static str, weights: &[(&'static str, f64)]) -> Result<(), ConfigError> {
    for &(name, value) in weights {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite { group, name, value });
        }
        if value < 0.0 {
            return Err(ConfigError::NegativeWeight { group, name, value });
        }
    }
    let sum: f64 = weights.iter().map(|(_, v)| v).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::WeightSum { group, sum });
    }
    Ok(())
}

fn check_profile(category: &str, profile: &VictimProfile) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::VictimProfile {
        category: category.to_string(),
        reason,
    };
    if profile.max_count > MAX_VICTIM_COUNT {
        return Err(invalid(format!(
            "max_count {} exceeds {MAX_VICTIM_COUNT}",
            profile.max_count
        )));
    }
    let p = profile.probabilities;
    for (name, value) in [
        ("physical", p.physical),
        ("psychological", p.psychological),
        ("property", p.property),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(format!(
                "{name} probability must be within [0, 1], got {value}"
            )));
        }
    }
    Ok(())
}

impl EnrichConfig {
    /// Parses a TOML document. Absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid TOML or
    /// has values of the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file, then validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or fails
    /// [`Self::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that weights and modifiers are finite, weight sums and signs,
    /// victim profile bounds, and threshold ordering.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_group("area_weights", &self.area_weights.named())?;
        check_group("record_weights", &self.record_weights.named())?;

        for (name, value) in [
            ("domestic", self.modifiers.domestic),
            ("arrest", self.modifiers.arrest),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    group: "modifiers",
                    name,
                    value,
                });
            }
        }

        for (category, profile) in self.victim_profiles.iter() {
            check_profile(category, profile)?;
        }

        let RiskThresholds { medium, high } = self.thresholds;
        if !(0.0..=1.0).contains(&medium) || !(0.0..=1.0).contains(&high) || medium >= high {
            return Err(ConfigError::Thresholds { medium, high });
        }
        Ok(())
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
