#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Types shared by the enrichment pipeline and its callers: the run
//! configuration, per-area statistics, and the end-of-run report.

pub mod config;

use city_safety_crime_models::RiskLevel;
use city_safety_source_models::AreaKey;
use serde::{Deserialize, Serialize};

pub use config::{
    AreaRiskWeights, ConfigError, EnrichConfig, RecordRiskWeights, RiskModifiers, RiskThresholds,
};

/// Aggregate statistics for one area, plus its risk scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaStatistics {
    /// Area identifier (`-1` for records with no area).
    pub area: AreaKey,
    /// Number of records in the area.
    pub crime_count: u64,
    /// Mean severity value.
    pub mean_severity: f64,
    /// Fraction of records at or above the violent severity.
    pub violent_ratio: f64,
    /// Fraction of records in the night period.
    pub night_ratio: f64,
    /// Weighted combination of the components before normalization.
    pub raw_score: f64,
    /// Min-max normalized `raw_score`, in `[0, 1]`.
    pub normalized_score: f64,
}

/// Number of records at each risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLevelCounts {
    /// Records at [`RiskLevel::Low`].
    pub low: u64,
    /// Records at [`RiskLevel::Medium`].
    pub medium: u64,
    /// Records at [`RiskLevel::High`].
    pub high: u64,
}

impl RiskLevelCounts {
    /// Counts one record at `level`.
    pub const fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
        }
    }

    /// Count at `level`.
    #[must_use]
    pub const fn get(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
        }
    }

    /// Sum over all levels.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.low + self.medium + self.high
    }
}

/// Counts of every silent default applied during an enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichReport {
    /// Records enriched.
    pub records: u64,
    /// Distinct areas (including the unknown bucket).
    pub areas: u64,
    /// Records with no timestamp, classified as `Unknown` period.
    pub missing_timestamps: u64,
    /// Records whose category was not in the severity table.
    pub defaulted_severities: u64,
    /// Records simulated with the fallback victim profile.
    pub fallback_victim_profiles: u64,
    /// Records assigned to the unknown area bucket.
    pub unknown_areas: u64,
    /// Records whose area had no statistics (area risk taken as 0).
    pub areas_without_statistics: u64,
    /// Records per risk level.
    pub risk_levels: RiskLevelCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_counts_track_each_level() {
        let mut counts = RiskLevelCounts::default();
        counts.record(RiskLevel::Low);
        counts.record(RiskLevel::High);
        counts.record(RiskLevel::High);
        assert_eq!(counts.get(RiskLevel::Low), 1);
        assert_eq!(counts.get(RiskLevel::Medium), 0);
        assert_eq!(counts.get(RiskLevel::High), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn area_statistics_serialize_unknown_area_as_sentinel() {
        let stats = AreaStatistics {
            area: AreaKey::Unknown,
            crime_count: 3,
            mean_severity: 2.0,
            violent_ratio: 0.0,
            night_ratio: 1.0,
            raw_score: 0.2,
            normalized_score: 0.0,
        };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["area"], serde_json::json!(-1));
        assert_eq!(value["crime_count"], serde_json::json!(3));
    }
}
