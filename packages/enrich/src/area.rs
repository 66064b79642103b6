//! Per-area aggregation and area risk scoring.

use std::collections::BTreeMap;

use city_safety_crime_models::{CrimeSeverity, TimePeriod};
use city_safety_enrich_models::{AreaRiskWeights, AreaStatistics};
use city_safety_source_models::AreaKey;

use crate::min_max_normalize;

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u64,
    severity_sum: u64,
    violent: u64,
    night: u64,
}

/// Accumulates per-area counts from classified records.
#[derive(Debug, Clone)]
pub struct AreaAggregator {
    violent_severity: CrimeSeverity,
    tallies: BTreeMap<AreaKey, Tally>,
}

impl AreaAggregator {
    /// Creates an aggregator that treats `violent_severity` and above as
    /// violent.
    #[must_use]
    pub const fn new(violent_severity: CrimeSeverity) -> Self {
        Self {
            violent_severity,
            tallies: BTreeMap::new(),
        }
    }

    /// Adds one record.
    pub fn observe(&mut self, area: AreaKey, severity: CrimeSeverity, period: TimePeriod) {
        let tally = self.tallies.entry(area).or_default();
        tally.count += 1;
        tally.severity_sum += u64::from(severity.value());
        if severity >= self.violent_severity {
            tally.violent += 1;
        }
        if period == TimePeriod::Night {
            tally.night += 1;
        }
    }

    /// Computes statistics for every observed area, scores them, and
    /// normalizes the scores across areas.
    #[must_use]
    pub fn finish(self, weights: &AreaRiskWeights) -> AreaTable {
        let max_count = self.tallies.values().map(|t| t.count).max().unwrap_or(0);

        #[allow(clippy::cast_precision_loss)]
        let mut stats: Vec<AreaStatistics> = self
            .tallies
            .into_iter()
            .map(|(area, tally)| {
                let count = tally.count as f64;
                let mean_severity = tally.severity_sum as f64 / count;
                let violent_ratio = tally.violent as f64 / count;
                let night_ratio = tally.night as f64 / count;
                let raw_score = weights.crime_count * (count / max_count as f64)
                    + weights.severity * ((mean_severity - 1.0) / 4.0)
                    + weights.violent * violent_ratio
                    + weights.night * night_ratio;
                AreaStatistics {
                    area,
                    crime_count: tally.count,
                    mean_severity,
                    violent_ratio,
                    night_ratio,
                    raw_score,
                    normalized_score: 0.0,
                }
            })
            .collect();

        let raw: Vec<f64> = stats.iter().map(|s| s.raw_score).collect();
        for (s, norm) in stats.iter_mut().zip(min_max_normalize(&raw)) {
            s.normalized_score = norm;
        }

        AreaTable {
            stats: stats.into_iter().map(|s| (s.area, s)).collect(),
        }
    }
}

/// Scored statistics for every area with at least one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaTable {
    stats: BTreeMap<AreaKey, AreaStatistics>,
}

impl AreaTable {
    /// Statistics of `area`, if any record fell into it.
    #[must_use]
    pub fn get(&self, area: AreaKey) -> Option<&AreaStatistics> {
        self.stats.get(&area)
    }

    /// Normalized area risk, or `None` if the area has no statistics.
    #[must_use]
    pub fn normalized_score(&self, area: AreaKey) -> Option<f64> {
        self.get(area).map(|s| s.normalized_score)
    }

    /// Number of areas, counting the unknown bucket if present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns `true` if no records were observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Statistics ordered by area key, unknown bucket first.
    pub fn iter(&self) -> impl Iterator<Item = &AreaStatistics> {
        self.stats.values()
    }

    /// Consumes the table, returning statistics in [`Self::iter`] order.
    #[must_use]
    pub fn into_vec(self) -> Vec<AreaStatistics> {
        self.stats.into_values().collect()
    }
}
