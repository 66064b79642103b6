#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident enrichment engine.
//!
//! The pipeline runs in three passes over the whole batch:
//!
//! 1. **Classify** every record: hour and period, severity, simulated victim
//!    impact, and area key. Area tallies are accumulated as records pass.
//! 2. **Score areas** once every record has been classified, then compose a
//!    raw risk for each record from its area's normalized score.
//! 3. **Normalize** raw risks across the batch and bucket them into levels.
//!
//! Each pass needs the complete output of the previous one, so there is no
//! streaming mode.

pub mod area;
pub mod risk;
pub mod severity;
pub mod temporal;
pub mod victims;

use std::sync::Arc;

use city_safety_enrich_models::{AreaStatistics, EnrichConfig, EnrichReport};
use city_safety_source::progress::ProgressCallback;
use city_safety_source_models::{AreaKey, EnrichedIncidentRecord, RawIncidentRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};

use crate::area::AreaAggregator;
use crate::risk::{RecordRiskComposer, risk_level};
use crate::severity::SeverityLookup;
use crate::temporal::TemporalClass;
use crate::victims::{ProfileSource, VictimImpact, VictimImpactSimulator};

/// Min-max normalizes `values` into `[0, 1]`.
///
/// When every value is equal (or there is only one) the result is all
/// zeros.
#[must_use]
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|v| {
            if range > 0.0 {
                ((v - min) / range).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Result of an enrichment run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichOutput {
    /// Enriched records, in input order.
    pub records: Vec<EnrichedIncidentRecord>,
    /// Area statistics ordered by area key.
    pub areas: Vec<AreaStatistics>,
    /// Counts of defaults applied.
    pub report: EnrichReport,
}

struct Classified {
    raw: RawIncidentRecord,
    temporal: TemporalClass,
    severity: SeverityLookup,
    impact: VictimImpact,
    area: AreaKey,
}

/// Enriches `records` with a generator seeded from `config.seed`.
#[must_use]
pub fn enrich_with_seed(
    records: Vec<RawIncidentRecord>,
    config: &EnrichConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> EnrichOutput {
    let mut rng = StdRng::seed_from_u64(config.seed);
    enrich_records(records, config, &mut rng, progress)
}

/// Enriches `records`, drawing victim simulations from `rng` in input
/// order.
pub fn enrich_records<R: Rng + ?Sized>(
    records: Vec<RawIncidentRecord>,
    config: &EnrichConfig,
    rng: &mut R,
    progress: &Arc<dyn ProgressCallback>,
) -> EnrichOutput {
    let mut report = EnrichReport::default();
    let total = records.len() as u64;
    log::info!("Enriching {total} records");

    // pass 1: per-record classification
    progress.set_total(total);
    progress.set_message("classifying".to_string());

    let simulator = VictimImpactSimulator::new(&config.victim_profiles);
    let mut aggregator = AreaAggregator::new(config.violent_severity);

    let classified: Vec<Classified> = records
        .into_iter()
        .map(|raw| {
            let temporal = temporal::classify(raw.occurred_at.as_ref());
            let severity = severity::classify(&raw.category, &config.severity_table);
            let impact = simulator.simulate(&raw.category, &mut *rng);
            let area = AreaKey::from(raw.area_id);

            if temporal.hour.is_none() {
                report.missing_timestamps += 1;
            }
            if severity.is_defaulted() {
                log::trace!("No severity for category {:?}, using default", raw.category);
                report.defaulted_severities += 1;
            }
            if impact.profile == ProfileSource::Fallback {
                report.fallback_victim_profiles += 1;
            }
            if area == AreaKey::Unknown {
                report.unknown_areas += 1;
            }

            aggregator.observe(area, severity.severity(), temporal.period);
            progress.inc(1);

            Classified {
                raw,
                temporal,
                severity,
                impact,
                area,
            }
        })
        .collect();

    // pass 2: area scores, then raw record risk
    let areas = aggregator.finish(&config.area_weights);
    report.areas = areas.len() as u64;
    log::debug!("Scored {} areas", areas.len());

    let composer = RecordRiskComposer::new(config.record_weights, config.modifiers);
    let risks: Vec<_> = classified
        .iter()
        .map(|c| {
            let area_risk = areas.normalized_score(c.area).unwrap_or_else(|| {
                report.areas_without_statistics += 1;
                0.0
            });
            composer.compose(
                area_risk,
                c.severity.severity(),
                c.raw.domestic,
                c.raw.arrest,
            )
        })
        .collect();

    // pass 3: global normalization and bucketing
    let raw_scores: Vec<f64> = risks.iter().map(|r| r.raw).collect();
    let finals = min_max_normalize(&raw_scores);

    let enriched: Vec<EnrichedIncidentRecord> = classified
        .into_iter()
        .zip(risks)
        .zip(finals)
        .map(|((c, risk), score)| {
            let level = risk_level(score, &config.thresholds);
            report.risk_levels.record(level);
            EnrichedIncidentRecord {
                raw: c.raw,
                hour: c.temporal.hour,
                period_of_day: c.temporal.period,
                severity: c.severity.severity().into(),
                victims_count: c.impact.count,
                victim_type_breakdown: c.impact.breakdown,
                district_risk_norm: risk.area_risk,
                severity_norm: risk.severity_norm,
                risk_raw: risk.raw,
                risk_location_score: score,
                risk_level: level,
            }
        })
        .collect();

    report.records = enriched.len() as u64;
    progress.finish(format!("enriched {} records", report.records));
    log::info!(
        "Enriched {} records across {} areas ({} low, {} medium, {} high)",
        report.records,
        report.areas,
        report.risk_levels.low,
        report.risk_levels.medium,
        report.risk_levels.high,
    );

    EnrichOutput {
        records: enriched,
        areas: areas.into_vec(),
        report,
    }
}
