#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw and enriched incident record types.
//!
//! [`RawIncidentRecord`] is what the loader produces from one input row.
//! [`EnrichedIncidentRecord`] is the raw record plus every derived field and
//! is the shape handed to the persistence and indexing collaborators. Field
//! names on the wire are the snake_case names those collaborators expect.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use city_safety_crime_models::{CrimeSeverity, RiskLevel, TimePeriod};
use serde::{Deserialize, Serialize};

/// WGS84 point attached to an incident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, within `[-90, 90]`.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a point, returning `None` if either component is out of range
    /// or not finite.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        ((-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude))
            .then_some(Self {
                latitude,
                longitude,
            })
    }
}

/// Wire names of every typed and derived field of [`EnrichedIncidentRecord`].
/// Passthrough columns with one of these names would produce a duplicate
/// key in the output document, so the loader drops them.
pub const RESERVED_FIELD_NAMES: &[&str] = &[
    "id",
    "case_number",
    "primary_type",
    "description",
    "location_description",
    "block",
    "date",
    "district",
    "domestic",
    "arrest",
    "location",
    "hour",
    "period_of_day",
    "severity",
    "victims_count",
    "victim_type_breakdown",
    "district_risk_norm",
    "severity_norm",
    "risk_raw",
    "risk_location_score",
    "risk_level",
];

/// Returns `true` if `name` is the wire name of a typed or derived field.
#[must_use]
pub fn is_reserved_field_name(name: &str) -> bool {
    RESERVED_FIELD_NAMES.contains(&name)
}

/// One incident as loaded from the input batch. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIncidentRecord {
    /// Source record identifier, if the input has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Case number, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    /// Primary offense type as written in the input.
    #[serde(rename = "primary_type")]
    pub category: String,
    /// Free-text offense description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-text location description ("STREET", "RESIDENCE", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_description: Option<String>,
    /// Block-level address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    /// When the incident occurred, in the local wall-clock time of the
    /// source. `None` if missing or unparseable.
    #[serde(rename = "date")]
    pub occurred_at: Option<NaiveDateTime>,
    /// Area (district) identifier. `None` if missing or not an integer.
    #[serde(rename = "district")]
    pub area_id: Option<i64>,
    /// Whether the incident was flagged domestic.
    pub domestic: bool,
    /// Whether an arrest was made.
    pub arrest: bool,
    /// Point location, if both coordinates were present and valid.
    #[serde(rename = "location")]
    pub coordinates: Option<Coordinates>,
    /// Every other input column, passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Grouping key for area-level statistics.
///
/// Records without a usable area identifier are grouped under
/// [`AreaKey::Unknown`], never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AreaKey {
    /// Records whose area identifier was missing or unparseable.
    Unknown,
    /// A parsed area identifier.
    Known(i64),
}

impl AreaKey {
    /// Wire value used for [`AreaKey::Unknown`].
    pub const UNKNOWN_SENTINEL: i64 = -1;

    /// Returns the numeric identifier, with the sentinel for `Unknown`.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Unknown => Self::UNKNOWN_SENTINEL,
            Self::Known(id) => id,
        }
    }
}

impl From<Option<i64>> for AreaKey {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl std::fmt::Display for AreaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Known(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for AreaKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for AreaKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = i64::deserialize(deserializer)?;
        Ok(if id == Self::UNKNOWN_SENTINEL {
            Self::Unknown
        } else {
            Self::Known(id)
        })
    }
}

/// Simulated harm counts per dimension for one incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictimBreakdown {
    /// Victims with bodily harm.
    pub physical: u32,
    /// Victims with psychological harm.
    pub psychological: u32,
    /// Victims with property loss.
    pub property: u32,
}

impl VictimBreakdown {
    /// Sum of the three dimensions. Can exceed the victim count, since one
    /// victim may be counted in several dimensions.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.physical + self.psychological + self.property
    }
}

/// Severity as a structured sub-field: the numeric level and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityField {
    /// Numeric level, 0-5.
    pub value: CrimeSeverity,
    /// Display label for the level.
    pub label: &'static str,
}

impl From<CrimeSeverity> for SeverityField {
    fn from(severity: CrimeSeverity) -> Self {
        Self {
            value: severity,
            label: severity.label(),
        }
    }
}

/// A raw record plus every field derived by the enrichment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedIncidentRecord {
    /// The input record, flattened into the output document.
    #[serde(flatten)]
    pub raw: RawIncidentRecord,
    /// Hour of day (0-23), absent when the timestamp is.
    pub hour: Option<u32>,
    /// Time-of-day bucket.
    pub period_of_day: TimePeriod,
    /// Category severity.
    pub severity: SeverityField,
    /// Simulated number of victims.
    pub victims_count: u32,
    /// Simulated harm per dimension.
    pub victim_type_breakdown: VictimBreakdown,
    /// Normalized risk of the record's area, in `[0, 1]`.
    pub district_risk_norm: f64,
    /// Record severity mapped by `(severity - 1) / 4`.
    pub severity_norm: f64,
    /// Weighted record risk before the dataset-wide normalization.
    pub risk_raw: f64,
    /// Final record risk, min-max normalized over the batch into `[0, 1]`.
    pub risk_location_score: f64,
    /// Bucket of `risk_location_score`.
    pub risk_level: RiskLevel,
}
