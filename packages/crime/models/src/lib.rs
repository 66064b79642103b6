#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Severity scale, time-of-day periods, risk levels, and the static
//! per-category lookup tables used by the enrichment engine.
//!
//! The tables in [`severity`] and [`victims`] are immutable configuration:
//! they are built once (either from the built-in defaults or from a config
//! file) and passed explicitly to the classifiers that read them.

pub mod severity;
pub mod victims;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Ordinal severity of a crime category, from 0 (non-criminal) to 5.
///
/// Serialized as its numeric value so that downstream consumers can filter
/// on it directly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrimeSeverity {
    /// Level 0: incidents that are not crimes (welfare checks, etc.)
    NonCriminal = 0,
    /// Level 1: minor offenses, and the default for unknown categories
    VeryLow = 1,
    /// Level 2: low-level offenses (theft, trespass)
    Low = 2,
    /// Level 3: moderate offenses (burglary, narcotics)
    Medium = 3,
    /// Level 4: serious offenses (robbery, battery, weapons)
    High = 4,
    /// Level 5: most severe offenses (homicide, sexual assault, kidnapping)
    VeryHigh = 5,
}

impl CrimeSeverity {
    /// Severity assigned when a category has no entry in the table.
    ///
    /// An unmatched category is treated as minor, not as non-criminal.
    pub const DEFAULT: Self = Self::VeryLow;

    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverityError> {
        match value {
            0 => Ok(Self::NonCriminal),
            1 => Ok(Self::VeryLow),
            2 => Ok(Self::Low),
            3 => Ok(Self::Medium),
            4 => Ok(Self::High),
            5 => Ok(Self::VeryHigh),
            _ => Err(InvalidSeverityError { value }),
        }
    }

    /// Human-readable label used by the query API ("Very Low" .. "Very High").
    ///
    /// Must stay aligned with the numeric scale: the search layer filters on
    /// the number and displays this label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NonCriminal => "Non-Criminal",
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Maps the severity onto the record-level scale `(severity - 1) / 4`.
    ///
    /// `NonCriminal` yields `-0.25`; the final record normalization absorbs
    /// values outside `[0, 1]`.
    #[must_use]
    pub fn normalized(self) -> f64 {
        (f64::from(self.value()) - 1.0) / 4.0
    }

    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::NonCriminal,
            Self::VeryLow,
            Self::Low,
            Self::Medium,
            Self::High,
            Self::VeryHigh,
        ]
    }
}

impl From<CrimeSeverity> for u8 {
    fn from(value: CrimeSeverity) -> Self {
        value.value()
    }
}

impl TryFrom<u8> for CrimeSeverity {
    type Error = InvalidSeverityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Error returned when attempting to create a [`CrimeSeverity`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity value {}: expected 0-5", self.value)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Four-way time-of-day bucket, plus `Unknown` for records without a usable
/// timestamp.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimePeriod {
    /// 05:00 to 11:59
    Morning,
    /// 12:00 to 16:59
    Afternoon,
    /// 17:00 to 21:59
    Evening,
    /// 22:00 to 04:59
    Night,
    /// No hour available
    Unknown,
}

impl TimePeriod {
    /// Buckets an hour of the day. Hours outside 0-23 fall into `Night`, the
    /// catch-all band.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=21 => Self::Evening,
            _ => Self::Night,
        }
    }
}

/// Three-level categorical bucket of the final normalized record risk.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RiskLevel {
    /// Below the medium threshold
    Low,
    /// At or above the medium threshold and below the high threshold
    Medium,
    /// At or above the high threshold
    High,
}

impl RiskLevel {
    /// Buckets a score using lower-bound-inclusive thresholds.
    ///
    /// Every score maps to exactly one level; `NaN` maps to `Low`.
    #[must_use]
    pub fn from_score(score: f64, medium: f64, high: f64) -> Self {
        if score >= high {
            Self::High
        } else if score >= medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}
