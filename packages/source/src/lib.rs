#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record loading.
//!
//! Reads tabular incident exports, drops low-information rows, and coerces
//! the remaining cells into [`RawIncidentRecord`]s. Individual bad cells
//! never fail a load; they are defaulted and counted in a [`LoadReport`].
//!
//! [`RawIncidentRecord`]: city_safety_source_models::RawIncidentRecord

pub mod columns;
pub mod loader;
pub mod parsing;
pub mod progress;
pub mod validity;

pub use loader::{LoadOutcome, LoadReport, LoaderConfig, RecordLoader};

/// Errors that can occur while loading incident records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader failed on the header row or the underlying stream.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No header matched any candidate name for a required field.
    #[error("No column found for {field} (tried: {candidates})")]
    MissingColumn {
        /// Logical field name.
        field: &'static str,
        /// Candidate header names that were tried.
        candidates: String,
    },

    /// The configured delimiter is not a single ASCII character.
    #[error("Delimiter must be ASCII, got {0:?}")]
    Delimiter(char),
}
