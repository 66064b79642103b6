//! Header-to-field resolution.
//!
//! Each logical field lists candidate header names, tried in order and
//! matched case-insensitively. The defaults accept both the raw Chicago
//! export headers and their snake_case renamings.

use serde::{Deserialize, Serialize};

use crate::SourceError;

fn names(candidates: &[&str]) -> Vec<String> {
    candidates.iter().map(|s| (*s).to_string()).collect()
}

/// Candidate header names for each field the loader types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Record identifier (used for duplicate removal).
    pub id: Vec<String>,
    /// Case number.
    pub case_number: Vec<String>,
    /// Primary offense type. Required.
    pub category: Vec<String>,
    /// Offense description.
    pub description: Vec<String>,
    /// Location description.
    pub location_description: Vec<String>,
    /// Block address.
    pub block: Vec<String>,
    /// Occurrence timestamp.
    pub timestamp: Vec<String>,
    /// Area / district identifier.
    pub area: Vec<String>,
    /// Domestic flag.
    pub domestic: Vec<String>,
    /// Arrest flag.
    pub arrest: Vec<String>,
    /// Latitude.
    pub latitude: Vec<String>,
    /// Longitude.
    pub longitude: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: names(&["ID", "id"]),
            case_number: names(&["Case Number", "case_number"]),
            category: names(&["Primary Type", "primary_type", "category"]),
            description: names(&["Description"]),
            location_description: names(&["Location Description", "location_description"]),
            block: names(&["Block"]),
            timestamp: names(&["Date", "timestamp", "occurred_at"]),
            area: names(&["District", "area", "area_id"]),
            domestic: names(&["Domestic"]),
            arrest: names(&["Arrest"]),
            latitude: names(&["Latitude", "lat"]),
            longitude: names(&["Longitude", "lon", "lng"]),
        }
    }
}

/// Column indices resolved against a concrete header row.
#[derive(Debug, Clone, PartialEq, Eq)]
///
/// Every index points into the header row; `None` means no candidate name
/// matched and the field is read as missing on every row.
pub struct ResolvedColumns {
    /// Record identifier.
    pub id: Option<usize>,
    /// Case number.
    pub case_number: Option<usize>,
    /// Primary offense type. Always present.
    pub category: usize,
    /// Offense description.
    pub description: Option<usize>,
    /// Location description.
    pub location_description: Option<usize>,
    /// Block address.
    pub block: Option<usize>,
    /// Occurrence timestamp.
    pub timestamp: Option<usize>,
    /// Area / district identifier.
    pub area: Option<usize>,
    /// Domestic flag.
    pub domestic: Option<usize>,
    /// Arrest flag.
    pub arrest: Option<usize>,
    /// Latitude.
    pub latitude: Option<usize>,
    /// Longitude.
    pub longitude: Option<usize>,
}

impl ResolvedColumns {
    /// Returns `true` if the column at `index` is consumed by a typed field
    /// (and so must not be copied into the passthrough map).
    #[must_use]
    pub fn is_typed(&self, index: usize) -> bool {
        let optional = [
            self.id,
            self.case_number,
            self.description,
            self.location_description,
            self.block,
            self.timestamp,
            self.area,
            self.domestic,
            self.arrest,
            self.latitude,
            self.longitude,
        ];
        index == self.category || optional.contains(&Some(index))
    }
}

fn find(headers: &[String], candidates: &[String]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        let candidate = candidate.trim();
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(candidate))
    })
}

impl ColumnMapping {
    /// Resolves every field against `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] if no category column exists.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns, SourceError> {
        let category = find(headers, &self.category).ok_or_else(|| SourceError::MissingColumn {
            field: "category",
            candidates: self.category.join(", "),
        })?;

        Ok(ResolvedColumns {
            id: find(headers, &self.id),
            case_number: find(headers, &self.case_number),
            category,
            description: find(headers, &self.description),
            location_description: find(headers, &self.location_description),
            block: find(headers, &self.block),
            timestamp: find(headers, &self.timestamp),
            area: find(headers, &self.area),
            domestic: find(headers, &self.domestic),
            arrest: find(headers, &self.arrest),
            latitude: find(headers, &self.latitude),
            longitude: find(headers, &self.longitude),
        })
    }
}
