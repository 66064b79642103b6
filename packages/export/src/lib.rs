#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Output writers for enriched incidents.
//!
//! Records are written as JSON Lines (one object per record, every input
//! field plus the derived fields) or as CSV with the structured fields
//! flattened into columns. Area statistics are written as a pretty-printed
//! JSON array.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use city_safety_enrich_models::AreaStatistics;
use city_safety_source_models::EnrichedIncidentRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors that can occur while writing output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error (file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Record output format.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    /// One JSON object per line.
    #[default]
    Jsonl,
    /// Comma-separated values with a header row.
    Csv,
}

impl ExportFormat {
    /// Picks a format from a file extension: `.csv` is CSV, anything else
    /// JSON Lines.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Jsonl,
        }
    }
}

/// Writes one JSON object per record.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the writer fails.
pub fn write_jsonl<W: Write>(
    writer: &mut W,
    records: &[EnrichedIncidentRecord],
) -> Result<(), ExportError> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

const CSV_COLUMNS: &[&str] = &[
    "id",
    "case_number",
    "date",
    "primary_type",
    "description",
    "location_description",
    "block",
    "district",
    "domestic",
    "arrest",
    "latitude",
    "longitude",
    "hour",
    "period_of_day",
    "severity",
    "severity_label",
    "victims_count",
    "victims_physical",
    "victims_psychological",
    "victims_property",
    "district_risk_norm",
    "severity_norm",
    "risk_raw",
    "risk_location_score",
    "risk_level",
];

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn csv_row(record: &EnrichedIncidentRecord, extra_columns: &[&str]) -> Vec<String> {
    let raw = &record.raw;
    let mut row = vec![
        opt(raw.id.as_deref()),
        opt(raw.case_number.as_deref()),
        opt(raw
            .occurred_at
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())),
        raw.category.clone(),
        opt(raw.description.as_deref()),
        opt(raw.location_description.as_deref()),
        opt(raw.block.as_deref()),
        opt(raw.area_id),
        raw.domestic.to_string(),
        raw.arrest.to_string(),
        opt(raw.coordinates.map(|c| c.latitude)),
        opt(raw.coordinates.map(|c| c.longitude)),
        opt(record.hour),
        record.period_of_day.to_string(),
        record.severity.value.value().to_string(),
        record.severity.label.to_string(),
        record.victims_count.to_string(),
        record.victim_type_breakdown.physical.to_string(),
        record.victim_type_breakdown.psychological.to_string(),
        record.victim_type_breakdown.property.to_string(),
        record.district_risk_norm.to_string(),
        record.severity_norm.to_string(),
        record.risk_raw.to_string(),
        record.risk_location_score.to_string(),
        record.risk_level.to_string(),
    ];
    row.extend(
        extra_columns
            .iter()
            .map(|name| raw.extra.get(*name).cloned().unwrap_or_default()),
    );
    row
}

/// Writes records as CSV. Passthrough input columns follow the fixed
/// columns, in name order; a record lacking one gets an empty cell.
///
/// # Errors
///
/// Returns [`ExportError`] if the writer fails.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[EnrichedIncidentRecord],
) -> Result<(), ExportError> {
    let extra_columns: Vec<&str> = records
        .iter()
        .flat_map(|r| r.raw.extra.keys().map(String::as_str))
        .filter(|name| !CSV_COLUMNS.contains(name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS.iter().chain(&extra_columns))?;
    for record in records {
        csv_writer.write_record(csv_row(record, &extra_columns))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes records to `writer` in `format`.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the writer fails.
pub fn write_records<W: Write>(
    mut writer: W,
    records: &[EnrichedIncidentRecord],
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Jsonl => write_jsonl(&mut writer, records),
        ExportFormat::Csv => write_csv(writer, records),
    }
}

/// Writes records to a file, creating or truncating it.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_records_to_path(
    path: &Path,
    records: &[EnrichedIncidentRecord],
    format: ExportFormat,
) -> Result<(), ExportError> {
    log::info!("Writing {} records to {} as {format}", records.len(), path.display());
    let file = BufWriter::new(File::create(path)?);
    write_records(file, records, format)
}

/// Writes area statistics as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or the writer fails.
pub fn write_area_statistics<W: Write>(
    mut writer: W,
    areas: &[AreaStatistics],
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, areas)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes area statistics to a file, creating or truncating it.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_area_statistics_to_path(
    path: &Path,
    areas: &[AreaStatistics],
) -> Result<(), ExportError> {
    log::info!("Writing {} area statistics to {}", areas.len(), path.display());
    write_area_statistics(BufWriter::new(File::create(path)?), areas)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use chrono::NaiveDate;
    use city_safety_crime_models::{CrimeSeverity, RiskLevel, TimePeriod};
    use city_safety_source_models::{AreaKey, Coordinates, RawIncidentRecord, VictimBreakdown};

    use super::*;

    fn enriched(id: &str, extra: &[(&str, &str)]) -> EnrichedIncidentRecord {
        EnrichedIncidentRecord {
            raw: RawIncidentRecord {
                id: Some(id.to_string()),
                category: "ROBBERY".to_string(),
                occurred_at: NaiveDate::from_ymd_opt(2024, 5, 2)
                    .unwrap()
                    .and_hms_opt(22, 40, 0),
                area_id: Some(12),
                arrest: true,
                coordinates: Coordinates::new(41.9, -87.7),
                extra: extra
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                ..RawIncidentRecord::default()
            },
            hour: Some(22),
            period_of_day: TimePeriod::Night,
            severity: CrimeSeverity::High.into(),
            victims_count: 2,
            victim_type_breakdown: VictimBreakdown {
                physical: 1,
                psychological: 2,
                property: 0,
            },
            district_risk_norm: 0.5,
            severity_norm: 0.75,
            risk_raw: 0.515,
            risk_location_score: 0.8,
            risk_level: RiskLevel::High,
        }
    }

    #[test]
    fn jsonl_has_one_object_per_line_with_derived_fields() {
        let records = vec![enriched("1", &[("Ward", "28")]), enriched("2", &[])];
        let mut out = Vec::new();
        write_jsonl(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], "1");
        assert_eq!(first["Ward"], "28");
        assert_eq!(first["primary_type"], "ROBBERY");
        assert_eq!(first["date"], "2024-05-02T22:40:00");
        assert_eq!(first["district"], 12);
        assert_eq!(first["period_of_day"], "Night");
        assert_eq!(first["severity"], serde_json::json!({"value": 4, "label": "High"}));
        assert_eq!(
            first["victim_type_breakdown"],
            serde_json::json!({"physical": 1, "psychological": 2, "property": 0})
        );
        assert_eq!(first["risk_level"], "High");
        assert_eq!(first["location"], serde_json::json!({"lat": 41.9, "lon": -87.7}));
    }

    #[test]
    fn csv_flattens_structured_fields() {
        let records = vec![enriched("1", &[("Ward", "28")]), enriched("2", &[("Beat", "1234")])];
        let mut out = Vec::new();
        write_csv(&mut out, &records).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers.len(), CSV_COLUMNS.len() + 2);
        assert_eq!(headers[headers.len() - 2], "Beat");
        assert_eq!(headers[headers.len() - 1], "Ward");

        let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][column("severity")], "4");
        assert_eq!(&rows[0][column("severity_label")], "High");
        assert_eq!(&rows[0][column("victims_psychological")], "2");
        assert_eq!(&rows[0][column("latitude")], "41.9");
        assert_eq!(&rows[0][column("Ward")], "28");
        assert_eq!(&rows[0][column("Beat")], "");
        assert_eq!(&rows[1][column("Beat")], "1234");
    }

    #[test]
    fn csv_with_no_records_writes_header_only() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("id,case_number,date"));
    }

    #[test]
    fn area_statistics_are_a_pretty_array() {
        let areas = vec![AreaStatistics {
            area: AreaKey::Unknown,
            crime_count: 2,
            mean_severity: 1.5,
            violent_ratio: 0.0,
            night_ratio: 0.5,
            raw_score: 0.3,
            normalized_score: 0.0,
        }];
        let mut out = Vec::new();
        write_area_statistics(&mut out, &areas).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[\n"));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["area"], -1);
    }

    #[test]
    fn parses_format_names_and_extensions() {
        assert_eq!(ExportFormat::from_str("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_str("jsonl").unwrap(), ExportFormat::Jsonl);
        assert!(ExportFormat::from_str("xml").is_err());
        assert_eq!(ExportFormat::from_path(Path::new("out/data.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out/data.jsonl")), ExportFormat::Jsonl);
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
    }
}
