//! CSV record loader.
//!
//! Reads a header row plus data rows, drops low-information rows and
//! duplicate ids, and types the remaining rows into [`RawIncidentRecord`]s.
//! A bad row never aborts the batch: it is counted in the [`LoadReport`]
//! and skipped or defaulted.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use city_safety_source_models::{Coordinates, RawIncidentRecord, is_reserved_field_name};
use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::columns::{ColumnMapping, ResolvedColumns};
use crate::parsing::{
    FieldParse, is_missing_cell, parse_area_id, parse_coordinate, parse_flag, parse_text,
    parse_timestamp,
};
use crate::progress::ProgressCallback;
use crate::validity::{RowVerdict, ValidityPolicy};

/// Loader settings, usually read from the `[loader]` table of the config
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Header names for each typed field.
    pub columns: ColumnMapping,
    /// Thresholds for dropping low-information rows.
    pub validity: ValidityPolicy,
    /// Field delimiter. Must be ASCII.
    pub delimiter: char,
    /// Drop rows whose id was already seen.
    pub dedupe_ids: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            validity: ValidityPolicy::default(),
            delimiter: ',',
            dedupe_ids: true,
        }
    }
}

/// Counts of everything the loader skipped or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Data rows read from the input.
    pub rows_read: u64,
    /// Rows turned into records.
    pub rows_kept: u64,
    /// Rows dropped for too many missing fields.
    pub sparse_rows: u64,
    /// Rows dropped for too many zero-valued fields.
    pub zero_heavy_rows: u64,
    /// Rows dropped because their id was already seen.
    pub duplicate_ids: u64,
    /// Rows the CSV reader could not decode.
    pub unreadable_rows: u64,
    /// Kept rows with no timestamp.
    pub missing_timestamps: u64,
    /// Kept rows whose timestamp could not be parsed.
    pub malformed_timestamps: u64,
    /// Kept rows with no area identifier.
    pub missing_area_ids: u64,
    /// Kept rows whose area identifier was not an integer.
    pub malformed_area_ids: u64,
    /// Kept rows whose coordinates were unparseable or out of range.
    pub invalid_coordinates: u64,
    /// Untyped header columns dropped because their name is an output field.
    pub reserved_columns: u64,
}

/// Records produced by a load, plus the report.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// Typed records in input order.
    pub records: Vec<RawIncidentRecord>,
    /// What was skipped or defaulted.
    pub report: LoadReport,
}

/// Loads incident rows from CSV.
#[derive(Debug, Clone, Default)]
pub struct RecordLoader {
    config: LoaderConfig,
}

impl RecordLoader {
    /// Creates a loader with the given settings.
    #[must_use]
    pub const fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Loads a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be opened, the header row
    /// is unreadable, or no category column exists.
    pub fn load_path(
        &self,
        path: &Path,
        limit: Option<u64>,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<LoadOutcome, SourceError> {
        log::info!("Loading incidents from {}", path.display());
        let file = std::fs::File::open(path)?;
        self.load_reader(file, limit, progress)
    }

    /// Loads CSV from any reader. `limit` caps the number of kept records.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the header row is unreadable, no category
    /// column exists, the delimiter is not ASCII, or the underlying reader
    /// fails.
    pub fn load_reader<R: Read>(
        &self,
        reader: R,
        limit: Option<u64>,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<LoadOutcome, SourceError> {
        let delimiter = u8::try_from(self.config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(SourceError::Delimiter(self.config.delimiter))?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();
        let columns = self.config.columns.resolve(&headers)?;
        log::debug!("Resolved columns: {columns:?}");

        let mut report = LoadReport::default();

        let passthrough: Vec<bool> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                if columns.is_typed(i) {
                    return false;
                }
                if is_reserved_field_name(header) {
                    log::warn!("Dropping column '{header}': name clashes with an output field");
                    report.reserved_columns += 1;
                    return false;
                }
                true
            })
            .collect();
        let mut records = Vec::new();
        let mut seen_ids = HashSet::new();

        for result in csv_reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    log::warn!("Skipping unreadable row: {e}");
                    report.rows_read += 1;
                    report.unreadable_rows += 1;
                    progress.inc(1);
                    continue;
                }
            };
            report.rows_read += 1;
            progress.inc(1);

            match self.config.validity.assess(headers.len(), row.iter()) {
                RowVerdict::Keep => {}
                RowVerdict::Sparse => {
                    report.sparse_rows += 1;
                    continue;
                }
                RowVerdict::ZeroHeavy => {
                    report.zero_heavy_rows += 1;
                    continue;
                }
            }

            let cell = |index: Option<usize>| index.and_then(|i| row.get(i)).unwrap_or("");

            if self.config.dedupe_ids
                && let Some(id) = parse_text(cell(columns.id))
                && !seen_ids.insert(id)
            {
                report.duplicate_ids += 1;
                continue;
            }

            records.push(build_record(&headers, &passthrough, &columns, &row, &mut report));
            report.rows_kept += 1;

            if let Some(limit) = limit
                && report.rows_kept >= limit
            {
                log::info!("Reached limit of {limit} records, stopping");
                break;
            }
        }

        log::info!(
            "Loaded {} of {} rows ({} sparse, {} zero-heavy, {} duplicate, {} unreadable)",
            report.rows_kept,
            report.rows_read,
            report.sparse_rows,
            report.zero_heavy_rows,
            report.duplicate_ids,
            report.unreadable_rows,
        );
        progress.finish(format!("loaded {} records", report.rows_kept));

        Ok(LoadOutcome { records, report })
    }
}

fn build_record(
    headers: &[String],
    passthrough: &[bool],
    columns: &ResolvedColumns,
    row: &csv::StringRecord,
    report: &mut LoadReport,
) -> RawIncidentRecord {
    let cell = |index: Option<usize>| index.and_then(|i| row.get(i)).unwrap_or("");

    let occurred_at = match parse_timestamp(cell(columns.timestamp)) {
        FieldParse::Parsed(dt) => Some(dt),
        FieldParse::Missing => {
            report.missing_timestamps += 1;
            None
        }
        FieldParse::Malformed => {
            report.malformed_timestamps += 1;
            None
        }
    };

    let area_id = match parse_area_id(cell(columns.area)) {
        FieldParse::Parsed(id) => Some(id),
        FieldParse::Missing => {
            report.missing_area_ids += 1;
            None
        }
        FieldParse::Malformed => {
            report.malformed_area_ids += 1;
            None
        }
    };

    let latitude = parse_coordinate(cell(columns.latitude));
    let longitude = parse_coordinate(cell(columns.longitude));
    let any_malformed = latitude.is_malformed() || longitude.is_malformed();
    let coordinates = match (latitude, longitude) {
        (FieldParse::Parsed(lat), FieldParse::Parsed(lon)) => {
            let point = Coordinates::new(lat, lon);
            if point.is_none() {
                report.invalid_coordinates += 1;
            }
            point
        }
        _ => {
            if any_malformed {
                report.invalid_coordinates += 1;
            }
            None
        }
    };

    let extra: BTreeMap<String, String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| passthrough.get(*i).copied().unwrap_or(false))
        .filter_map(|(i, header)| {
            let value = row.get(i)?;
            (!is_missing_cell(value)).then(|| (header.clone(), value.to_owned()))
        })
        .collect();

    RawIncidentRecord {
        id: parse_text(cell(columns.id)),
        case_number: parse_text(cell(columns.case_number)),
        category: parse_text(cell(Some(columns.category))).unwrap_or_default(),
        description: parse_text(cell(columns.description)),
        location_description: parse_text(cell(columns.location_description)),
        block: parse_text(cell(columns.block)),
        occurred_at,
        area_id,
        domestic: parse_flag(cell(columns.domestic)),
        arrest: parse_flag(cell(columns.arrest)),
        coordinates,
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    const SAMPLE: &str = "\
ID,Case Number,Date,Primary Type,Description,Arrest,Domestic,District,Ward,Latitude,Longitude
1,JA100,2024-01-15T23:10:00,THEFT,OVER $500,false,false,11,28,41.88,-87.63
2,JA101,01/16/2024 08:05:00 AM,battery,SIMPLE,true,true,,28,41.70,-87.60
3,JA102,not a date,HOMICIDE,FIRST DEGREE,0,1,7.0,17,95.0,-87.60
1,JA100,2024-01-15T23:10:00,THEFT,OVER $500,false,false,11,28,41.88,-87.63
";

    fn load(input: &str, config: LoaderConfig) -> LoadOutcome {
        RecordLoader::new(config)
            .load_reader(input.as_bytes(), None, &null_progress())
            .unwrap()
    }

    #[test]
    fn types_rows_and_counts_defaults() {
        let outcome = load(SAMPLE, LoaderConfig::default());
        assert_eq!(outcome.report.rows_read, 4);
        assert_eq!(outcome.report.rows_kept, 3);
        assert_eq!(outcome.report.duplicate_ids, 1);
        assert_eq!(outcome.report.missing_area_ids, 1);
        assert_eq!(outcome.report.malformed_timestamps, 1);
        assert_eq!(outcome.report.invalid_coordinates, 1);

        let first = &outcome.records[0];
        assert_eq!(first.id.as_deref(), Some("1"));
        assert_eq!(first.category, "THEFT");
        assert_eq!(first.area_id, Some(11));
        assert!(!first.arrest);
        assert_eq!(first.extra.get("Ward").map(String::as_str), Some("28"));
        assert!(first.coordinates.is_some());

        let second = &outcome.records[1];
        assert_eq!(second.category, "battery");
        assert!(second.arrest && second.domestic);
        assert_eq!(second.area_id, None);
        assert_eq!(
            second.occurred_at.unwrap().format("%H:%M").to_string(),
            "08:05"
        );

        let third = &outcome.records[2];
        assert_eq!(third.occurred_at, None);
        assert_eq!(third.area_id, Some(7));
        assert!(!third.arrest);
        assert!(third.domestic);
        assert_eq!(third.coordinates, None);
    }

    #[test]
    fn keeps_duplicates_when_dedupe_disabled() {
        let config = LoaderConfig {
            dedupe_ids: false,
            ..LoaderConfig::default()
        };
        let outcome = load(SAMPLE, config);
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.report.duplicate_ids, 0);
    }

    #[test]
    fn applies_limit_to_kept_records() {
        let outcome = RecordLoader::default()
            .load_reader(SAMPLE.as_bytes(), Some(2), &null_progress())
            .unwrap();
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn drops_sparse_and_zero_heavy_rows() {
        let mut input = String::from("Primary Type");
        for i in 0..21 {
            input.push_str(&format!(",c{i}"));
        }
        input.push('\n');
        // fully populated
        input.push_str("THEFT");
        for i in 0..21 {
            input.push_str(&format!(",x{i}"));
        }
        input.push('\n');
        // only five fields present
        input.push_str("THEFT,a,b,c,d");
        input.push_str(&",".repeat(17));
        input.push('\n');
        // ten zeros
        input.push_str("THEFT");
        for i in 0..21 {
            input.push_str(if i < 10 { ",0" } else { ",y" });
        }
        input.push('\n');

        let outcome = load(&input, LoaderConfig::default());
        assert_eq!(outcome.report.rows_read, 3);
        assert_eq!(outcome.report.sparse_rows, 1);
        assert_eq!(outcome.report.zero_heavy_rows, 1);
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn drops_passthrough_columns_named_like_output_fields() {
        let outcome = load(
            "Primary Type,District,severity,hour,Ward\nTHEFT,1,3,7,28\n",
            LoaderConfig::default(),
        );
        assert_eq!(outcome.report.reserved_columns, 2);
        let record = &outcome.records[0];
        assert_eq!(record.area_id, Some(1));
        assert_eq!(record.extra.len(), 1);
        assert_eq!(record.extra.get("Ward").map(String::as_str), Some("28"));
    }

    #[test]
    fn missing_category_column_fails() {
        let err = RecordLoader::default()
            .load_reader("Date,District\n2024-01-01,1\n".as_bytes(), None, &null_progress())
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { .. }));
    }

    #[test]
    fn honors_custom_delimiter() {
        let config = LoaderConfig {
            delimiter: ';',
            ..LoaderConfig::default()
        };
        let outcome = load("primary_type;district\nROBBERY;4\n", config);
        assert_eq!(outcome.records[0].category, "ROBBERY");
        assert_eq!(outcome.records[0].area_id, Some(4));
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let config = LoaderConfig {
            delimiter: '§',
            ..LoaderConfig::default()
        };
        let err = RecordLoader::new(config)
            .load_reader("a\n".as_bytes(), None, &null_progress())
            .unwrap_err();
        assert!(matches!(err, SourceError::Delimiter('§')));
    }

    #[test]
    fn config_deserializes_partial_toml() {
        let config: LoaderConfig = toml::from_str(
            r#"
            delimiter = "\t"
            [columns]
            category = ["Offense"]
            [validity]
            max_zero_fields = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.columns.category, vec!["Offense".to_string()]);
        assert_eq!(config.validity.max_zero_fields, 3);
        assert_eq!(config.validity.min_present, 6);
        assert!(config.dedupe_ids);
    }
}
