//! The `enrich` command: load, enrich, write, summarize.

use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use city_safety_cli_utils::{IndicatifProgress, MultiProgress};
use city_safety_crime_models::RiskLevel;
use city_safety_enrich::enrich_with_seed;
use city_safety_export::{
    ExportFormat, write_area_statistics_to_path, write_records, write_records_to_path,
};
use city_safety_source::RecordLoader;

use crate::config::AppConfig;

pub struct EnrichArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: ExportFormat,
    pub areas: Option<PathBuf>,
    pub limit: Option<u64>,
}

pub fn run(
    multi: &MultiProgress,
    config: &AppConfig,
    args: &EnrichArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let loader = RecordLoader::new(config.loader.clone());
    let load_progress = IndicatifProgress::rows_spinner(multi, "Loading incidents");
    let loaded = loader.load_path(&args.input, args.limit, &load_progress)?;
    log::info!("Load report: {:?}", loaded.report);

    let enrich_progress = IndicatifProgress::records_bar(multi, "Enriching");
    let output = enrich_with_seed(loaded.records, &config.enrich, &enrich_progress);
    log::info!("Enrich report: {:?}", output.report);

    match &args.output {
        Some(path) => write_records_to_path(path, &output.records, args.format)?,
        None => write_records(
            BufWriter::new(std::io::stdout().lock()),
            &output.records,
            args.format,
        )?,
    }
    if let Some(path) = &args.areas {
        write_area_statistics_to_path(path, &output.areas)?;
    }

    let load = &loaded.report;
    let report = &output.report;
    eprintln!();
    eprintln!("Rows read:       {}", load.rows_read);
    eprintln!(
        "Rows dropped:    {} sparse, {} zero-heavy, {} duplicate, {} unreadable",
        load.sparse_rows, load.zero_heavy_rows, load.duplicate_ids, load.unreadable_rows
    );
    eprintln!("Records out:     {}", report.records);
    eprintln!("Areas:           {}", report.areas);
    for level in RiskLevel::all() {
        eprintln!(
            "{:<16} {}",
            format!("{level} risk:"),
            report.risk_levels.get(*level)
        );
    }
    eprintln!("Elapsed:         {:.1}s", start.elapsed().as_secs_f64());

    Ok(())
}
