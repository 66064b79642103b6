#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the city safety enrichment engine.
//!
//! Uses `indicatif-log-bridge` (via [`city_safety_cli_utils::init_logger`])
//! so `log` output and progress bars share the terminal cleanly.

mod config;
mod enrich;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use city_safety_enrich::severity::classify;
use city_safety_enrich::victims::{ProfileSource, VictimImpactSimulator};
use city_safety_export::ExportFormat;
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "city_safety", about = "Crime incident enrichment and risk scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich an incident CSV with severity, victim impact, and risk scores
    Enrich {
        /// Input CSV file with a header row
        #[arg(long)]
        input: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format: `jsonl` or `csv` (default: from the output
        /// extension, else `jsonl`)
        #[arg(long)]
        format: Option<ExportFormat>,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Random seed for victim simulation (overrides the config)
        #[arg(long)]
        seed: Option<u64>,
        /// Also write per-area statistics as JSON to this path
        #[arg(long)]
        areas: Option<PathBuf>,
        /// Maximum number of records to load
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Print the severity of a crime category
    Severity {
        /// Category name (e.g., "HOMICIDE")
        category: String,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the victim impact simulator repeatedly for a category
    Simulate {
        /// Category name (e.g., "ROBBERY")
        category: String,
        /// Random seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of simulated incidents
        #[arg(long, default_value = "1000")]
        trials: u32,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = city_safety_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Enrich {
            input,
            output,
            format,
            config,
            seed,
            areas,
            limit,
        } => {
            let mut app_config = AppConfig::load(config.as_deref())?;
            if let Some(seed) = seed {
                app_config.enrich.seed = seed;
            }
            let format = format.unwrap_or_else(|| {
                output
                    .as_deref()
                    .map_or(ExportFormat::Jsonl, ExportFormat::from_path)
            });
            enrich::run(
                &multi,
                &app_config,
                &enrich::EnrichArgs {
                    input,
                    output,
                    format,
                    areas,
                    limit,
                },
            )?;
        }
        Commands::Severity { category, config } => {
            let app_config = AppConfig::load(config.as_deref())?;
            let lookup = classify(&category, &app_config.enrich.severity_table);
            let severity = lookup.severity();
            println!(
                "{category}: {} ({}){}",
                severity.value(),
                severity.label(),
                if lookup.is_defaulted() {
                    " [not in table, default]"
                } else {
                    ""
                }
            );
        }
        Commands::Simulate {
            category,
            seed,
            trials,
            config,
        } => {
            let app_config = AppConfig::load(config.as_deref())?;
            let mut rng = StdRng::seed_from_u64(seed.unwrap_or(app_config.enrich.seed));
            let simulator = VictimImpactSimulator::new(&app_config.enrich.victim_profiles);

            let mut victims = 0_u64;
            let mut hits = [0_u32; 3];
            let mut fallback = false;
            for _ in 0..trials {
                let impact = simulator.simulate(&category, &mut rng);
                fallback = impact.profile == ProfileSource::Fallback;
                victims += u64::from(impact.count);
                let b = impact.breakdown;
                for (hit, n) in hits.iter_mut().zip([b.physical, b.psychological, b.property]) {
                    if n > 0 {
                        *hit += 1;
                    }
                }
            }

            let trials_f = f64::from(trials.max(1));
            #[allow(clippy::cast_precision_loss)]
            let mean = victims as f64 / trials_f;
            println!(
                "{category} ({} trials{})",
                trials,
                if fallback { ", fallback profile" } else { "" }
            );
            println!("{:<16} {mean:.3}", "mean victims");
            for (name, hit) in ["physical", "psychological", "property"].iter().zip(hits) {
                println!("{name:<16} {:.1}%", f64::from(hit) / trials_f * 100.0);
            }
        }
        Commands::Config { config } => {
            let app_config = AppConfig::load(config.as_deref())?;
            print!("{}", app_config.to_toml_string()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_enrich_format_flag() {
        let cli = Cli::try_parse_from([
            "city_safety",
            "enrich",
            "--input",
            "in.csv",
            "--format",
            "csv",
            "--seed",
            "7",
        ])
        .unwrap();
        let Commands::Enrich { format, seed, .. } = cli.command else {
            panic!("expected enrich");
        };
        assert_eq!(format, Some(ExportFormat::Csv));
        assert_eq!(seed, Some(7));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(
            Cli::try_parse_from(["city_safety", "enrich", "--input", "x", "--format", "xml"])
                .is_err()
        );
    }
}
