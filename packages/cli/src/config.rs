//! Config file handling for the binary.
//!
//! One TOML file carries both the enrichment settings (top level) and the
//! loader settings (`[loader]` table).

use std::path::Path;

use city_safety_enrich_models::{ConfigError, EnrichConfig};
use city_safety_source::LoaderConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub enrich: EnrichConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl AppConfig {
    /// Parses and validates a config document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.enrich.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };
        log::info!("Loading config from {}", path.display());
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use city_safety_crime_models::CrimeSeverity;

    use super::*;

    #[test]
    fn reads_enrich_keys_and_loader_table() {
        let config = AppConfig::from_toml_str(
            r#"
            seed = 1234
            violent_severity = 3

            [record_weights]
            area = 0.5
            severity = 0.4
            modifiers = 0.1

            [loader]
            dedupe_ids = false

            [loader.columns]
            area = ["Beat"]
            "#,
        )
        .unwrap();
        assert_eq!(config.enrich.seed, 1234);
        assert_eq!(config.enrich.violent_severity, CrimeSeverity::Medium);
        assert!((config.enrich.record_weights.area - 0.5).abs() < f64::EPSILON);
        assert!(!config.loader.dedupe_ids);
        assert_eq!(config.loader.columns.area, vec!["Beat".to_string()]);
        assert_eq!(config.loader.delimiter, ',');
    }

    #[test]
    fn rejects_invalid_weights() {
        let err = AppConfig::from_toml_str("[area_weights]\ncrime_count = 0.9\n").unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum { .. }));
    }

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn rendered_config_reads_back() {
        let config = AppConfig::default();
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("[loader]"));
        assert_eq!(AppConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
