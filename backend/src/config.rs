//! Configuration management for the Coffee Quality Dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CQD_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::DashboardSettings;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Dataset source
    pub dataset: DatasetConfig,

    /// Initial dashboard controls handed to the browser
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Path of the cleaned coffee quality CSV
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Initial lower handle of the total cup points slider
    pub total_score_min: f64,

    /// Initial upper handle of the total cup points slider
    pub total_score_max: f64,

    /// Dataset country spellings that differ from the map geometry.
    /// Kept as a list because config keys are case-folded.
    #[serde(default)]
    pub country_aliases: Vec<CountryAlias>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CountryAlias {
    pub from: String,
    pub to: String,
}

impl DashboardConfig {
    /// Settings served to the browser binding
    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            total_score_min: self.total_score_min,
            total_score_max: self.total_score_max,
            country_aliases: self
                .country_aliases
                .iter()
                .map(|alias| (alias.from.clone(), alias.to.clone()))
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CQD_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = DashboardSettings::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("dataset.path", "data/sample_coffee_quality.csv")?
            .set_default("dashboard.total_score_min", defaults.total_score_min)?
            .set_default("dashboard.total_score_max", defaults.total_score_max)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CQD_ prefix)
            .add_source(
                Environment::with_prefix("CQD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let defaults = DashboardSettings::default();
        Self {
            total_score_min: defaults.total_score_min,
            total_score_max: defaults.total_score_max,
            country_aliases: Vec::new(),
        }
    }
}
