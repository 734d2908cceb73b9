//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. PARKING_CONFIG environment variable
//! 3. Default: config/garage.toml
//!
//! Fare rates are build-time constants (see `domain::fare`) and are not
//! configurable here.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/garage.toml";

/// Largest garage the in-memory store will seed
pub const MAX_SPOTS: u32 = 100_000;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site identifier used in logs
    #[serde(default = "default_site_id")]
    pub id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { id: default_site_id() }
    }
}

fn default_site_id() -> String {
    "parkit".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GarageConfig {
    /// CAR spots, numbered from 1
    #[serde(default = "default_car_spots")]
    pub car_spots: u32,
    /// BIKE spots, numbered after the CAR spots
    #[serde(default = "default_bike_spots")]
    pub bike_spots: u32,
}

impl Default for GarageConfig {
    fn default() -> Self {
        Self { car_spots: default_car_spots(), bike_spots: default_bike_spots() }
    }
}

fn default_car_spots() -> u32 {
    3
}

fn default_bike_spots() -> u32 {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Append closed tickets to `file`
    #[serde(default = "default_ledger_enabled")]
    pub enabled: bool,
    /// File path for the ticket ledger (JSONL format)
    #[serde(default = "default_ledger_file")]
    pub file: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { enabled: default_ledger_enabled(), file: default_ledger_file() }
    }
}

fn default_ledger_enabled() -> bool {
    true
}

fn default_ledger_file() -> String {
    "tickets.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub garage: GarageConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    site_id: String,
    car_spots: u32,
    bike_spots: u32,
    ledger_enabled: bool,
    ledger_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_id: default_site_id(),
            car_spots: default_car_spots(),
            bike_spots: default_bike_spots(),
            ledger_enabled: default_ledger_enabled(),
            ledger_file: default_ledger_file(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path from the command line or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        if let Ok(path) = env::var("PARKING_CONFIG") {
            return path;
        }

        DEFAULT_CONFIG_PATH.to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let garage = &toml_config.garage;
        match garage.car_spots.checked_add(garage.bike_spots) {
            Some(0) => bail!("Config file {} defines a garage without spots", path.display()),
            Some(total) if total <= MAX_SPOTS => {}
            _ => bail!(
                "Config file {} defines more than {} spots ({} car, {} bike)",
                path.display(),
                MAX_SPOTS,
                garage.car_spots,
                garage.bike_spots
            ),
        }

        Ok(Self {
            site_id: toml_config.site.id,
            car_spots: toml_config.garage.car_spots,
            bike_spots: toml_config.garage.bike_spots,
            ledger_enabled: toml_config.ledger.enabled,
            ledger_file: toml_config.ledger.file,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn car_spots(&self) -> u32 {
        self.car_spots
    }

    pub fn bike_spots(&self) -> u32 {
        self.bike_spots
    }

    pub fn ledger_enabled(&self) -> bool {
        self.ledger_enabled
    }

    pub fn ledger_file(&self) -> &str {
        &self.ledger_file
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to resize the garage
    #[cfg(test)]
    pub fn with_layout(mut self, car_spots: u32, bike_spots: u32) -> Self {
        self.car_spots = car_spots;
        self.bike_spots = bike_spots;
        self
    }
}
