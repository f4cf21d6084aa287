//! Dashboard Configuration
//! Input locations and cleaning parameters, read from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "VANUATU_DASHBOARD_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What to do with a recovery-needs cell that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Abort the load with a parse error.
    #[default]
    Strict,
    /// Keep the row and store a null.
    Coerce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorEffectsOptions {
    /// Rows at the top of the worksheet that are not data
    /// (header, two title rows, one sub-header).
    pub skip_rows: usize,
    /// Sector labels that are aggregates or footers rather than sectors.
    pub excluded_sectors: Vec<String>,
}

impl Default for SectorEffectsOptions {
    fn default() -> Self {
        Self {
            skip_rows: 4,
            excluded_sectors: vec![
                "Grand Total".to_string(),
                "Source: Vanuatu PDNA, Pam 2015".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryNeedsOptions {
    /// Rows at the top of the file that are not data (header, sub-header).
    pub skip_rows: usize,
    pub numeric_policy: NumericPolicy,
}

impl Default for RecoveryNeedsOptions {
    fn default() -> Self {
        Self {
            skip_rows: 2,
            numeric_policy: NumericPolicy::Strict,
        }
    }
}

/// Top-level dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sector_effects_path: PathBuf,
    pub recovery_needs_path: PathBuf,
    pub sector_effects: SectorEffectsOptions,
    pub recovery_needs: RecoveryNeedsOptions,
    /// Upper bound the ratio slider never exceeds.
    pub ratio_slider_cap: f64,
    pub ratio_slider_step: f64,
    pub export_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sector_effects_path: PathBuf::from("Summary of Disaster Effects by Sector_0.xlsx"),
            recovery_needs_path: PathBuf::from("Summary of recovery and reconstruction needs.csv"),
            sector_effects: SectorEffectsOptions::default(),
            recovery_needs: RecoveryNeedsOptions::default(),
            ratio_slider_cap: 5.0,
            ratio_slider_step: 0.1,
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl DashboardConfig {
    /// Config file location: `$VANUATU_DASHBOARD_CONFIG` or `./dashboard.json`.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse settings from JSON text. Lines starting with `//` are comments.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }
}
