// ABOUTME: Simulation configuration with defaults and file loading
// Supports TOML configuration files and environment variables

use crate::data::simulator::{DEFAULT_ITERATIONS, DEFAULT_PI_VALUES};
use crate::utils::error::{Result, SimError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_pi_values")]
    pub pi_values: Vec<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_export_format")]
    pub export_format: ExportFormat,
    #[serde(default = "default_context_length")]
    pub context_length: usize,
    #[serde(default = "default_max_splits")]
    pub max_splits: usize,
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    #[serde(skip)]
    pub export_path: Option<PathBuf>,
    #[serde(skip)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(SimError::Config(format!("unknown export format: {}", other))),
        }
    }
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_pi_values() -> Vec<f64> {
    DEFAULT_PI_VALUES.to_vec()
}

fn default_export_format() -> ExportFormat {
    ExportFormat::Csv
}

fn default_context_length() -> usize {
    100
}

fn default_max_splits() -> usize {
    7
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            pi_values: default_pi_values(),
            seed: None,
            export_format: default_export_format(),
            context_length: default_context_length(),
            max_splits: default_max_splits(),
            config_path: None,
            export_path: None,
            debug: false,
        }
    }
}

/// Parse a comma separated list of thresholds, e.g. `0.5,0.72,2`
pub fn parse_pi_values(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|e| SimError::Config(format!("invalid threshold '{}': {}", s, e)))
        })
        .collect()
}

impl SimConfig {
    pub fn load() -> Self {
        let mut config = Self::default();

        // Try to load from default location
        if let Some(proj_dirs) = ProjectDirs::from("com", "cache-sim", "cache-sim") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                if let Ok(file_config) = Self::load_from(&config_path) {
                    config = file_config;
                }
            }
        }

        config.apply_env();
        config
    }

    /// Load an explicit configuration file, surfacing parse errors
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Override with environment variables
    pub fn apply_env(&mut self) {
        if let Ok(iterations) = std::env::var("CACHE_SIM_ITERATIONS") {
            if let Ok(parsed) = iterations.parse() {
                self.iterations = parsed;
            }
        }

        if let Ok(seed) = std::env::var("CACHE_SIM_SEED") {
            if let Ok(parsed) = seed.parse() {
                self.seed = Some(parsed);
            }
        }

        if let Ok(values) = std::env::var("CACHE_SIM_PI_VALUES") {
            if let Ok(parsed) = parse_pi_values(&values) {
                self.pi_values = parsed;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.pi_values.is_empty() {
            return Err(SimError::Config("at least one threshold is required".to_string()));
        }
        if let Some(bad) = self.pi_values.iter().find(|pi| !pi.is_finite()) {
            return Err(SimError::Config(format!("threshold must be finite, got {}", bad)));
        }
        Ok(())
    }
}
