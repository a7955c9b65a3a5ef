//! Configuration file loading

use anyhow::Context;
use fuzzysearch::IndexConfig;
use fuzzysearch::query::DEFAULT_MAX_RESULTS;
use fuzzysearch_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root of `fuzzysearch.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSchema {
    /// Settings for newly built indexes
    #[serde(default)]
    pub index: IndexConfig,

    /// Query defaults
    #[serde(default)]
    pub query: QueryDefaults,

    /// Logging
    #[serde(default)]
    pub log: TelemetryConfig,
}

/// Defaults applied when `query` flags are omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefaults {
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default)]
    pub min_score: f64,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_score: 0.0,
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path, a standard location, or defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        "fuzzysearch.toml",
        ".fuzzysearch.toml",
        ".config/fuzzysearch.toml",
    ];

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> anyhow::Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let schema: ConfigSchema = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    schema
        .index
        .validate()
        .with_context(|| format!("Invalid [index] section in {}", path.display()))?;

    Ok(schema)
}
