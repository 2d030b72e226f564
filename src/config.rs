use crate::error::ConfigError;
use crate::filter::FilterCriteria;
use crate::sources::{CsvSource, JsonRowsSource, RecordSource, SupabaseSource};
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Criteria applied before the listings are written out
    #[serde(default)]
    pub filter: FilterCriteria,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Json,
    Supabase,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// File to read for `csv` / `json`
    pub path: Option<PathBuf>,
    /// Project URL for `supabase`
    pub url: Option<String>,
    /// Environment variable holding the Supabase API key
    #[serde(default = "default_key_env")]
    pub key_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("properties.json"),
        }
    }
}

fn default_key_env() -> String {
    "SUPABASE_ANON_KEY".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[source]
kind = "csv"
path = "listing.csv"

[output]
path = "properties.json"
"#;

pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Load configuration
///
/// Search order:
/// 1. The path given on the command line (must exist)
/// 2. `config.toml` in the working directory
/// 3. Falls back to embedded default config
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let candidate = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from("config.toml")).filter(|p| p.exists()),
    };

    if let Some(config_path) = candidate {
        tracing::info!("Loading config from: {}", config_path.display());
        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = parse_config(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        return Ok(config);
    }

    tracing::info!("Using default embedded configuration");
    Ok(parse_config(DEFAULT_CONFIG)?)
}

/// Build the record source described by the `[source]` table
pub fn build_source(config: &SourceConfig) -> anyhow::Result<Box<dyn RecordSource>> {
    match config.kind {
        SourceKind::Csv => {
            let path = config.path.clone().ok_or(ConfigError::MissingField("source.path"))?;
            Ok(Box::new(CsvSource::new(path)))
        }
        SourceKind::Json => {
            let path = config.path.clone().ok_or(ConfigError::MissingField("source.path"))?;
            Ok(Box::new(JsonRowsSource::new(path)))
        }
        SourceKind::Supabase => {
            let url = config.url.clone().ok_or(ConfigError::MissingField("source.url"))?;
            let key = std::env::var(&config.key_env)
                .map_err(|_| ConfigError::MissingEnv(config.key_env.clone()))?;
            Ok(Box::new(SupabaseSource::new(url, key)?))
        }
    }
}
