use crate::models::OptimizerConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub repository: RepositorySettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub optimizer: OptimizerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Where candidates come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Snapshot,
    Supabase,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositorySettings {
    #[serde(default = "default_source")]
    pub source: CandidateSource,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub supabase_key: String,
    #[serde(default = "default_supabase_table")]
    pub supabase_table: String,
    pub timeout_secs: Option<u64>,
}

fn default_source() -> CandidateSource { CandidateSource::Snapshot }
fn default_snapshot_path() -> String { "data/candidates.json".to_string() }
fn default_supabase_table() -> String { "users".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

fn default_cache_ttl() -> u64 { 60 }
fn default_cache_entries() -> u64 { 16 }

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerSettings {
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    #[serde(default = "default_generations")]
    pub generations: usize,
    #[serde(default = "default_elitism_count")]
    pub elitism_count: usize,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            elitism_count: default_elitism_count(),
            mutation_rate: default_mutation_rate(),
            min_score: default_min_score(),
        }
    }
}

fn default_population_size() -> usize { 20 }
fn default_generations() -> usize { 10 }
fn default_elitism_count() -> usize { 5 }
fn default_mutation_rate() -> f64 { 0.1 }
fn default_min_score() -> f64 { 30.0 }

impl OptimizerSettings {
    /// Convert into the engine's config, rejecting values the search cannot run with
    pub fn to_config(&self) -> Result<OptimizerConfig, ConfigError> {
        let config = OptimizerConfig {
            population_size: self.population_size,
            generations: self.generations,
            elitism_count: self.elitism_count,
            mutation_rate: self.mutation_rate,
            min_score: self.min_score,
        };

        config
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with GIGEBID__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., GIGEBID__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("GIGEBID")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GIGEBID")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional Supabase variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let supabase_url = env::var("SUPABASE_URL").ok();
    let supabase_key = env::var("SUPABASE_SERVICE_KEY").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = supabase_url {
        builder = builder.set_override("repository.supabase_url", url)?;
    }
    if let Some(key) = supabase_key {
        builder = builder.set_override("repository.supabase_key", key)?;
    }

    builder.build()
}
