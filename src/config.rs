use crate::core::{default_facets, Facet, FacetSchema, SchemaError, DEFAULT_TOP_K};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub oracle: OracleSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    /// Ordered facet list; defaults to the built-in ten facets
    #[serde(default = "default_facets")]
    pub facets: Vec<Facet>,
    /// Optional weight table; when present it must name every facet exactly
    #[serde(default)]
    pub weights: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct OracleSettings {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_oracle_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many candidates the oracle is asked to propose
    #[serde(default = "default_candidate_count")]
    pub candidate_count: usize,
    /// Follow-up requests asking the model to fix unparsable output
    #[serde(default = "default_repair_attempts")]
    pub repair_attempts: u32,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: default_oracle_endpoint(),
            api_key: String::new(),
            model: default_oracle_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            candidate_count: default_candidate_count(),
            repair_attempts: default_repair_attempts(),
        }
    }
}

fn default_oracle_endpoint() -> String { "https://api.openai.com/v1".to_string() }
fn default_oracle_model() -> String { "gpt-4o-mini".to_string() }
fn default_temperature() -> f32 { 0.4 }
fn default_timeout_secs() -> u64 { 30 }
fn default_candidate_count() -> usize { 6 }
fn default_repair_attempts() -> u32 { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            max_tags: default_max_tags(),
        }
    }
}

impl RankingSettings {
    /// Resolve the requested result count against the configured bounds
    pub fn effective_k(&self, requested: Option<u8>) -> usize {
        requested
            .map(usize::from)
            .unwrap_or(self.top_k)
            .min(self.max_top_k)
            .max(1)
    }
}

fn default_top_k() -> usize { DEFAULT_TOP_K }
fn default_max_top_k() -> usize { 10 }
fn default_max_tags() -> usize { 3 }

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

impl LoggingSettings {
    /// Parsed `format`; unknown values fall back to plain text
    pub fn log_format(&self) -> LogFormat {
        match self.format.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Text,
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Text,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VIBE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VIBE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("VIBE")
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
                Environment::with_prefix("VIBE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Build the facet schema, applying the weight table if one is configured.
    ///
    /// Any inconsistency is a startup fault.
    pub fn facet_schema(&self) -> Result<FacetSchema, SchemaError> {
        let schema = FacetSchema::new(self.facets.clone())?;

        match &self.weights {
            Some(table) => schema.reweighted(table),
            None => Ok(schema),
        }
    }
}

/// Fall back to the conventional OPENAI_API_KEY when no key is configured
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let has_key = settings
        .get_string("oracle.api_key")
        .map(|key| !key.is_empty())
        .unwrap_or(false);

    let mut builder = Config::builder().add_source(settings);

    if !has_key {
        if let Ok(api_key) = env::var("OPENAI_API_KEY") {
            builder = builder.set_override("oracle.api_key", api_key)?;
        }
    }

    builder.build()
}
