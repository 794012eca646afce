use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::{MatchThresholds, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_embedding_endpoint(),
            api_key: String::new(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

fn default_embedding_endpoint() -> String { "https://api.openai.com/v1".to_string() }
fn default_embedding_model() -> String { "text-embedding-ada-002".to_string() }
fn default_embedding_dimension() -> usize { 1536 }
fn default_embedding_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// L2 tier is disabled when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_similarity")]
    pub default_min_similarity: f64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_min_similarity: default_min_similarity(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            parallel: default_parallel(),
        }
    }
}

fn default_min_similarity() -> f64 { 0.6 }
fn default_limit() -> usize { 5 }
fn default_max_limit() -> usize { 100 }
fn default_parallel() -> bool { true }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_weight")]
    pub profile: f64,
    #[serde(default = "default_weight")]
    pub work: f64,
    #[serde(default = "default_weight")]
    pub interest: f64,
    #[serde(default = "default_weight")]
    pub impact: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            profile: default_weight(),
            work: default_weight(),
            interest: default_weight(),
            impact: default_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            profile: config.profile,
            work: config.work,
            interest: config.interest,
            impact: config.impact,
        }
    }
}

fn default_weight() -> f64 { 1.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_impact_ratio")]
    pub impact_ratio: f64,
    #[serde(default = "default_work_reason")]
    pub work_reason: f64,
    #[serde(default = "default_relevant_works")]
    pub relevant_works: usize,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            impact_ratio: default_impact_ratio(),
            work_reason: default_work_reason(),
            relevant_works: default_relevant_works(),
        }
    }
}

impl From<&ThresholdsConfig> for MatchThresholds {
    fn from(config: &ThresholdsConfig) -> Self {
        Self {
            impact_ratio: config.impact_ratio,
            work_reason: config.work_reason,
            relevant_works: config.relevant_works,
        }
    }
}

fn default_impact_ratio() -> f64 { 0.8 }
fn default_work_reason() -> f64 { 0.7 }
fn default_relevant_works() -> usize { 3 }

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
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCHOLAR__)
    /// 5. DATABASE_URL, REDIS_URL, OPENAI_API_KEY, LOG_LEVEL and LOG_FORMAT
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCHOLAR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SCHOLAR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings, |name| std::env::var(name).ok())?;
        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Scoring weights as used by the matcher
    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    /// Materiality thresholds as used by the matcher
    pub fn match_thresholds(&self) -> MatchThresholds {
        MatchThresholds::from(&self.scoring.thresholds)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.scoring_weights().validate().map_err(ConfigError::Message)?;
        self.match_thresholds().validate().map_err(ConfigError::Message)?;

        let range = 0.0..=1.0;
        if !range.contains(&self.matching.default_min_similarity) {
            return Err(ConfigError::Message(
                "matching.default_min_similarity must be within [0, 1]".to_string(),
            ));
        }
        if self.matching.default_limit == 0 || self.matching.max_limit == 0 {
            return Err(ConfigError::Message(
                "matching limits must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

const WELL_KNOWN_ENV: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis_url"),
    ("OPENAI_API_KEY", "embedding.api_key"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

/// Apply the conventional environment variables on top of the layered config
fn apply_well_known_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in WELL_KNOWN_ENV {
        if let Some(value) = lookup(var) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.profile, 1.0);
        assert_eq!(weights.work, 1.0);
        assert_eq!(weights.interest, 1.0);
        assert_eq!(weights.impact, 1.0);
    }

    #[test]
    fn test_default_thresholds_match_model_defaults() {
        let thresholds = MatchThresholds::from(&ThresholdsConfig::default());
        assert_eq!(thresholds, MatchThresholds::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_minimal_config_deserializes() {
        let settings: Settings = Config::builder()
            .set_override("database.url", "postgres://localhost/test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.matching.default_limit, 5);
        assert_eq!(settings.matching.default_min_similarity, 0.6);
        assert!(settings.cache.redis_url.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let settings: Settings = Config::builder()
            .set_override("database.url", "postgres://localhost/test")
            .unwrap()
            .set_override("scoring.weights.impact", -1.0)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_out_of_range_thresholds_rejected() {
        let settings: Settings = Config::builder()
            .set_override("database.url", "postgres://localhost/test")
            .unwrap()
            .set_override("scoring.thresholds.work_reason", 1.2)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.validate().is_err());

        let settings: Settings = Config::builder()
            .set_override("database.url", "postgres://localhost/test")
            .unwrap()
            .set_override("scoring.thresholds.impact_ratio", -0.5)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_log_env_vars_override_logging_section() {
        let layered = Config::builder()
            .set_override("database.url", "postgres://localhost/test")
            .unwrap()
            .set_override("logging.level", "warn")
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap();

        let settings: Settings = apply_well_known_env(layered, |name| match name {
            "LOG_FORMAT" => Some("pretty".to_string()),
            _ => None,
        })
        .unwrap()
        .try_deserialize()
        .unwrap();

        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.logging.format, "pretty");
        assert_eq!(settings.database.url, "postgres://localhost/test");
    }
}
