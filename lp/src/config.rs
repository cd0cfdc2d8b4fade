//! learnpath configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::RetryPolicy;

/// Main learnpath configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Pipeline tuning
    pub generation: GenerationConfig,

    /// Where generated paths are saved
    pub storage: StorageConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required environment variables are set and that the call
    /// budget leaves room for every retry.
    /// Call this before any model call to fail fast with a clear error message.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        if self.generation.max_topics == 0 {
            return Err(eyre::eyre!("generation.max-topics must be at least 1"));
        }
        self.check_call_budget()
    }

    /// The per-call deadline must leave room for every retry the client may make
    ///
    /// Otherwise the outer deadline silently cuts the retry policy short.
    pub fn check_call_budget(&self) -> Result<()> {
        let attempt_timeout = Duration::from_millis(self.llm.timeout_ms);
        let needed = RetryPolicy::from_config(&self.llm).worst_case(attempt_timeout);
        let budget = Duration::from_millis(self.generation.call_timeout_ms);
        if budget < needed {
            return Err(eyre::eyre!(
                "generation.call-timeout-ms ({} ms) is shorter than the retry budget of {} ms \
                 (llm.timeout-ms x {} attempts plus backoff); raise it or lower llm.timeout-ms/max-retries",
                budget.as_millis(),
                needed.as_millis(),
                self.llm.max_retries.saturating_add(1)
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .learnpath.yml
        let local_config = PathBuf::from(".learnpath.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/learnpath/learnpath.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("learnpath").join("learnpath.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed here; the full `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".learnpath.yml")];
                if let Some(dir) = dirs::config_dir() {
                    paths.push(dir.join("learnpath").join("learnpath.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Upper bound on tokens per response; per-call limits are capped to this
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Deadline for one HTTP attempt, in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Retries for transient failures (429, 5xx, network)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// First retry delay; doubles on each attempt
    #[serde(rename = "initial-backoff-ms")]
    pub initial_backoff_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 30_000,
            max_retries: 3,
            initial_backoff_ms: 1000,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        let key = std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("Environment variable {} is not set", self.api_key_env))?;
        if key.trim().is_empty() {
            return Err(eyre::eyre!("Environment variable {} is empty", self.api_key_env));
        }
        Ok(key.trim().to_string())
    }
}

/// Pipeline tuning: token budgets, temperatures, timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Skeleton topics beyond this are dropped
    #[serde(rename = "max-topics")]
    pub max_topics: usize,

    /// Hard deadline for a single model call including its retries, in milliseconds
    #[serde(rename = "call-timeout-ms")]
    pub call_timeout_ms: u64,

    /// Parallel enrichment calls (1 = strictly sequential)
    pub concurrency: usize,

    #[serde(rename = "basic-max-tokens")]
    pub basic_max_tokens: u32,

    #[serde(rename = "basic-temperature")]
    pub basic_temperature: f32,

    #[serde(rename = "enrich-max-tokens")]
    pub enrich_max_tokens: u32,

    #[serde(rename = "enrich-temperature")]
    pub enrich_temperature: f32,

    #[serde(rename = "repair-max-tokens")]
    pub repair_max_tokens: u32,

    /// Directory of `.pmt` overrides for the embedded prompts
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_topics: 4,
            call_timeout_ms: 240_000,
            concurrency: 1,
            basic_max_tokens: 1000,
            basic_temperature: 0.3,
            enrich_max_tokens: 1500,
            enrich_temperature: 0.3,
            repair_max_tokens: 2000,
            prompts_dir: None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the path store
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,

    /// User id recorded when `--user` is not given
    #[serde(rename = "default-user")]
    pub default_user: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_dir: pathstore::config::default_store_path(),
            default_user: pathstore::ANONYMOUS_USER.to_string(),
        }
    }
}
