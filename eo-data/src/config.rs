use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_REGISTRY_URL: &str = "https://www.federalregister.gov/api/v1";
pub const DEFAULT_START_DATE: &str = "2025-01-20";
pub const DEFAULT_CACHE_DIR: &str = "executive_orders";
pub const DEFAULT_HTTP_PORT: u16 = 5000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "deepseek-r1-distill-llama-70b";
/// Conservative ceiling that keeps requests under the provider's 6000 TPM limit.
pub const DEFAULT_LLM_MAX_TOKENS: usize = 5500;

/// Resolved configuration shared by eo-fetch and eo-web.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub cache_dir: PathBuf,
    pub registry_url: String,
    pub start_date: String,
    pub http_port: u16,
    pub http_timeout_secs: u64,
    pub llm: LlmConfig,
}

/// Language model settings for the summarizer.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: usize,
}

#[derive(Debug, Deserialize, Default, Clone)]
struct LlmSection {
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<usize>,
}

/// Raw TOML file structure for `~/.config/eo-tracker/config.toml`.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    cache_dir: Option<PathBuf>,
    registry_url: Option<String>,
    start_date: Option<String>,
    http_port: Option<u16>,
    http_timeout_secs: Option<u64>,
    #[serde(default)]
    llm: LlmSection,
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("eo-tracker").join("config.toml"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            start_date: DEFAULT_START_DATE.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            llm: LlmConfig {
                endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
                api_key: None,
                model: DEFAULT_LLM_MODEL.to_string(),
                max_tokens: DEFAULT_LLM_MAX_TOKENS,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Priority: environment variables override file values, which override
    /// defaults. A missing config file is not an error.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let path = config_path.cloned().or_else(default_config_path);

        let file_config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?;
                toml::from_str::<ConfigFile>(&content)
                    .with_context(|| format!("failed to parse config: {}", path.display()))?
            }
            _ => ConfigFile::default(),
        };

        Self::from_file_and_env(file_config, |key| std::env::var(key).ok())
    }

    /// Merge parsed file values with an environment lookup.
    fn from_file_and_env(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let cache_dir = env("EO_CACHE_DIR")
            .map(PathBuf::from)
            .or(file.cache_dir)
            .unwrap_or(defaults.cache_dir);
        let registry_url = env("EO_REGISTRY_URL")
            .or(file.registry_url)
            .unwrap_or(defaults.registry_url);
        let start_date = env("EO_START_DATE")
            .or(file.start_date)
            .unwrap_or(defaults.start_date);
        let http_port = parse_env(&env, "EO_HTTP_PORT")?
            .or(file.http_port)
            .unwrap_or(defaults.http_port);
        let http_timeout_secs = parse_env(&env, "EO_HTTP_TIMEOUT_SECS")?
            .or(file.http_timeout_secs)
            .unwrap_or(defaults.http_timeout_secs);

        let llm = LlmConfig {
            endpoint: env("EO_LLM_ENDPOINT")
                .or(file.llm.endpoint)
                .unwrap_or(defaults.llm.endpoint),
            api_key: env("GROQ_API_KEY")
                .or(file.llm.api_key)
                .filter(|key| !key.is_empty()),
            model: env("EO_LLM_MODEL")
                .or(file.llm.model)
                .unwrap_or(defaults.llm.model),
            max_tokens: parse_env(&env, "EO_LLM_MAX_TOKENS")?
                .or(file.llm.max_tokens)
                .unwrap_or(defaults.llm.max_tokens),
        };

        let config = Self {
            cache_dir,
            registry_url: registry_url.trim_end_matches('/').to_string(),
            start_date,
            http_port,
            http_timeout_secs,
            llm,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.registry_url.is_empty() {
            bail!("registry_url must not be empty (set in config file or EO_REGISTRY_URL env var)");
        }
        if self.http_timeout_secs == 0 {
            bail!("http_timeout_secs must be greater than zero");
        }
        if self.llm.max_tokens == 0 {
            bail!("llm.max_tokens must be greater than zero");
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_env<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("invalid value for {}: '{}'", key, raw)),
        None => Ok(None),
    }
}
