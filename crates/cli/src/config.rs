//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// `http` or `stub`
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub primary_url: String,

    #[serde(default)]
    pub backup_url: Option<String>,

    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_timeout_step_ms")]
    pub timeout_step_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: Vec<u64>,

    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub indexnow_enabled: bool,

    #[serde(default = "default_indexnow_key_env")]
    pub indexnow_key_env: String,

    #[serde(default = "default_indexnow_endpoint")]
    pub indexnow_endpoint: String,

    #[serde(default)]
    pub indexnow_key_location: Option<String>,

    #[serde(default)]
    pub indexing_webhook_url: Option<String>,

    #[serde(default = "default_future_pages")]
    pub future_pages: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "http".to_string()
}

fn default_token_env() -> String {
    "LOTERIAS_API_TOKEN".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_timeout_step_ms() -> u64 {
    250
}

fn default_max_attempts() -> u32 {
    2
}

fn default_backoff_ms() -> Vec<u64> {
    vec![200, 750, 1500]
}

fn default_cache_ttl_ms() -> u64 {
    60_000
}

fn default_base_url() -> String {
    "https://loterias.example.com".to_string()
}

fn default_indexnow_key_env() -> String {
    "INDEXNOW_KEY".to_string()
}

fn default_indexnow_endpoint() -> String {
    loterias_adapters::indexing::INDEXNOW_ENDPOINT.to_string()
}

fn default_future_pages() -> u32 {
    3
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            primary_url: String::new(),
            backup_url: None,
            token_env: default_token_env(),
            timeout_ms: default_timeout_ms(),
            timeout_step_ms: default_timeout_step_ms(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            indexnow_enabled: false,
            indexnow_key_env: default_indexnow_key_env(),
            indexnow_endpoint: default_indexnow_endpoint(),
            indexnow_key_location: None,
            indexing_webhook_url: None,
            future_pages: default_future_pages(),
        }
    }
}

impl ApiConfig {
    /// Configured hosts in failover order; blank entries are dropped
    pub fn hosts(&self) -> Vec<String> {
        std::iter::once(self.primary_url.as_str())
            .chain(self.backup_url.as_deref())
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn retry_policy(&self) -> loterias_adapters::RetryPolicy {
        loterias_adapters::RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            timeout: Duration::from_millis(self.timeout_ms),
            timeout_step: Duration::from_millis(self.timeout_step_ms),
            backoff: self
                .backoff_ms
                .iter()
                .copied()
                .map(Duration::from_millis)
                .collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // LOTERIAS__API__PRIMARY_URL etc.
        builder = builder.add_source(
            config::Environment::with_prefix("LOTERIAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# loterias configuration

[general]
log_level = "info"

[api]
provider = "http"  # http, stub
primary_url = "https://api.example.com/v1"
# backup_url = "https://backup.example.com/v1"
token_env = "LOTERIAS_API_TOKEN"
timeout_ms = 5000
# added to the timeout on every retry
timeout_step_ms = 250
max_attempts = 2
backoff_ms = [200, 750, 1500]
# 0 disables the response cache
cache_ttl_ms = 60000

[site]
base_url = "https://loterias.example.com"
indexnow_enabled = false
indexnow_key_env = "INDEXNOW_KEY"
indexnow_endpoint = "https://api.indexnow.org/indexnow"
# indexnow_key_location = "https://loterias.example.com/indexnow-key.txt"
# indexing_webhook_url = "https://loterias.example.com/api/indexing"
future_pages = 3
"#
        .to_string()
    }
}
