use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::services::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub llm: LlmSettings,
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

/// Where candidate organisations come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectorySource {
    #[default]
    Seed,
    Appwrite,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySettings {
    #[serde(default)]
    pub source: DirectorySource,
    /// Seed file overriding the built-in organisation set
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    #[serde(default = "default_organisation_collection")]
    pub organisation_profiles: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_organisation_collection() -> String { "organisation_profiles".to_string() }
fn default_page_size() -> u32 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// Language-model ranking is skipped when unset
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_llm_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_llm_model() -> String { DEFAULT_MODEL.to_string() }
fn default_temperature() -> f32 { 0.1 }
fn default_llm_timeout() -> u64 { 15 }

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with EWASTE__)
    /// 5. Well-known credential variables (OPENAI_API_KEY, APPWRITE_API_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., EWASTE__LLM__MODEL -> llm.model
            .add_source(
                Environment::with_prefix("EWASTE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_credential_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path (set via EWASTE_CONFIG)
    ///
    /// Same layering as [`Settings::load`] with the given file in place of
    /// the `config/` directory.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("EWASTE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_credential_env(settings)?;

        settings.try_deserialize()
    }
}

/// Pick up API keys from their conventional variable names
fn apply_credential_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let openai_key = env::var("OPENAI_API_KEY").ok();
    let appwrite_key = env::var("APPWRITE_API_KEY").ok();

    apply_credentials(settings, openai_key, appwrite_key)
}

fn apply_credentials(
    settings: Config,
    openai_key: Option<String>,
    appwrite_key: Option<String>,
) -> Result<Config, ConfigError> {
    let openai_key = openai_key.filter(|k| !k.is_empty());
    let appwrite_key = appwrite_key.filter(|k| !k.is_empty());
    let has_appwrite = settings.get_table("appwrite").is_ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = openai_key {
        builder = builder.set_override("llm.api_key", key)?;
    }
    if let Some(key) = appwrite_key {
        if has_appwrite {
            builder = builder.set_override("appwrite.api_key", key)?;
        }
    }

    builder.build()
}
