//! Configuration for the mortgage advisor
//!
//! Layers, lowest first: field defaults, an optional YAML file, then
//! environment variables named after the keys in upper case
//! (`OPENAI_API_KEY`, `DATABASE_URL`, `PORT`, ...).

use crate::infra::llm::OpenAiClientConfig;
use anyhow::{bail, Context};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "mortgage_advisor.yaml";

/// Keys accepted from the environment
const ENV_KEYS: &[&str] = &[
    "openai_api_key",
    "openai_base_url",
    "openai_model",
    "openai_temperature",
    "max_tokens",
    "llm_timeout_secs",
    "host",
    "port",
    "debug",
    "api_base_url",
    "app_name",
    "app_version",
    "log_level",
    "log_format",
    "database_url",
    "database_max_connections",
    "enable_rate_limiting",
    "max_requests_per_minute",
    "rate_limit_by_ip",
    "max_message_length",
    "abandon_after_minutes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Console,
}

/// Mortgage advisor configuration
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // ===== Language model =====
    /// Without a key the chat endpoint refuses requests
    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    // ===== Server =====
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub debug: bool,

    /// Where the chat client finds the API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    // ===== Logging =====
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    // ===== Storage =====
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    // ===== Limits =====
    #[serde(default = "default_true")]
    pub enable_rate_limiting: bool,

    #[serde(default = "default_max_requests_per_minute")]
    pub max_requests_per_minute: u32,

    #[serde(default = "default_true")]
    pub rate_limit_by_ip: bool,

    /// Maximum chat message length in characters
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Idle minutes before an in-progress conversation is abandoned; 0 disables
    #[serde(default)]
    pub abandon_after_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            openai_model: default_openai_model(),
            openai_temperature: default_openai_temperature(),
            max_tokens: default_max_tokens(),
            llm_timeout_secs: default_llm_timeout_secs(),
            host: default_host(),
            port: default_port(),
            debug: false,
            api_base_url: default_api_base_url(),
            app_name: default_app_name(),
            app_version: default_app_version(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            database_url: default_database_url(),
            database_max_connections: default_database_max_connections(),
            enable_rate_limiting: true,
            max_requests_per_minute: default_max_requests_per_minute(),
            rate_limit_by_ip: true,
            max_message_length: default_max_message_length(),
            abandon_after_minutes: 0,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("openai_temperature", &self.openai_temperature)
            .field("max_tokens", &self.max_tokens)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("debug", &self.debug)
            .field("api_base_url", &self.api_base_url)
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("enable_rate_limiting", &self.enable_rate_limiting)
            .field("max_requests_per_minute", &self.max_requests_per_minute)
            .field("rate_limit_by_ip", &self.rate_limit_by_ip)
            .field("max_message_length", &self.max_message_length)
            .field("abandon_after_minutes", &self.abandon_after_minutes)
            .finish()
    }
}

impl Config {
    /// Layered sources; `path` overrides the default config file
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Yaml::file(file))
            .merge(Env::raw().only(ENV_KEYS))
    }

    /// Load configuration; an explicitly given file must exist
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
        }
        Self::figment(path)
            .extract()
            .context("invalid configuration")
    }

    /// `debug` lowers the default `info` level to `debug`
    pub fn effective_log_level(&self) -> &str {
        if self.debug && self.log_level.eq_ignore_ascii_case("info") {
            "debug"
        } else {
            &self.log_level
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Model client settings, if an API key is configured
    pub fn openai_client_config(&self) -> Option<OpenAiClientConfig> {
        let api_key = self
            .openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())?;

        Some(OpenAiClientConfig {
            base_url: self.openai_base_url.clone(),
            api_key: api_key.to_string(),
            model: self.openai_model.clone(),
            temperature: self.openai_temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.llm_timeout_secs,
        })
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_llm_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_app_name() -> String {
    "AI Mortgage Advisor".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_url() -> String {
    "sqlite://mortgage_advisor.db?mode=rwc".to_string()
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_max_requests_per_minute() -> u32 {
    60
}

fn default_max_message_length() -> usize {
    2000
}
