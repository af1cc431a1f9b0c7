//! Configuration management for the `SafarAI` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. The resulting
//! [`SafarAiConfig`] is built once at startup and handed to the clients
//! that need it.

use crate::SafarAiError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the search provider (SerpAPI) key
pub const SEARCH_API_KEY_VAR: &str = "SERPAPI_API_KEY";
/// Older name for the search provider key, still honoured
pub const SEARCH_API_KEY_FALLBACK_VAR: &str = "SERPER_API_KEY";
/// Environment variable holding the language-model key
pub const LLM_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Root configuration structure for the `SafarAI` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SafarAiConfig {
    /// Travel search provider configuration
    pub search: SearchConfig,
    /// Language-model configuration
    pub llm: LlmConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Search provider (SerpAPI) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// SerpAPI key (required)
    pub api_key: Option<String>,
    /// Base URL for the search API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Retries for transient failures (0 disables retrying)
    pub max_retries: u32,
    /// Currency prices are quoted in
    pub currency: String,
    /// Result language (`hl`)
    pub language: String,
    /// Result country (`gl`)
    pub country: String,
    /// Accept searches for dates before today
    pub allow_past_dates: bool,
}

/// Language-model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key for the completion endpoint (required)
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Retries for transient failures (0 disables retrying)
    pub max_retries: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for handling a single request, model calls included
    pub request_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_search_base_url() -> String {
    "https://serpapi.com".to_string()
}

fn default_search_timeout() -> u32 {
    30
}

fn default_search_max_retries() -> u32 {
    2
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-5.1".to_string()
}

fn default_llm_timeout() -> u32 {
    120
}

fn default_llm_max_retries() -> u32 {
    1
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u32 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_search_base_url(),
            timeout_seconds: default_search_timeout(),
            max_retries: default_search_max_retries(),
            currency: default_currency(),
            language: default_language(),
            country: default_country(),
            allow_past_dates: false,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: None,
            timeout_seconds: default_llm_timeout(),
            max_retries: default_llm_max_retries(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SafarAiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // An explicitly given file must exist; the default location is optional
        match config_path {
            Some(path) => {
                builder = builder.add_source(
                    File::from(path.clone())
                        .required(true)
                        .format(config::FileFormat::Toml),
                );
            }
            None => {
                let default_path =
                    Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"));
                if default_path.exists() {
                    builder = builder.add_source(
                        File::from(default_path)
                            .required(false)
                            .format(config::FileFormat::Toml),
                    );
                }
            }
        }

        // Environment overrides, e.g. SAFARAI_LLM__MODEL=gpt-4o
        builder = builder.add_source(
            Environment::with_prefix("SAFARAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SafarAiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_credentials(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("safarai").join("config.toml"))
    }

    /// Fill API keys from the well-known credential variables.
    ///
    /// These take precedence over file and `SAFARAI_*` values.
    pub fn apply_credentials<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) =
            non_empty(SEARCH_API_KEY_VAR).or_else(|| non_empty(SEARCH_API_KEY_FALLBACK_VAR))
        {
            self.search.api_key = Some(key);
        }
        if let Some(key) = non_empty(LLM_API_KEY_VAR) {
            self.llm.api_key = Some(key);
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.search.base_url.is_empty() {
            self.search.base_url = default_search_base_url();
        }
        if self.search.timeout_seconds == 0 {
            self.search.timeout_seconds = default_search_timeout();
        }
        if self.search.currency.is_empty() {
            self.search.currency = default_currency();
        }
        if self.search.language.is_empty() {
            self.search.language = default_language();
        }
        if self.search.country.is_empty() {
            self.search.country = default_country();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_llm_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Both provider credentials are required; the service cannot start without them
    pub fn validate_api_keys(&self) -> Result<()> {
        check_api_key(self.search.api_key.as_deref(), "Search", SEARCH_API_KEY_VAR)?;
        check_api_key(self.llm.api_key.as_deref(), "Language model", LLM_API_KEY_VAR)?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.search.timeout_seconds > 600 {
            return Err(
                SafarAiError::config("Search API timeout cannot exceed 600 seconds").into(),
            );
        }

        if self.llm.timeout_seconds > 600 {
            return Err(
                SafarAiError::config("Language model timeout cannot exceed 600 seconds").into(),
            );
        }

        if self.search.max_retries > 10 || self.llm.max_retries > 10 {
            return Err(SafarAiError::config("Max retries cannot exceed 10").into());
        }

        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(SafarAiError::config(
                    "Language model temperature must be between 0.0 and 2.0",
                )
                .into());
            }
        }

        if self.server.port == 0 {
            return Err(SafarAiError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SafarAiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SafarAiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Search API", &self.search.base_url),
            ("Language model", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SafarAiError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

fn check_api_key(key: Option<&str>, service: &str, var: &str) -> Result<()> {
    match key {
        None => Err(SafarAiError::config(format!(
            "{service} API key is missing. Set the {var} environment variable."
        ))
        .into()),
        Some(key) if key.trim().is_empty() => Err(SafarAiError::config(format!(
            "{service} API key cannot be empty. Check the {var} environment variable."
        ))
        .into()),
        Some(key) if key.len() < 8 => Err(SafarAiError::config(format!(
            "{service} API key appears to be invalid (too short). Check the {var} environment variable."
        ))
        .into()),
        Some(_) => Ok(()),
    }
}
