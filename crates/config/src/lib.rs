//! Configuration loading and validation for Deskline.
//!
//! Loads configuration from a TOML file (default `deskline.toml` in the
//! working directory) with environment variable overrides. Validates all
//! settings at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
///
/// Maps directly to `deskline.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Orchestration settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Ticket store settings
    #[serde(default)]
    pub tickets: TicketsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            gateway: GatewayConfig::default(),
            assistant: AssistantConfig::default(),
            tickets: TicketsConfig::default(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("gateway", &self.gateway)
            .field("assistant", &self.assistant)
            .field("tickets", &self.tickets)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key (override with DESKLINE_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin for the browser frontend
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8081
}
fn default_cors_origin() -> String {
    "http://localhost:5173".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Upper bound on tool round-trips per request, so a looping model
    /// cannot wedge a request indefinitely.
    #[serde(default = "default_max_tool_round_trips")]
    pub max_tool_round_trips: u32,

    /// Path to the system prompt text file. When unset, a compiled-in
    /// default prompt is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_path: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            max_tool_round_trips: default_max_tool_round_trips(),
            system_prompt_path: None,
        }
    }
}

fn default_max_tool_round_trips() -> u32 {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketsConfig {
    /// "memory" or "sqlite"
    #[serde(default = "default_ticket_backend")]
    pub backend: String,

    /// SQLite database path (sqlite backend only)
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

impl Default for TicketsConfig {
    fn default() -> Self {
        Self {
            backend: default_ticket_backend(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

fn default_ticket_backend() -> String {
    "sqlite".into()
}
fn default_sqlite_path() -> String {
    "deskline-tickets.db".into()
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply env overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from the given path if it exists, otherwise fall back to
    /// defaults (still applying env overrides and validation).
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Environment variables take precedence over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("DESKLINE_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("DESKLINE_API_URL") {
            self.provider.api_url = url;
        }
        if let Ok(model) = std::env::var("DESKLINE_MODEL") {
            self.provider.model = model;
        }
        if let Ok(port) = std::env::var("DESKLINE_PORT")
            && let Ok(port) = port.parse()
        {
            self.gateway.port = port;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::Invalid(format!(
                "provider.temperature must be in [0.0, 2.0], got {}",
                self.provider.temperature
            )));
        }
        if self.assistant.max_tool_round_trips == 0 {
            return Err(ConfigError::Invalid(
                "assistant.max_tool_round_trips must be at least 1".into(),
            ));
        }
        match self.tickets.backend.as_str() {
            "memory" | "sqlite" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "tickets.backend must be \"memory\" or \"sqlite\", got \"{other}\""
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 8081);
        assert_eq!(config.assistant.max_tool_round_trips, 8);
        assert_eq!(config.tickets.backend, "sqlite");
    }

    #[test]
    fn parses_partial_toml() {
        let toml = r#"
            [provider]
            model = "gpt-4o"

            [gateway]
            port = 9000

            [tickets]
            backend = "memory"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.tickets.backend, "memory");
        // Unspecified sections fall back to defaults
        assert_eq!(config.assistant.max_tool_round_trips, 8);
    }

    #[test]
    fn rejects_zero_round_trips() {
        let toml = r#"
            [assistant]
            max_tool_round_trips = 0
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_ticket_backend() {
        let toml = r#"
            [tickets]
            backend = "oracle"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let mut config = AppConfig::default();
        config.provider.api_key = Some("sk-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nport = 8181").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.gateway.port, 8181);
    }

    #[test]
    fn load_or_default_without_file() {
        let config = AppConfig::load_or_default(Path::new("/nonexistent/deskline.toml")).unwrap();
        assert_eq!(config.gateway.host, "127.0.0.1");
    }
}
