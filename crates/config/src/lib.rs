//! Configuration loading, validation, and management for Lu-Gang Connect.
//!
//! Loads configuration from `~/.lugang/config.toml` (or `$LUGANG_CONFIG`)
//! with environment variable overrides. Validates all settings at startup.

use lugang_core::ProviderKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.lugang/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Temperature sent with every upstream request
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per upstream response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Upstream provider configurations
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Knowledge base source
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    500
}
fn default_timeout_secs() -> u64 {
    30
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("gateway", &self.gateway)
            .field("providers", &self.providers)
            .field("knowledge", &self.knowledge)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// CORS origins; `"*"` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec!["*".into()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL; `/chat/completions` is appended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub deepseek: ProviderConfig,

    #[serde(default)]
    pub qwen: ProviderConfig,
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Deepseek => &self.deepseek,
            ProviderKind::Qwen => &self.qwen,
        }
    }

    fn get_mut(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        match kind {
            ProviderKind::Deepseek => &mut self.deepseek,
            ProviderKind::Qwen => &mut self.qwen,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// TOML knowledge file replacing the built-in table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl AppConfig {
    /// Load configuration from `$LUGANG_CONFIG` or `~/.lugang/config.toml`.
    ///
    /// Environment overrides (highest priority):
    /// - `DEEPSEEK_API_KEY`, `QWEN_API_KEY`
    /// - `LUGANG_HOST`, `LUGANG_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for kind in ProviderKind::ALL {
            let var = api_key_env_var(kind);
            if let Some(key) = lookup(var).filter(|k| !k.is_empty()) {
                self.set_api_key(kind, key);
            }
        }

        if let Some(host) = lookup("LUGANG_HOST") {
            self.gateway.host = host;
        }

        if let Some(port) = lookup("LUGANG_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("LUGANG_PORT is not a valid port: {port}"))
            })?;
        }

        Ok(())
    }

    /// Path of the active config file.
    pub fn config_path() -> PathBuf {
        std::env::var("LUGANG_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_dir().join("config.toml"))
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lugang")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.default_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "default_max_tokens must be > 0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    pub fn set_api_key(&mut self, kind: ProviderKind, key: impl Into<String>) {
        self.providers.get_mut(kind).api_key = Some(key.into());
    }

    /// Whether a non-empty API key is set for `kind`.
    pub fn has_api_key(&self, kind: ProviderKind) -> bool {
        self.providers
            .get(kind)
            .api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Model name used for `kind`, honoring overrides.
    pub fn model_for(&self, kind: ProviderKind) -> String {
        self.providers
            .get(kind)
            .model
            .clone()
            .unwrap_or_else(|| kind.default_model().to_string())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            request_timeout_secs: default_timeout_secs(),
            gateway: GatewayConfig::default(),
            providers: ProvidersConfig::default(),
            knowledge: KnowledgeConfig::default(),
        }
    }
}

/// Environment variable holding the API key for `kind`.
pub fn api_key_env_var(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Deepseek => "DEEPSEEK_API_KEY",
        ProviderKind::Qwen => "QWEN_API_KEY",
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_max_tokens, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.request_timeout_secs, config.request_timeout_secs);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        let config = result.unwrap();
        assert_eq!(config.gateway.port, 8000);
        assert!(!config.has_api_key(ProviderKind::Deepseek));
    }

    #[test]
    fn load_from_file_with_provider_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
request_timeout_secs = 10

[gateway]
port = 9000

[providers.qwen]
api_key = "sk-qwen"
model = "qwen-plus"

[knowledge]
path = "/etc/lugang/knowledge.toml"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.gateway.port, 9000);
        assert!(config.has_api_key(ProviderKind::Qwen));
        assert!(!config.has_api_key(ProviderKind::Deepseek));
        assert_eq!(config.model_for(ProviderKind::Qwen), "qwen-plus");
        assert_eq!(config.model_for(ProviderKind::Deepseek), "deepseek-chat");
        assert_eq!(config.knowledge.path.as_deref(), Some("/etc/lugang/knowledge.toml"));
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "gateway = 5").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(env(&[
                ("DEEPSEEK_API_KEY", "sk-deep"),
                ("LUGANG_HOST", "127.0.0.1"),
                ("LUGANG_PORT", "8123"),
            ]))
            .unwrap();
        assert!(config.has_api_key(ProviderKind::Deepseek));
        assert!(!config.has_api_key(ProviderKind::Qwen));
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.gateway.port, 8123);
    }

    #[test]
    fn empty_env_key_is_ignored() {
        let mut config = AppConfig::default();
        config.providers.qwen.api_key = Some("from-file".into());
        config
            .apply_env_overrides(env(&[("QWEN_API_KEY", "")]))
            .unwrap();
        assert_eq!(config.providers.qwen.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn bad_port_env_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides(env(&[("LUGANG_PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let mut config = AppConfig::default();
        config.providers.deepseek.api_key = Some("sk-secret-value".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("8000"));
        assert!(toml_str.contains("request_timeout_secs"));
    }
}
