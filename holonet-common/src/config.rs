//! Configuration loading for the aggregator
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://swapi.py4e.com/api";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5730";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_BASE_URL: &str = "HOLONET_BASE_URL";
pub const ENV_BIND: &str = "HOLONET_BIND";
pub const ENV_TIMEOUT_SECS: &str = "HOLONET_TIMEOUT_SECS";
pub const ENV_REUSE_FIRST_PAGE: &str = "HOLONET_REUSE_FIRST_PAGE";
pub const ENV_LOG_LEVEL: &str = "HOLONET_LOG_LEVEL";
pub const ENV_CONFIG: &str = "HOLONET_CONFIG";

/// Resolved aggregator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    /// Remote API base, without trailing slash
    pub base_url: String,
    /// Listen address of the HTTP API
    pub bind_addr: String,
    /// Per-request timeout towards the remote source
    pub request_timeout_secs: u64,
    /// Merge the discovery page instead of refetching `?page=1`
    pub reuse_first_page: bool,
    /// Default tracing directive (RUST_LOG still wins)
    pub log_level: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            reuse_first_page: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Settings as they appear in `config.toml`; unknown keys are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub base_url: Option<String>,
    pub bind_addr: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub reuse_first_page: Option<bool>,
    pub log_level: Option<String>,
}

/// Command-line overrides (all optional)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub bind_addr: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub reuse_first_page: Option<bool>,
    pub log_level: Option<String>,
}

impl AggregatorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve configuration from CLI overrides, the process environment and
    /// the TOML file
    pub fn resolve(cli: &ConfigOverrides) -> Result<Self> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Same as [`AggregatorConfig::resolve`] with a custom environment lookup
    pub fn resolve_with<F>(cli: &ConfigOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = cli
            .config_path
            .clone()
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from))
            .or_else(default_config_path);

        let file = match config_path {
            Some(path) => load_toml_config(&path)?,
            None => TomlConfig::default(),
        };

        Self::from_layers(cli, env, file)
    }

    /// Merge the three layers over the compiled defaults and validate
    pub fn from_layers<F>(cli: &ConfigOverrides, env: F, file: TomlConfig) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| env(ENV_BASE_URL))
            .or(file.base_url)
            .unwrap_or(defaults.base_url);

        let bind_addr = cli
            .bind_addr
            .clone()
            .or_else(|| env(ENV_BIND))
            .or(file.bind_addr)
            .unwrap_or(defaults.bind_addr);

        let request_timeout_secs = match cli.request_timeout_secs {
            Some(secs) => secs,
            None => match env(ENV_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    Error::Config(format!("{} must be an integer, got {:?}", ENV_TIMEOUT_SECS, raw))
                })?,
                None => file
                    .request_timeout_secs
                    .unwrap_or(defaults.request_timeout_secs),
            },
        };

        let reuse_first_page = match cli.reuse_first_page {
            Some(flag) => flag,
            None => match env(ENV_REUSE_FIRST_PAGE) {
                Some(raw) => parse_bool(&raw).ok_or_else(|| {
                    Error::Config(format!("{} must be true or false, got {:?}", ENV_REUSE_FIRST_PAGE, raw))
                })?,
                None => file.reuse_first_page.unwrap_or(defaults.reuse_first_page),
            },
        };

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env(ENV_LOG_LEVEL))
            .or(file.log_level)
            .unwrap_or(defaults.log_level);

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bind_addr,
            request_timeout_secs,
            reuse_first_page,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Load a TOML config file
///
/// A missing file yields defaults with a warning; a malformed one is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file not found at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    debug!("Loaded config file {}", path.display());
    Ok(config)
}

/// Platform config file location (`<config_dir>/holonet/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("holonet").join("config.toml"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config =
            AggregatorConfig::from_layers(&ConfigOverrides::default(), no_env, TomlConfig::default())
                .unwrap();
        assert_eq!(config, AggregatorConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let cli = ConfigOverrides {
            base_url: Some("http://cli.test/api/".to_string()),
            ..Default::default()
        };
        let env = |key: &str| match key {
            ENV_BASE_URL => Some("http://env.test/api".to_string()),
            ENV_TIMEOUT_SECS => Some("3".to_string()),
            _ => None,
        };
        let file = TomlConfig {
            base_url: Some("http://file.test/api".to_string()),
            request_timeout_secs: Some(30),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };

        let config = AggregatorConfig::from_layers(&cli, env, file).unwrap();
        assert_eq!(config.base_url, "http://cli.test/api");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let file = TomlConfig {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        let err = AggregatorConfig::from_layers(&ConfigOverrides::default(), no_env, file).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let cli = ConfigOverrides {
            base_url: Some("ftp://example.test".to_string()),
            ..Default::default()
        };
        assert!(AggregatorConfig::from_layers(&cli, no_env, TomlConfig::default()).is_err());
    }

    #[test]
    fn test_bad_env_values_are_config_errors() {
        let env = |key: &str| (key == ENV_REUSE_FIRST_PAGE).then(|| "sometimes".to_string());
        let err = AggregatorConfig::from_layers(&ConfigOverrides::default(), env, TomlConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
