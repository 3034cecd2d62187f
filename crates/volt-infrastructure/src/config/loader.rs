//! Configuration loader
//!
//! Layers, later overriding earlier:
//! 1. `AppConfig::default()`
//! 2. TOML file (explicit path, or the first `volt.toml` discovered)
//! 3. `VOLT_`-prefixed environment variables, `__` separating nested keys
//!    (`VOLT_LOGGING__LEVEL=debug`, `VOLT_HTTP_SERVICES__GITHUB__BASE_URL=...`)

use crate::config::AppConfig;
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use reqwest::Url;
use std::env;
use std::path::{Path, PathBuf};
use volt_domain::error::{Error, Result};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load configuration from all sources and validate it
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self
            .figment()
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&config)?;
        Ok(config)
    }

    /// The merged provider stack, before extraction
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(config_path) if config_path.exists() => {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            Some(config_path) => log_config_loaded(config_path, false),
            None => {
                if let Some(default_path) = Self::find_default_config_path() {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
            }
        }

        figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        )
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// First existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_lifecycle_config(config)?;
    validate_rate_limit_config(config)?;
    validate_http_services(config)?;
    validate_databases(config)?;
    Ok(())
}

fn validate_lifecycle_config(config: &AppConfig) -> Result<()> {
    if config.lifecycle.startup_timeout.is_zero() {
        return Err(Error::config("lifecycle.startup_timeout cannot be 0"));
    }
    if config.lifecycle.shutdown_timeout.is_zero() {
        return Err(Error::config("lifecycle.shutdown_timeout cannot be 0"));
    }
    Ok(())
}

fn validate_rate_limit_config(config: &AppConfig) -> Result<()> {
    if config.rate_limit.enabled && config.rate_limit.window.is_zero() {
        return Err(Error::config(
            "rate_limit.window cannot be 0 when rate limiting is enabled",
        ));
    }
    Ok(())
}

fn validate_http_services(config: &AppConfig) -> Result<()> {
    for (name, service) in &config.http_services {
        service
            .validate()
            .map_err(|e| Error::config(format!("http_services.{name}: {e}")))?;
        if let Some(base_url) = &service.base_url {
            Url::parse(base_url)
                .config_context(format!("http_services.{name}: invalid base_url {base_url:?}"))?;
        }
    }
    Ok(())
}

fn validate_databases(config: &AppConfig) -> Result<()> {
    for (name, database) in &config.databases {
        database
            .validate()
            .map_err(|e| Error::config(format!("databases.{name}: {e}")))?;
    }
    Ok(())
}
