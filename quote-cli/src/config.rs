//! Layered runtime configuration: built-in defaults, then an optional TOML
//! file, then `QUOTES_*` environment variables, then command-line flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use quote_core::db::DbConfig;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "quotes.toml";

pub const ENV_DB_BACKEND: &str = "QUOTES_DB_BACKEND";
pub const ENV_DB: &str = "QUOTES_DB";
pub const ENV_SESSION_DIR: &str = "QUOTES_SESSION_DIR";
pub const ENV_PRODUCTION: &str = "QUOTES_PRODUCTION";
pub const ENV_LOG_LEVEL: &str = "QUOTES_LOG_LEVEL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DbConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    /// Hide internal failure details from callers.
    pub production: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory holding the local session snapshot.
    pub dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
    pub session_dir: Option<PathBuf>,
    pub production: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },

    #[error("config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),

    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DbConfig::default(),
            session: SessionConfig { dir: PathBuf::from(".quotes") },
            logging: LoggingConfig { level: "info".to_string() },
            production: false,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// An explicit `config_path` must exist; otherwise `quotes.toml` in the
    /// working directory is used when present.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        Self::load_with_env(options, |key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with environment lookups routed through
    /// `lookup`.
    pub fn load_with_env(
        options: LoadOptions,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match options.config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::MissingConfigFile(path));
                }
                config.apply_patch(read_patch(&path)?);
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    config.apply_patch(read_patch(&default_path)?);
                }
            }
        }

        config.apply_env_overrides(|key| lookup(key).filter(|value| !value.trim().is_empty()))?;
        config.apply_overrides(options.overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(
        &mut self,
        patch: ConfigPatch,
    ) {
        if let Some(database) = patch.database {
            if let Some(backend) = database.backend {
                self.database.backend = backend;
            }
            if let Some(connection_string) = database.connection_string {
                self.database.connection_string = connection_string;
            }
        }

        if let Some(dir) = patch.session.and_then(|session| session.dir) {
            self.session.dir = dir;
        }

        if let Some(level) = patch.logging.and_then(|logging| logging.level) {
            self.logging.level = level;
        }

        if let Some(production) = patch.production {
            self.production = production;
        }
    }

    fn apply_env_overrides(
        &mut self,
        read_env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = read_env(ENV_DB_BACKEND) {
            self.database.backend = value;
        }
        if let Some(value) = read_env(ENV_DB) {
            self.database.connection_string = value;
        }
        if let Some(value) = read_env(ENV_SESSION_DIR) {
            self.session.dir = PathBuf::from(value);
        }
        if let Some(value) = read_env(ENV_PRODUCTION) {
            self.production = parse_bool(ENV_PRODUCTION, &value)?;
        }
        if let Some(value) = read_env(ENV_LOG_LEVEL) {
            self.logging.level = value;
        }
        Ok(())
    }

    fn apply_overrides(
        &mut self,
        overrides: ConfigOverrides,
    ) {
        if let Some(backend) = overrides.backend {
            self.database.backend = backend;
        }
        if let Some(connection_string) = overrides.connection_string {
            self.database.connection_string = connection_string;
        }
        if let Some(dir) = overrides.session_dir {
            self.session.dir = dir;
        }
        if let Some(production) = overrides.production {
            self.production = production;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.backend.trim().is_empty() {
            return Err(ConfigError::Validation("database.backend must not be empty".to_string()));
        }
        if self.database.backend != self.database.backend.to_ascii_lowercase() {
            return Err(ConfigError::Validation(format!(
                "database.backend `{}` must be lowercase",
                self.database.backend
            )));
        }
        if self.session.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("session.dir must not be empty".to_string()));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn parse_bool(
    key: &str,
    value: &str,
) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvOverride {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    session: Option<SessionPatch>,
    logging: Option<LoggingPatch>,
    production: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabasePatch {
    backend: Option<String>,
    connection_string: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionPatch {
    dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
}
