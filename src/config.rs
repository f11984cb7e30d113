//! Config file loading and creation.
//!
//! Config lives at ./scoreboard.toml unless --config says otherwise.
//! All fields are optional; CLI flags override config values.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;
use crate::gate::AdminGate;

pub const DEFAULT_CONFIG_PATH: &str = "scoreboard.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScoreboardConfig {
    pub store_path: PathBuf,
    pub admin_passphrase: Option<String>,
    pub watch_interval_ms: u64,
    pub logging: LoggingConfig,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("matches.json"),
            admin_passphrase: None,
            watch_interval_ms: 1000,
            logging: LoggingConfig::default(),
        }
    }
}

impl ScoreboardConfig {
    /// Load config from a file path. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(ConfigError::ReadFile(e)),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "watch_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store_path",
                reason: "must not be empty".into(),
            });
        }
        if self.admin_passphrase.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue {
                field: "admin_passphrase",
                reason: "remove the key to disable the gate instead of setting it empty".into(),
            });
        }
        Ok(())
    }

    pub fn gate(&self) -> AdminGate {
        match &self.admin_passphrase {
            Some(p) => AdminGate::with_passphrase(p.clone()),
            None => AdminGate::disabled(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
    /// Logs go to stderr so table output stays clean on stdout.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init();
            }
            _ => {
                fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# scoreboard configuration
# All values here can be overridden by CLI flags.

# JSON file holding the match documents
store_path = \"matches.json\"

# Passphrase asked for before adding or deleting a match.
# This only guards against accidental edits; it is not access control.
# Leave unset to skip the prompt.
# admin_passphrase = \"change-me\"

# How often `scoreboard watch` checks the store file for changes
watch_interval_ms = 1000

[logging]
# RUST_LOG overrides this
level = \"warn\"
# \"pretty\" or \"json\"
format = \"pretty\"
";

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.display().to_string()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteFile)?;
        }
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(ConfigError::WriteFile)
}
