use config::{Config, ConfigError, Environment, File, Source};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Master switch for writes. Reads are always allowed.
    pub enabled: bool,
    /// Root under which `history/<kind>/<date>.json` is created
    pub storage_path: PathBuf,
    pub on_corrupt: CorruptPolicy,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            storage_path: PathBuf::from("./data"),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

/// What to do when an existing partition file cannot be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Treat the partition as empty and rewrite it. Previous records are lost.
    #[default]
    Overwrite,
    /// Rename the unreadable file aside, then start a fresh partition.
    Quarantine,
    /// Leave the file alone and drop the new record.
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load `config/<CONFIG_ENV>` (optional) and `APP__*` environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        Self::build(File::with_name(&format!("config/{}", config_env)).required(false))
    }

    /// Load an explicit configuration file; it must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::build(File::from(path.as_ref()).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
