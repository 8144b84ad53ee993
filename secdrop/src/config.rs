//! Configuration for the `secdrop` binary

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SecDropError};
use crate::passphrase::{DEFAULT_PASSPHRASE_LENGTH, MAX_PASSPHRASE_LENGTH};

/// Config file name inside the per-user config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecDropConfig {
    /// Length of passphrases produced by `--generate` and `generate`
    pub passphrase_length: usize,

    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for SecDropConfig {
    fn default() -> Self {
        Self {
            passphrase_length: DEFAULT_PASSPHRASE_LENGTH,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl SecDropConfig {
    /// `<config dir>/secdrop/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("secdrop").join(CONFIG_FILE_NAME))
    }

    /// Loads and validates a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: SecDropConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// An explicit path must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.passphrase_length == 0 || self.passphrase_length > MAX_PASSPHRASE_LENGTH {
            return Err(SecDropError::Config(format!(
                "passphrase_length must be between 1 and {} (got {})",
                MAX_PASSPHRASE_LENGTH, self.passphrase_length
            )));
        }
        if self.log.level.trim().is_empty() {
            return Err(SecDropError::Config("log.level must not be empty".into()));
        }
        Ok(())
    }
}
