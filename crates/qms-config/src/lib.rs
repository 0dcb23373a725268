//! # qms-config
//!
//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`QMS_*` prefix, `__` as separator)
//! 2. Project-level `.qms/config.toml`
//! 3. User-level `~/.config/qms/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `QMS_AUTOSAVE__DELAY_MS` -> `autosave.delay_ms` and
//! `QMS_GENERAL__DATA_DIR` -> `general.data_dir`.
//!
//! # Usage
//!
//! ```no_run
//! use qms_config::QmsConfig;
//!
//! let config = QmsConfig::load_with_dotenv().expect("config");
//! println!("debounce: {:?}", config.autosave.delay());
//! ```

mod autosave;
mod error;
mod general;

pub use autosave::AutoSaveConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QmsConfig {
    #[serde(default)]
    pub autosave: AutoSaveConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl QmsConfig {
    /// Load configuration relative to the current directory.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration treating `project_dir` as the project root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_from(project_dir: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_in(project_dir).extract()?;
        config.autosave.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the provider chain relative to the current directory.
    pub fn figment() -> Figment {
        Self::figment_in(Path::new("."))
    }

    /// Build the provider chain with `project_dir` as the project root.
    ///
    /// Public so tests can add providers on top.
    pub fn figment_in(project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = project_dir.join(".qms").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("QMS_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qms").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = QmsConfig::default();
        assert_eq!(config.autosave.delay_ms, 30_000);
        assert_eq!(config.autosave.idle_revert_ms, 2_000);
        assert_eq!(config.general.data_dir, ".qms");
    }

    #[test]
    fn serialized_defaults_roundtrip_through_figment() {
        let config: QmsConfig = Figment::from(Serialized::defaults(QmsConfig::default()))
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.autosave, AutoSaveConfig::default());
        assert_eq!(config.general, GeneralConfig::default());
    }
}
