//! # godo-config
//!
//! Layered configuration loading for godo using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GODO_*` prefix, `__` as separator)
//! 2. Project-level `.godo/config.toml`
//! 3. User-level `~/.config/godo/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GODO_GOOGLE__CLIENT_ID` -> `google.client_id`,
//! `GODO_SYNC__INTERVAL_SECS` -> `sync.interval_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use godo_config::GodoConfig;
//!
//! let config = GodoConfig::load_with_dotenv().expect("config");
//! if config.general.use_google && config.google.is_configured() {
//!     println!("syncing every {:?}", config.sync.interval());
//! }
//! ```

mod error;
mod general;
mod google;
mod storage;
mod sync;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use google::GoogleConfig;
pub use storage::{StorageConfig, expand_path};
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GodoConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl GodoConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".godo/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("GODO_").split("__"))
    }

    /// Check cross-section requirements for the selected mode.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when Google mode is selected
    /// without an OAuth client id or secret, and `ConfigError::InvalidValue`
    /// for an empty storage directory or cache file name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("storage.data_dir", &self.storage.data_dir),
            ("storage.cache_file", &self.storage.cache_file),
            ("storage.tasks_file", &self.storage.tasks_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: "must not be empty".into(),
                });
            }
        }

        if self.general.use_google {
            if self.google.client_id.is_empty() {
                return Err(ConfigError::MissingCredential {
                    field: "client_id",
                    env: "CLIENT_ID",
                });
            }
            if self.google.client_secret.is_empty() {
                return Err(ConfigError::MissingCredential {
                    field: "client_secret",
                    env: "CLIENT_SECRET",
                });
            }
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("godo").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = GodoConfig::default();
        assert!(!config.general.use_google);
        assert!(!config.google.is_configured());
        assert_eq!(config.sync.interval_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn google_mode_requires_credentials() {
        let mut config = GodoConfig::default();
        config.general.use_google = true;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential { field: "client_id", .. })
        ));

        config.google.client_id = "id".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential { field: "client_secret", .. })
        ));

        config.google.client_secret = "secret".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_data_dir_is_invalid() {
        let mut config = GodoConfig::default();
        config.storage.data_dir = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
