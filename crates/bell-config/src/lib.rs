//! # bell-config
//!
//! Layered configuration loading for SchoolBell using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`BELL_*` prefix, `__` as separator)
//! 2. Project-level `.bell/config.toml`
//! 3. User-level `~/.config/bell/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `BELL_GENERAL__TIMEZONE` -> `general.timezone`,
//! `BELL_RELATIONSHIPS__ALLOW_NESTED_GROUPS` -> `relationships.allow_nested_groups`.
//!
//! # Usage
//!
//! ```no_run
//! use bell_config::BellConfig;
//!
//! let config = BellConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("observer timezone: {}", config.general.timezone);
//! ```

mod error;
mod general;
mod relationships;
mod timetable;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use relationships::RelationshipConfig;
pub use timetable::TimetableConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BellConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub relationships: RelationshipConfig,
    #[serde(default)]
    pub timetable: TimetableConfig,
}

impl BellConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration from an explicit TOML file layered over the
    /// defaults, with environment variables still taking precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if the file cannot be parsed.
    pub fn load_from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.into()))
            .merge(Env::prefixed("BELL_").split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".bell/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("BELL_").split("__"))
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unknown timezone or an
    /// empty weekly day list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general
            .tz()
            .map_err(|name| ConfigError::InvalidValue {
                field: "general.timezone".to_string(),
                reason: format!("unknown timezone '{name}'"),
            })?;

        if self.timetable.weekly_day_ids.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "timetable.weekly_day_ids".to_string(),
                reason: "at least one day id is required".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bell").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing
    /// if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
