//! # plumb-config
//!
//! Layered configuration loading for Plumbing Forensics using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PLUMB_*` prefix, `__` as separator)
//! 2. `OPENAI_API_KEY`, mapped onto `openai.api_key`
//! 3. Project-level `.plumb/config.toml`
//! 4. User-level `~/.config/plumb/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PLUMB_OPENAI__API_KEY` -> `openai.api_key`,
//! `PLUMB_WIZARD__INTERVIEW` -> `wizard.interview`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use plumb_config::PlumbConfig;
//!
//! let config = PlumbConfig::load_with_dotenv().expect("config");
//! if !config.openai.is_configured() {
//!     eprintln!("no API key configured");
//! }
//! ```

mod error;
mod openai;
mod wizard;

pub use error::ConfigError;
pub use openai::OpenAiConfig;
pub use wizard::WizardConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unprefixed variable accepted as a fallback credential source.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlumbConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
}

impl PlumbConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or the wizard year bounds
    /// are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading `.env` from the current directory
    /// (or the workspace root in tests).
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.wizard.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
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
        let local_path = PathBuf::from(".plumb/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Conventional credential variable
        figment = figment.merge(
            Env::raw()
                .only(&[OPENAI_API_KEY_VAR])
                .map(|_| "openai.api_key".into()),
        );

        // Layer 4: Prefixed environment variables (highest priority)
        figment.merge(Env::prefixed("PLUMB_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("plumb").join("config.toml"))
    }

    /// Load `.env`, walking up from `CARGO_MANIFEST_DIR` when set, otherwise
    /// from the current directory. Silently does nothing if none is found.
    fn load_dotenv() {
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
