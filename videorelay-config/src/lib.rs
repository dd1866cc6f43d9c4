//! # videorelay Configuration
//!
//! Layered configuration for the event relay and its binaries.
//!
//! ## Layers (later wins)
//! 1. Built-in defaults
//! 2. `config/videorelay.yaml`
//! 3. `config/<VIDEORELAY_ENV>.yaml` (`VIDEORELAY_ENV` defaults to `production`)
//! 4. `VIDEORELAY_*` environment variables, `__` separating nested keys

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod queue;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use queue::QueueConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/videorelay.yaml";
const ENV_PREFIX: &str = "VIDEORELAY_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct RelayConfig {
    /// Pending-event queue behaviour.
    #[serde(default)]
    #[validate(nested)]
    pub queue: QueueConfig,

    /// Logging and metrics.
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl RelayConfig {
    /// Load configuration from the default files and the environment.
    ///
    /// Missing files are skipped; the result is validated before it is
    /// returned.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(RelayConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("VIDEORELAY_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific file, still honouring env overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(RelayConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
