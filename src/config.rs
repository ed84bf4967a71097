//! Layered collector settings
//!
//! Settings resolve in this order, later layers winning:
//! built-in defaults, an optional settings file, `DSNAP_*` environment
//! variables, then explicit overrides from the command line.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::attributes::DEFAULT_FALLBACK;
use crate::collectors::aggregate::errors::ConfigurationError;
use crate::collectors::aggregate::validation::validate_timeouts;

/// Prefix of environment variables read as settings
pub const ENV_PREFIX: &str = "DSNAP";

const DEFAULT_PER_SOURCE_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_OVERALL_TIMEOUT_MS: u64 = 5_000;

/// Settings that control a collection run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Allowance for each individual source, in milliseconds
    pub per_source_timeout_ms: u64,
    /// Allowance for the whole run, in milliseconds
    pub overall_timeout_ms: u64,
    /// Text shown for absent, failed or timed-out attributes
    pub fallback_text: String,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            per_source_timeout_ms: DEFAULT_PER_SOURCE_TIMEOUT_MS,
            overall_timeout_ms: DEFAULT_OVERALL_TIMEOUT_MS,
            fallback_text: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl CollectorSettings {
    /// Loads settings from defaults, an optional file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        Self::load_with_env(path, None)
    }

    /// Loads settings, reading the environment layer from `env` when given
    ///
    /// Passing an explicit map keeps tests independent of the process
    /// environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigurationError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("per_source_timeout_ms", defaults.per_source_timeout_ms)?
            .set_default("overall_timeout_ms", defaults.overall_timeout_ms)?
            .set_default("fallback_text", defaults.fallback_text)?;

        if let Some(path) = path {
            debug!("Loading collector settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies command-line overrides and re-validates
    pub fn with_overrides(
        mut self,
        per_source_timeout_ms: Option<u64>,
        overall_timeout_ms: Option<u64>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(value) = per_source_timeout_ms {
            self.per_source_timeout_ms = value;
        }
        if let Some(value) = overall_timeout_ms {
            self.overall_timeout_ms = value;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_timeouts(self.per_source_timeout(), self.overall_timeout())?;
        if self.fallback_text.trim().is_empty() {
            return Err(ConfigurationError::InvalidSetting(
                "fallback_text must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn per_source_timeout(&self) -> Duration {
        Duration::from_millis(self.per_source_timeout_ms)
    }

    pub fn overall_timeout(&self) -> Duration {
        Duration::from_millis(self.overall_timeout_ms)
    }
}
