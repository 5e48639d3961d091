//! Runtime configuration.
//!
//! Configuration comes from an optional TOML file, with command-line flags
//! layered on top. Validation collects every broken rule in one pass instead
//! of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use stateful_device::config::Config;
//!
//! let config = Config::from_toml(
//!     r#"
//!     [door]
//!     opening_ms = 1500
//!
//!     [session]
//!     clear_screen = false
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.door.opening_ms, 1500);
//! assert_eq!(config.door.closing_ms, 3000);
//! assert_eq!(config.session.door_pause_ms, 2000);
//! assert!(!config.session.clear_screen);
//! ```

pub mod error;

pub use error::{ConfigError, ConfigViolation};

use crate::devices::DoorTimings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Upper bound for every configurable delay.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Door motor timings, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoorConfig {
    pub opening_ms: u64,
    pub closing_ms: u64,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            opening_ms: 3_000,
            closing_ms: 3_000,
        }
    }
}

/// Interactive session behaviour.
///
/// Each device pauses for its own time after every menu iteration so the
/// last messages stay readable before the screen is cleared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub vending_pause_ms: u64,
    pub door_pause_ms: u64,
    /// Clear the terminal before drawing the menu.
    pub clear_screen: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vending_pause_ms: 3_000,
            door_pause_ms: 2_000,
            clear_screen: true,
        }
    }
}

impl SessionConfig {
    pub fn vending_pause(&self) -> Duration {
        Duration::from_millis(self.vending_pause_ms)
    }

    pub fn door_pause(&self) -> Duration {
        Duration::from_millis(self.door_pause_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub door: DoorConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validated()
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&text)
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks = vec![
            check_delay("door.opening_ms", self.door.opening_ms),
            check_delay("door.closing_ms", self.door.closing_ms),
            check_max("session.vending_pause_ms", self.session.vending_pause_ms),
            check_max("session.door_pause_ms", self.session.door_pause_ms),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Consume the config, returning it only if every rule holds.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => Err(ConfigError::Invalid {
                violations: errors.iter().cloned().collect(),
            }),
        }
    }

    pub fn door_timings(&self) -> DoorTimings {
        DoorTimings {
            opening: Duration::from_millis(self.door.opening_ms),
            closing: Duration::from_millis(self.door.closing_ms),
        }
    }
}

fn check_delay(field: &'static str, value: u64) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if value == 0 {
        Validation::fail(ConfigViolation::ZeroDelay { field })
    } else {
        check_max(field, value)
    }
}

fn check_max(field: &'static str, value: u64) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if value > MAX_DELAY_MS {
        Validation::fail(ConfigViolation::DelayOutOfRange {
            field,
            value,
            max: MAX_DELAY_MS,
        })
    } else {
        Validation::success(())
    }
}
