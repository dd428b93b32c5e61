// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::{fmt, str::FromStr};

use thiserror::Error;

use super::diagnostics::Severity;

/// Default amount of guest RAM, 1 GiB.
pub const DEFAULT_RAM_SIZE: u64 = 0x4000_0000;

/// Configuration used when building the board.
/// These options don't change at runtime.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde_config", serde(default))]
pub struct SystemConfig {
    /// Amount of guest RAM, in bytes.
    pub ram_size: u64,
    /// Device property overrides, applied before devices are realized.
    pub globals: Vec<GlobalProperty>,
    /// If save states should be compressed.
    pub compress_savestates: bool,
    /// Minimum severity of diagnostic events to record.
    pub diagnostic_level: Severity,
}

impl SystemConfig {
    /// All global overrides targeting the given driver, in order.
    pub fn globals_for<'a>(&'a self, driver: &'a str) -> impl Iterator<Item = &'a GlobalProperty> {
        self.globals.iter().filter(move |g| g.driver == driver)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            ram_size: DEFAULT_RAM_SIZE,
            globals: Vec::new(),
            compress_savestates: false,
            diagnostic_level: Severity::Warning,
        }
    }
}

/// A `driver.property=value` override for a device property.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_config", derive(serde::Deserialize, serde::Serialize))]
pub struct GlobalProperty {
    pub driver: String,
    pub property: String,
    pub value: String,
}

impl GlobalProperty {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidGlobal(text.to_string());
        let (target, value) = text.split_once('=').ok_or_else(invalid)?;
        let (driver, property) = target.split_once('.').ok_or_else(invalid)?;
        if driver.is_empty() || property.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            driver: driver.trim().to_string(),
            property: property.trim().to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl FromStr for GlobalProperty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GlobalProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.driver, self.property, self.value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid global property '{0}', expected driver.property=value")]
    InvalidGlobal(String),
}
