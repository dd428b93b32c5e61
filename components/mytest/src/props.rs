// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Write;

use common::numutil::parse_u64;
use thiserror::Error;

use crate::TYPE_MYTEST;

/// Description of a settable device property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub type_name: &'static str,
    pub default: u32,
    pub description: &'static str,
}

/// All properties the device exposes.
pub const PROPERTIES: &[PropertyInfo] = &[PropertyInfo {
    name: "data",
    type_name: "uint32",
    default: 0,
    description: "Register value loaded on realize and reset",
}];

/// Configuration properties of the device. They can only be changed
/// before the device is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MytestProps {
    /// Value the register takes on realize and reset.
    pub data: u32,
}

impl Default for MytestProps {
    fn default() -> Self {
        Self {
            data: PROPERTIES[0].default,
        }
    }
}

impl MytestProps {
    /// Set a property from its textual value.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "data" => {
                self.data = parse_u64(value)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| PropertyError::InvalidValue {
                        name: name.to_string(),
                        value: value.to_string(),
                        type_name: "uint32",
                    })?;
                Ok(())
            }
            _ => Err(PropertyError::Unknown(name.to_string())),
        }
    }

    /// Get the value of a property.
    pub fn get(&self, name: &str) -> Option<u32> {
        match name {
            "data" => Some(self.data),
            _ => None,
        }
    }
}

/// Render the property listing shown for `-device mytest,help`.
pub fn help() -> String {
    let mut out = format!("{TYPE_MYTEST} options:\n");
    for prop in PROPERTIES {
        let arg = format!("{}=<{}>", prop.name, prop.type_name);
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "  {arg:<16} - {} (default: {})",
            prop.description, prop.default
        );
    }
    out
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertyError {
    #[error("property 'mytest.{0}' not found")]
    Unknown(String),
    #[error("property 'mytest.{name}' doesn't take value '{value}' (expected {type_name})")]
    InvalidValue {
        name: String,
        value: String,
        type_name: &'static str,
    },
    #[error("attempt to set property 'mytest.{0}' after it was realized")]
    Realized(String),
    #[error("device 'mytest' is already realized")]
    AlreadyRealized,
}
