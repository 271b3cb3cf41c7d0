//! Named runtime options.
//!
//! The key set is fixed by [`OPTION_DEFINITIONS`]; only values change.

use clicker_types::error::{ClickerError, Result};
use parking_lot::RwLock;

pub const QUIET: &str = "quiet";
pub const LEADER: &str = "leader";
pub const ENABLE_CPS_REGISTER: &str = "enable_cps_register";
pub const ENABLE_LAST_LOCATION_REGISTER: &str = "enable_last_location_register";
pub const ENABLE_HOTKEY: &str = "enable_hotkey";

/// A built-in option with its default.
#[derive(Debug, Clone, Copy)]
pub struct OptionDefinition {
    pub key: &'static str,
    pub default_value: &'static str,
}

/// Every option, in listing order.
pub const OPTION_DEFINITIONS: &[OptionDefinition] = &[
    OptionDefinition {
        key: QUIET,
        default_value: "false",
    },
    OptionDefinition {
        key: LEADER,
        default_value: "",
    },
    OptionDefinition {
        key: ENABLE_CPS_REGISTER,
        default_value: "false",
    },
    OptionDefinition {
        key: ENABLE_LAST_LOCATION_REGISTER,
        default_value: "false",
    },
    OptionDefinition {
        key: ENABLE_HOTKEY,
        default_value: "true",
    },
];

/// Current option values, indexed like [`OPTION_DEFINITIONS`].
#[derive(Debug)]
pub struct OptionTable {
    values: RwLock<Vec<String>>,
}

impl OptionTable {
    /// All options at their defaults.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(
                OPTION_DEFINITIONS
                    .iter()
                    .map(|def| def.default_value.to_string())
                    .collect(),
            ),
        }
    }

    fn position(key: &str) -> Option<usize> {
        OPTION_DEFINITIONS.iter().position(|def| def.key == key)
    }

    /// Current value of `key`, or `None` for an unknown key.
    pub fn get(&self, key: &str) -> Option<String> {
        let i = Self::position(key)?;
        Some(self.values.read()[i].clone())
    }

    /// Overwrite `key`. Unknown keys are rejected without changing anything.
    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<()> {
        let i = Self::position(key).ok_or_else(|| ClickerError::UnknownOption(key.to_string()))?;
        self.values.write()[i] = value.into();
        Ok(())
    }

    /// `true` only when the option holds exactly `"true"`.
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v == "true")
    }

    pub fn leader(&self) -> String {
        self.get(LEADER).unwrap_or_default()
    }

    pub fn quiet(&self) -> bool {
        self.is_true(QUIET)
    }

    /// `(key, value)` pairs in definition order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let values = self.values.read();
        OPTION_DEFINITIONS
            .iter()
            .zip(values.iter())
            .map(|(def, value)| (def.key, value.clone()))
            .collect()
    }
}

impl Default for OptionTable {
    fn default() -> Self {
        Self::new()
    }
}
