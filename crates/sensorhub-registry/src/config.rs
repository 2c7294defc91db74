//! Registry behavior switches.

use serde::{Deserialize, Serialize};

/// How far an I2C address conflict reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum I2cConflictScope {
    /// An address may be used once across all buses.
    #[default]
    AnyBus,
    /// An address may be used once per bus.
    PerBus,
}

/// Registry configuration
///
/// Every field has a default, so a partial JSON document is accepted:
///
/// ```
/// use sensorhub_registry::{I2cConflictScope, RegistryConfig};
///
/// let config: RegistryConfig =
///     serde_json::from_str(r#"{"i2c_conflict_scope": "per_bus"}"#).unwrap();
///
/// assert_eq!(config.i2c_conflict_scope, I2cConflictScope::PerBus);
/// assert!(config.assign_identifiers);
/// assert!(!config.enforce_unique_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Give sensors without a `uuid` a random v4 identifier
    pub assign_identifiers: bool,

    /// Reject a sensor whose alias or identifier is already registered
    pub enforce_unique_keys: bool,

    /// Reach of the I2C address conflict rule
    pub i2c_conflict_scope: I2cConflictScope,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            assign_identifiers: true,
            enforce_unique_keys: false,
            i2c_conflict_scope: I2cConflictScope::AnyBus,
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether identifiers are assigned automatically
    pub fn assign_identifiers(mut self, assign: bool) -> Self {
        self.assign_identifiers = assign;
        self
    }

    /// Set whether aliases and identifiers must be unique
    pub fn enforce_unique_keys(mut self, enforce: bool) -> Self {
        self.enforce_unique_keys = enforce;
        self
    }

    /// Set the I2C conflict scope
    pub fn i2c_conflict_scope(mut self, scope: I2cConflictScope) -> Self {
        self.i2c_conflict_scope = scope;
        self
    }
}
