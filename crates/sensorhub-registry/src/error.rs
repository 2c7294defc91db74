//! Error types for registering and reading sensors.

use crate::builder::BuildError;
use crate::conflict::BusConflict;
use crate::schema::SchemaViolation;
use sensorhub_hardware::HardwareError;
use std::fmt;
use thiserror::Error;

/// Schema tier that rejected a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    /// Bus-generic fields.
    Base,
    /// Fields of the sensor's kind.
    Device,
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStage::Base => write!(f, "base"),
            ValidationStage::Device => write!(f, "device-specific"),
        }
    }
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a sensor could not be added. The registry is unchanged in every case.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The configuration text is not a JSON object.
    #[error("Malformed sensor configuration: {0}")]
    Construction(String),

    #[error("Invalid {stage} sensor configuration: {}", join_violations(.violations))]
    Schema {
        stage: ValidationStage,
        violations: Vec<SchemaViolation>,
    },

    #[error("Unknown properties in sensor configuration: {}", .fields.join(", "))]
    UnknownFields { fields: Vec<String> },

    #[error("Bus conflict: {0}")]
    Conflict(#[from] BusConflict),

    #[error("Cannot build sensor: {0}")]
    Build(#[from] BuildError),

    /// The bound driver failed to configure the device.
    #[error("Initialization of sensor '{alias}' failed: {source}")]
    Initialization {
        alias: String,
        #[source]
        source: HardwareError,
    },
}

impl RegistryError {
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Returns `true` for schema failures of either tier.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Reading one sensor failed; other sensors are unaffected.
#[derive(Debug, Error)]
#[error("Reading sensor '{alias}' failed: {source}")]
pub struct ReadError {
    pub alias: String,
    #[source]
    pub source: HardwareError,
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
