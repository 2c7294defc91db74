//! Common types shared across sensor driver implementations.
//!
//! This module defines the reading values a driver produces and the
//! descriptive metadata a driver reports about itself.

use crate::error::{HardwareError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Generic driver information.
///
/// Contains metadata about the driver bound to a sensor, such as its name
/// and model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Driver name (e.g., "Mock I2C Sensor").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Result of a single sensor read.
///
/// A reading is exactly one of three shapes. Drivers that hand back raw
/// JSON must go through [`ReadingValue::from_json`], which rejects anything
/// else instead of coercing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReadingValue {
    /// Single measurement.
    Scalar(f64),

    /// Ordered samples, one per channel.
    Channels(Vec<f64>),

    /// Event-style reading from a multi-channel device.
    Complex {
        /// Whether the device reported a trigger condition.
        triggered: bool,
        /// Channel the value was taken from.
        channel: i32,
        /// Channel value.
        value: f64,
    },
}

impl ReadingValue {
    /// Convert raw driver output into a reading.
    ///
    /// Accepted shapes:
    /// - a JSON number (integer or float) becomes [`ReadingValue::Scalar`],
    /// - an array of numbers becomes [`ReadingValue::Channels`],
    /// - an object with exactly the keys `triggered` (bool), `channel`
    ///   (integer) and `value` (number) becomes [`ReadingValue::Complex`].
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::InvalidData` for every other shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use sensorhub_hardware::ReadingValue;
    /// use serde_json::json;
    ///
    /// let reading = ReadingValue::from_json(&json!([1, 2.5])).unwrap();
    /// assert_eq!(reading, ReadingValue::Channels(vec![1.0, 2.5]));
    ///
    /// assert!(ReadingValue::from_json(&json!("21.5")).is_err());
    /// ```
    pub fn from_json(raw: &Value) -> Result<Self> {
        match raw {
            Value::Number(n) => n
                .as_f64()
                .map(Self::Scalar)
                .ok_or_else(|| HardwareError::invalid_data(format!("Unrepresentable number {n}"))),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    item.as_f64().ok_or_else(|| {
                        HardwareError::invalid_data(format!(
                            "Channel sample {idx} is not numeric: {item}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Channels),
            Value::Object(map) => {
                if map.len() != 3 {
                    return Err(HardwareError::invalid_data(format!(
                        "Complex reading must have exactly triggered/channel/value, got {raw}"
                    )));
                }
                let triggered = map.get("triggered").and_then(Value::as_bool);
                let channel = map
                    .get("channel")
                    .and_then(Value::as_i64)
                    .and_then(|c| i32::try_from(c).ok());
                let value = map.get("value").and_then(Value::as_f64);

                match (triggered, channel, value) {
                    (Some(triggered), Some(channel), Some(value)) => Ok(Self::Complex {
                        triggered,
                        channel,
                        value,
                    }),
                    _ => Err(HardwareError::invalid_data(format!(
                        "Malformed complex reading: {raw}"
                    ))),
                }
            }
            other => Err(HardwareError::invalid_data(format!(
                "Cannot parse sensor readout result: {other}"
            ))),
        }
    }

    /// Returns `true` for a scalar reading.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Get the scalar value, if this is a scalar reading.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Channels(samples) => {
                write!(f, "[")?;
                for (idx, sample) in samples.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{sample}")?;
                }
                write!(f, "]")
            }
            Self::Complex {
                triggered,
                channel,
                value,
            } => write!(f, "triggered={triggered} channel={channel} value={value}"),
        }
    }
}
