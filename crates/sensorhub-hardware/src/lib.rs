//! Driver abstraction layer for SensorHub.
//!
//! This crate defines the contract between the sensor registry and the
//! drivers that perform register-level configuration and reads. The registry
//! never touches a bus itself; it binds one driver per registered sensor and
//! calls it through the [`SensorDriver`] trait.
//!
//! # Design Philosophy
//!
//! - **Synchronous**: a read is a single blocking call with no retry policy.
//! - **Object-safe**: host drivers can be boxed as `Box<dyn SensorDriver>`.
//! - **Send**: a registry holding drivers can be moved behind a lock.
//! - **Shape-checked**: readings are one of the three [`ReadingValue`]
//!   shapes; raw JSON output goes through [`ReadingValue::from_json`].
//!
//! # Example
//!
//! ```
//! use sensorhub_core::{DeviceSelector, SensorKind};
//! use sensorhub_hardware::mock::MockSensor;
//! use sensorhub_hardware::{AnySensorDriver, ReadingValue, SensorDriver};
//!
//! let (sensor, handle) = MockSensor::new(SensorKind::Spi);
//! let mut driver = AnySensorDriver::from(sensor);
//!
//! driver.configure(1, DeviceSelector::ChipSelect(3)).unwrap();
//! handle.push_reading(ReadingValue::Channels(vec![0.1, 0.2]));
//!
//! assert_eq!(driver.read().unwrap(), ReadingValue::Channels(vec![0.1, 0.2]));
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] with a
//! [`HardwareError`]. `HardwareError::Unsupported` returned from
//! `configure` means the driver has no initialization step.

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::AnySensorDriver;
pub use error::{HardwareError, Result};
pub use traits::{DriverProvider, NoDrivers, SensorDriver};
pub use types::{DeviceInfo, ReadingValue};
