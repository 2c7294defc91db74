//! Sensor driver trait definitions.
//!
//! This module defines the contract between the sensor registry and the
//! drivers that talk to real (or mocked) devices. The registry never performs
//! bus transactions itself; it only calls the capabilities declared here.
//!
//! Reads are synchronous, single-call operations. A driver is invoked once
//! per read request and no retry policy is implied.

use crate::devices::AnySensorDriver;
use crate::error::{HardwareError, Result};
use crate::types::{DeviceInfo, ReadingValue};
use sensorhub_core::{DeviceSelector, SensorKind};
use std::fmt;

/// Sensor driver abstraction.
///
/// A driver is bound to exactly one registered sensor. It may offer an
/// initialization step, invoked once when the sensor is registered, and must
/// offer a read operation.
///
/// The trait is object-safe, so drivers supplied by a host can be boxed
/// into [`AnySensorDriver::External`].
///
/// # Examples
///
/// ```
/// use sensorhub_hardware::traits::SensorDriver;
/// use sensorhub_hardware::{DeviceInfo, ReadingValue, Result};
///
/// #[derive(Debug)]
/// struct Thermistor {
///     millivolts: u16,
/// }
///
/// impl SensorDriver for Thermistor {
///     fn read(&mut self) -> Result<ReadingValue> {
///         Ok(ReadingValue::Scalar(f64::from(self.millivolts) / 10.0))
///     }
///
///     fn info(&self) -> DeviceInfo {
///         DeviceInfo::new("Thermistor", "NTC-10K")
///     }
/// }
///
/// let mut sensor = Thermistor { millivolts: 215 };
/// assert_eq!(sensor.read().unwrap(), ReadingValue::Scalar(21.5));
/// ```
pub trait SensorDriver: Send + fmt::Debug {
    /// Configure or initialize the device behind this driver.
    ///
    /// Called once, when the owning sensor is registered, with the sensor's
    /// bus number and its device selector.
    ///
    /// # Errors
    ///
    /// The default implementation returns `HardwareError::Unsupported`,
    /// meaning the driver has no initialization step. Any other error
    /// aborts the registration.
    fn configure(&mut self, bus_no: u8, selector: DeviceSelector) -> Result<()> {
        let _ = (bus_no, selector);
        Err(HardwareError::unsupported("configure"))
    }

    /// Take one reading from the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be read or reports data of an
    /// unexpected shape.
    fn read(&mut self) -> Result<ReadingValue>;

    /// Describe the driver.
    fn info(&self) -> DeviceInfo;
}

/// Source of drivers for newly registered sensors.
///
/// The registry asks its provider for a driver each time a sensor passes
/// validation. Returning `None` registers the sensor without a read
/// capability; reads of that sensor are reported as errors.
///
/// Any `Fn(SensorKind) -> Option<AnySensorDriver>` closure is a provider:
///
/// ```
/// use sensorhub_core::SensorKind;
/// use sensorhub_hardware::traits::DriverProvider;
/// use sensorhub_hardware::devices::AnySensorDriver;
/// use sensorhub_hardware::mock::MockSensor;
///
/// let provider = |kind: SensorKind| {
///     let (sensor, _handle) = MockSensor::new(kind);
///     Some(AnySensorDriver::Mock(sensor))
/// };
///
/// assert!(provider.driver_for(SensorKind::I2c).is_some());
/// ```
pub trait DriverProvider: Send {
    /// Provide a driver for a sensor of the given kind.
    fn driver_for(&self, kind: SensorKind) -> Option<AnySensorDriver>;
}

impl<F> DriverProvider for F
where
    F: Fn(SensorKind) -> Option<AnySensorDriver> + Send,
{
    fn driver_for(&self, kind: SensorKind) -> Option<AnySensorDriver> {
        self(kind)
    }
}

/// Provider that never supplies a driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDrivers;

impl DriverProvider for NoDrivers {
    fn driver_for(&self, _kind: SensorKind) -> Option<AnySensorDriver> {
        None
    }
}
