//! Enum wrapper for sensor driver dispatch.
//!
//! Built-in drivers are dispatched through concrete enum variants; drivers
//! supplied by a host application are boxed behind the
//! [`AnySensorDriver::External`] variant.
//!
//! # Examples
//!
//! ```
//! use sensorhub_core::SensorKind;
//! use sensorhub_hardware::devices::AnySensorDriver;
//! use sensorhub_hardware::mock::MockSensor;
//!
//! let (sensor, _handle) = MockSensor::new(SensorKind::Spi);
//! let any_sensor = AnySensorDriver::Mock(sensor);
//!
//! // Can now be used polymorphically through the SensorDriver trait
//! ```

use crate::mock::MockSensor;
use crate::traits::SensorDriver;
use crate::{DeviceInfo, ReadingValue, Result};
use sensorhub_core::DeviceSelector;

/// Enum wrapper for sensor driver dispatch.
///
/// # Examples
///
/// ```
/// use sensorhub_core::SensorKind;
/// use sensorhub_hardware::devices::AnySensorDriver;
/// use sensorhub_hardware::traits::SensorDriver;
/// use sensorhub_hardware::mock::MockSensor;
///
/// let (sensor, _handle) = MockSensor::new(SensorKind::I2c);
/// let mut any_sensor = AnySensorDriver::Mock(sensor);
///
/// let reading = any_sensor.read().unwrap();
/// assert!(reading.is_scalar());
/// ```
#[derive(Debug)]
pub enum AnySensorDriver {
    /// Mock driver for development and testing.
    Mock(MockSensor),

    /// Driver supplied by the host application.
    External(Box<dyn SensorDriver>),
}

impl AnySensorDriver {
    /// Box a host-supplied driver.
    pub fn external(driver: impl SensorDriver + 'static) -> Self {
        Self::External(Box::new(driver))
    }
}

impl From<MockSensor> for AnySensorDriver {
    fn from(sensor: MockSensor) -> Self {
        Self::Mock(sensor)
    }
}

impl SensorDriver for AnySensorDriver {
    fn configure(&mut self, bus_no: u8, selector: DeviceSelector) -> Result<()> {
        match self {
            Self::Mock(device) => device.configure(bus_no, selector),
            Self::External(device) => device.configure(bus_no, selector),
        }
    }

    fn read(&mut self) -> Result<ReadingValue> {
        match self {
            Self::Mock(device) => device.read(),
            Self::External(device) => device.read(),
        }
    }

    fn info(&self) -> DeviceInfo {
        match self {
            Self::Mock(device) => device.info(),
            Self::External(device) => device.info(),
        }
    }
}
