//! Driver provider that hands out mock sensors.

use super::sensor::{MockSensor, MockSensorHandle};
use crate::devices::AnySensorDriver;
use crate::traits::DriverProvider;
use sensorhub_core::SensorKind;
use std::sync::{Arc, Mutex, PoisonError};

/// Provides a fresh [`MockSensor`] for every registered sensor.
///
/// The handle of each mock is kept, in the order the drivers were handed
/// out, so tests can script readings after registration. Clones share the
/// handle list.
///
/// # Examples
///
/// ```
/// use sensorhub_core::SensorKind;
/// use sensorhub_hardware::mock::MockDriverProvider;
/// use sensorhub_hardware::traits::DriverProvider;
///
/// let provider = MockDriverProvider::new().without_kind(SensorKind::Uart);
///
/// assert!(provider.driver_for(SensorKind::I2c).is_some());
/// assert!(provider.driver_for(SensorKind::Uart).is_none());
/// assert_eq!(provider.handles().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockDriverProvider {
    handles: Arc<Mutex<Vec<MockSensorHandle>>>,
    disabled: Vec<SensorKind>,
}

impl MockDriverProvider {
    /// Create a provider that serves every kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop serving drivers for `kind`.
    pub fn without_kind(mut self, kind: SensorKind) -> Self {
        if !self.disabled.contains(&kind) {
            self.disabled.push(kind);
        }
        self
    }

    /// Handles of every mock handed out so far.
    pub fn handles(&self) -> Vec<MockSensorHandle> {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Handle of the `index`-th mock handed out.
    pub fn handle(&self, index: usize) -> Option<MockSensorHandle> {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }
}

impl DriverProvider for MockDriverProvider {
    fn driver_for(&self, kind: SensorKind) -> Option<AnySensorDriver> {
        if self.disabled.contains(&kind) {
            return None;
        }

        let (sensor, handle) = MockSensor::new(kind);
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);

        Some(AnySensorDriver::Mock(sensor))
    }
}
