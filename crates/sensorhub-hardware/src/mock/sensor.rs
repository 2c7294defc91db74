//! Mock sensor driver for testing and development.
//!
//! This module provides a simulated sensor that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{
    HardwareError, Result,
    traits::SensorDriver,
    types::{DeviceInfo, ReadingValue},
};
use sensorhub_core::{DeviceSelector, SensorKind};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Mock sensor driver for testing and development.
///
/// Until readings are queued through its [`MockSensorHandle`], the mock
/// answers every read with a fixed value whose shape depends on the bus
/// kind: I2C sensors report a scalar, SPI sensors a list of channel samples,
/// and UART sensors a complex value. UART mocks have no initialization step.
///
/// # Examples
///
/// ```
/// use sensorhub_core::SensorKind;
/// use sensorhub_hardware::mock::MockSensor;
/// use sensorhub_hardware::traits::SensorDriver;
/// use sensorhub_hardware::ReadingValue;
///
/// let (mut sensor, handle) = MockSensor::new(SensorKind::I2c);
///
/// handle.push_reading(ReadingValue::Scalar(18.25));
///
/// assert_eq!(sensor.read().unwrap(), ReadingValue::Scalar(18.25));
/// assert_eq!(sensor.read().unwrap(), ReadingValue::Scalar(21.5));
/// assert_eq!(handle.read_count(), 2);
/// ```
#[derive(Debug)]
pub struct MockSensor {
    /// Bus kind this mock emulates
    kind: SensorKind,

    /// Driver name
    name: String,

    /// State shared with the handle
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    queued: VecDeque<MockResponse>,
    configure_calls: Vec<(u8, DeviceSelector)>,
    configure_failure: Option<String>,
    disconnected: bool,
    read_count: usize,
}

#[derive(Debug, Clone)]
enum MockResponse {
    Reading(ReadingValue),
    Raw(Value),
    Failure(String),
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockSensor {
    /// Create a new mock sensor with the default name for its kind.
    ///
    /// Returns a tuple of (MockSensor, MockSensorHandle) where the handle
    /// can be used to script readings and inspect driver calls.
    pub fn new(kind: SensorKind) -> (Self, MockSensorHandle) {
        Self::with_name(kind, format!("Mock {kind} Sensor"))
    }

    /// Create a new mock sensor with a custom name.
    pub fn with_name(kind: SensorKind, name: String) -> (Self, MockSensorHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));

        let sensor = Self {
            kind,
            name: name.clone(),
            state: Arc::clone(&state),
        };

        let handle = MockSensorHandle { kind, name, state };

        (sensor, handle)
    }

    /// Bus kind this mock emulates.
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// The reading returned when nothing is queued.
    pub fn default_reading(kind: SensorKind) -> ReadingValue {
        match kind {
            SensorKind::I2c => ReadingValue::Scalar(21.5),
            SensorKind::Spi => ReadingValue::Channels(vec![12.0, 34.0, 56.0]),
            SensorKind::Uart => ReadingValue::Complex {
                triggered: false,
                channel: 1,
                value: 0.5,
            },
        }
    }
}

impl SensorDriver for MockSensor {
    fn configure(&mut self, bus_no: u8, selector: DeviceSelector) -> Result<()> {
        if self.kind == SensorKind::Uart {
            return Err(HardwareError::unsupported("configure"));
        }
        if selector.kind() != self.kind {
            return Err(HardwareError::configuration(format!(
                "{} driver cannot use selector {selector}",
                self.kind
            )));
        }

        let mut state = lock(&self.state);
        if let Some(message) = state.configure_failure.clone() {
            return Err(HardwareError::initialization_failed(message));
        }

        debug!("{} configured on bus {} ({})", self.name, bus_no, selector);
        state.configure_calls.push((bus_no, selector));
        Ok(())
    }

    fn read(&mut self) -> Result<ReadingValue> {
        let mut state = lock(&self.state);
        if state.disconnected {
            return Err(HardwareError::disconnected(self.name.clone()));
        }
        state.read_count += 1;

        match state.queued.pop_front() {
            Some(MockResponse::Reading(reading)) => Ok(reading),
            Some(MockResponse::Raw(raw)) => ReadingValue::from_json(&raw),
            Some(MockResponse::Failure(message)) => Err(HardwareError::communication(message)),
            None => Ok(Self::default_reading(self.kind)),
        }
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo::new(self.name.clone(), format!("Mock {} v1.0", self.kind))
            .with_firmware_version("1.0.0")
    }
}

/// Handle for controlling a mock sensor.
///
/// Clones share state with the sensor and with each other, so a test can
/// keep a handle after the sensor has been moved into a registry.
#[derive(Debug, Clone)]
pub struct MockSensorHandle {
    /// Bus kind of the controlled sensor
    kind: SensorKind,

    /// Driver name
    name: String,

    /// State shared with the sensor
    state: Arc<Mutex<MockState>>,
}

impl MockSensorHandle {
    /// Queue a reading to be returned by the next read.
    pub fn push_reading(&self, reading: ReadingValue) {
        lock(&self.state)
            .queued
            .push_back(MockResponse::Reading(reading));
    }

    /// Queue raw driver output; the read validates its shape.
    pub fn push_raw(&self, raw: Value) {
        lock(&self.state).queued.push_back(MockResponse::Raw(raw));
    }

    /// Queue a communication failure for the next read.
    pub fn push_failure(&self, message: impl Into<String>) {
        lock(&self.state)
            .queued
            .push_back(MockResponse::Failure(message.into()));
    }

    /// Make every subsequent `configure` call fail.
    pub fn fail_configure(&self, message: impl Into<String>) {
        lock(&self.state).configure_failure = Some(message.into());
    }

    /// Simulate the device being unplugged.
    pub fn disconnect(&self) {
        lock(&self.state).disconnected = true;
    }

    /// Simulate the device being plugged back in.
    pub fn reconnect(&self) {
        lock(&self.state).disconnected = false;
    }

    /// Successful `configure` calls, in order.
    pub fn configure_calls(&self) -> Vec<(u8, DeviceSelector)> {
        lock(&self.state).configure_calls.clone()
    }

    /// Number of reads attempted while connected.
    pub fn read_count(&self) -> usize {
        lock(&self.state).read_count
    }

    /// Bus kind of the controlled sensor.
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Get the driver name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
