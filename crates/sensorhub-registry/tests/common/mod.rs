//! Common test utilities for registry integration tests.
//!
//! Configurations are built with `serde_json::json!` and serialized, so each
//! test states exactly the properties it cares about.

#![allow(dead_code)]

use sensorhub_hardware::mock::MockDriverProvider;
use sensorhub_registry::{RegistryConfig, SensorRegistry};
use serde_json::{Value, json};

/// Install a test subscriber once so `RUST_LOG=debug` shows pipeline logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Registry with a mock driver for every sensor, plus a provider clone to
/// reach the mock handles.
pub fn mock_registry(config: RegistryConfig) -> (SensorRegistry, MockDriverProvider) {
    init_tracing();
    let provider = MockDriverProvider::new();
    let registry = SensorRegistry::with_drivers(config, provider.clone());
    (registry, provider)
}

pub fn i2c_config(bus_no: u8, i2c_addr: u8, alias: &str) -> Value {
    json!({
        "sensor_type": "i2c",
        "bus_no": bus_no,
        "i2c_addr": i2c_addr,
        "dev_name": "BM280",
        "alias": alias,
    })
}

pub fn spi_config(bus_no: u8, cs_no: u8, alias: &str) -> Value {
    json!({
        "sensor_type": "spi",
        "bus_no": bus_no,
        "cs_no": cs_no,
        "dev_name": "SHT721",
        "alias": alias,
    })
}

pub fn uart_config(bus_no: u8, baud_rate: u32, alias: &str) -> Value {
    json!({
        "sensor_type": "uart",
        "bus_no": bus_no,
        "baud_rate": baud_rate,
        "dev_name": "CustomHygrometerSubmodule",
        "alias": alias,
    })
}

/// Copy of `config` with `field` removed.
pub fn without(mut config: Value, field: &str) -> Value {
    if let Some(object) = config.as_object_mut() {
        object.remove(field);
    }
    config
}

/// Copy of `config` with `field` set to `value`.
pub fn with(mut config: Value, field: &str, value: Value) -> Value {
    if let Some(object) = config.as_object_mut() {
        object.insert(field.to_string(), value);
    }
    config
}

/// Add a configuration given as a JSON value.
pub fn add(registry: &mut SensorRegistry, config: &Value) -> sensorhub_registry::Result<()> {
    registry.add(&config.to_string())
}

/// Aliases of all registered sensors, in registration order.
pub fn aliases(registry: &SensorRegistry) -> Vec<String> {
    registry
        .records()
        .iter()
        .map(|record| record.alias().to_string())
        .collect()
}
