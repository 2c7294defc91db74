//! Mock driver implementations for testing and development.
//!
//! This module provides simulated sensors that can be controlled
//! programmatically without requiring physical hardware.

pub mod provider;
pub mod sensor;

// Re-export commonly used types
pub use provider::MockDriverProvider;
pub use sensor::{MockSensor, MockSensorHandle};
