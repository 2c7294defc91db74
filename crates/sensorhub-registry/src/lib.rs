//! Validated sensor registry for SensorHub.
//!
//! This crate turns untyped JSON sensor configuration into strongly typed
//! sensor records and keeps them in an ordered, queryable catalog.
//!
//! # Pipeline
//!
//! Every call to [`SensorRegistry::add`] runs the same steps, and the first
//! failing step rejects the sensor without touching the registry:
//!
//! 1. parse the configuration text ([`registry::parse_config`]),
//! 2. check the base schema ([`schema::BASE_SCHEMA`]),
//! 3. check the schema of the configured kind,
//! 4. reject properties declared by neither schema,
//! 5. build base and device attributes ([`builder::SensorBuilder`]),
//! 6. apply the kind's bus conflict rule ([`conflict`]),
//! 7. configure the sensor's driver, if it has one,
//! 8. append the record.
//!
//! # Example
//!
//! ```
//! use sensorhub_core::SensorKind;
//! use sensorhub_registry::{RegistryError, SensorRegistry};
//!
//! let mut registry = SensorRegistry::default();
//!
//! registry
//!     .add(r#"{"sensor_type": "spi", "bus_no": 1, "cs_no": 3,
//!              "dev_name": "SHT721", "alias": "RHT-sensor2A"}"#)
//!     .unwrap();
//!
//! // Same bus, same chip-select
//! let err = registry
//!     .add(r#"{"sensor_type": "spi", "bus_no": 1, "cs_no": 3,
//!              "dev_name": "MPU6050", "alias": "IMU-A1"}"#)
//!     .unwrap_err();
//! assert!(matches!(err, RegistryError::Conflict(_)));
//!
//! assert_eq!(registry.find_by_kind(SensorKind::Spi).len(), 1);
//! ```

pub mod attributes;
pub mod builder;
pub mod config;
pub mod conflict;
pub mod error;
pub mod record;
pub mod registry;
pub mod schema;

pub use attributes::{BaseAttributes, DeviceAttributes, I2cAttributes, SpiAttributes, UartAttributes};
pub use builder::{BuildError, SensorBuilder};
pub use config::{I2cConflictScope, RegistryConfig};
pub use conflict::BusConflict;
pub use error::{ReadError, RegistryError, Result, ValidationStage};
pub use record::SensorRecord;
pub use registry::SensorRegistry;
pub use schema::{Schema, SchemaViolation};
