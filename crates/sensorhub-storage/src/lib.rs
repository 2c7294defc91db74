//! Storage layer for SensorHub.
//!
//! This crate provides SQLite-backed persistence for registered sensors and
//! rebuilds a [`SensorRegistry`](sensorhub_registry::SensorRegistry) from
//! what it stored.
//!
//! # Architecture
//!
//! - [`Database`] - Connection pool manager with automatic migrations
//! - [`SensorRepository`] - Data access trait, implemented by
//!   [`SqliteSensorRepository`]
//! - [`restore`] - Persisting a registry and replaying stored sensors
//!
//! # Stored Form
//!
//! A row keeps the kind, bus number, device name and alias as indexed
//! columns, the identifier as a 16-byte little-endian blob, and the full JSON
//! configuration regenerated from the record. Drivers are never stored; a
//! restored sensor gets a fresh driver from the registry's provider.
//!
//! # Examples
//!
//! ```no_run
//! use sensorhub_registry::SensorRegistry;
//! use sensorhub_storage::{Database, DatabaseConfig, SqliteSensorRepository, restore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("sensorhub.db")).await?;
//! let repo = SqliteSensorRepository::new(db.pool().clone());
//!
//! let mut registry = SensorRegistry::default();
//! registry.add(r#"{"sensor_type": "i2c", "bus_no": 2, "i2c_addr": 78,
//!                  "dev_name": "BM280", "alias": "RHT-sensor1"}"#)?;
//! restore::persist_registry(&repo, &registry).await?;
//!
//! // Later, in a new process
//! let mut reloaded = SensorRegistry::default();
//! let count = restore::restore_registry(&repo, &mut reloaded).await?;
//! assert_eq!(count, 1);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod restore;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::{NewSensor, StoredSensor};
pub use repositories::{SensorRepository, SqliteSensorRepository};
pub use restore::{persist_registry, replay, restore_registry};
