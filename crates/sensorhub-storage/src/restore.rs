//! Persisting a registry and rebuilding it from stored rows.
//!
//! Restoring never bypasses validation: each stored configuration goes back
//! through [`SensorRegistry::add`], so a restored sensor passes the same
//! schema and conflict checks as a freshly configured one and gets a driver
//! from the registry's provider.

use crate::error::{StorageError, StorageResult};
use crate::models::StoredSensor;
use crate::repositories::SensorRepository;
use sensorhub_registry::SensorRegistry;
use tracing::{info, warn};

/// Store every sensor of `registry`, in registration order.
///
/// Returns the new row ids.
pub async fn persist_registry(
    repo: &impl SensorRepository,
    registry: &SensorRegistry,
) -> StorageResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(registry.len());
    for record in registry.records() {
        ids.push(repo.store(record).await?);
    }
    info!("Stored {} sensors", ids.len());
    Ok(ids)
}

/// Add stored sensors to `registry`, in storage order.
///
/// Stored identifiers are kept. Replay stops at the first sensor the
/// registry rejects; sensors added before it stay registered.
///
/// Returns the number of sensors added.
pub fn replay(rows: &[StoredSensor], registry: &mut SensorRegistry) -> StorageResult<usize> {
    for row in rows {
        let result = match row.identifier()? {
            Some(identifier) => registry.add_with_identifier(&row.config, identifier),
            None => registry.add(&row.config),
        };

        if let Err(source) = result {
            warn!("Stored sensor '{}' (row {}) rejected: {}", row.alias, row.id, source);
            return Err(StorageError::Registry {
                alias: row.alias.clone(),
                source,
            });
        }
    }
    Ok(rows.len())
}

/// Load every stored sensor and replay it into `registry`.
///
/// All rows are fetched before the registry is touched.
pub async fn restore_registry(
    repo: &impl SensorRepository,
    registry: &mut SensorRegistry,
) -> StorageResult<usize> {
    let rows = repo.load_all().await?;
    let restored = replay(&rows, registry)?;
    info!("Restored {} sensors", restored);
    Ok(restored)
}
