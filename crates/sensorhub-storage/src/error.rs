use sensorhub_registry::RegistryError;
use thiserror::Error;

/// Storage-specific error types for SensorHub.
///
/// These errors represent failures in database operations, in decoding
/// stored rows, and in replaying stored sensors into a registry.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Stored configuration could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Entity not found in database
    #[error("Entity not found: {entity_type} with {field}={value}")]
    NotFound {
        entity_type: String,
        field: String,
        value: String,
    },

    /// A stored sensor was rejected by the registry
    #[error("Cannot restore sensor '{alias}': {source}")]
    Registry {
        alias: String,
        #[source]
        source: RegistryError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Stored row violates an invariant the schema cannot express
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
