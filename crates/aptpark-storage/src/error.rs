use thiserror::Error;

/// Storage-specific error types for the parking database.
///
/// Capacity and cap rejections are not errors at this layer; they are
/// decided by the services from the counts the repositories return.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Entity not found in database
    #[error("Entity not found: {entity_type} with {field}={value}")]
    NotFound {
        entity_type: String,
        field: String,
        value: String,
    },

    /// Stored value does not decode into a domain value
    #[error("Validation error: {0}")]
    Validation(#[from] aptpark_core::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// A lookup by `field = value` on `entity_type` matched nothing
    pub fn not_found(entity_type: &str, field: &str, value: impl ToString) -> Self {
        StorageError::NotFound {
            entity_type: entity_type.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
