use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A stored record could not be decoded into its entity.
    #[error("corrupted record in `{collection}`: {message}")]
    Corrupted {
        collection: &'static str,
        message: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct an error for a record that no longer matches its entity shape.
    pub fn corrupted(collection: &'static str, message: impl Into<String>) -> Self {
        StorageError::Corrupted {
            collection,
            message: message.into(),
        }
    }
}
