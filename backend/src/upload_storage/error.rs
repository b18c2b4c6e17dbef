//! Error types for upload storage operations

use thiserror::Error;

/// Result type for upload storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while issuing upload URLs
#[derive(Error, Debug)]
pub enum StorageError {
    /// Presigning configuration could not be built (e.g. expiry out of range)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The SDK failed to sign the request
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Bucket, region or endpoint do not form a usable location
    #[error("Invalid storage location: {0}")]
    InvalidLocation(String),
}
