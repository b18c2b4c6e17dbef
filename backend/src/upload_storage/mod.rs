//! S3 presigned uploads for DNC list files
mod error;
mod location;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::{DateTime, TimeDelta, Utc};
use common_types::SIGNED_CONTENT_TYPE;

pub use error::{StorageError, StorageResult};
pub use location::StorageLocation;

/// Upload authorization for one object
#[derive(Debug, Clone)]
pub struct PresignedUpload {
    /// Presigned URL for a single `PUT` of the object
    pub upload_url: String,
    /// Public URL the object has once written
    pub file_url: String,
    /// UTC timestamp when `upload_url` expires
    pub expires_at: DateTime<Utc>,
}

/// Issues presigned upload URLs into the fixed DNC list bucket
pub struct UploadStorage {
    s3_client: Arc<S3Client>,
    location: StorageLocation,
    presigned_url_expiry_secs: u64,
}

impl UploadStorage {
    /// Creates a new upload storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client, its credentials sign every URL
    /// * `location` - Fixed bucket and public addressing of stored lists
    /// * `presigned_url_expiry_secs` - How long issued URLs stay valid
    #[must_use]
    pub const fn new(
        s3_client: Arc<S3Client>,
        location: StorageLocation,
        presigned_url_expiry_secs: u64,
    ) -> Self {
        Self {
            s3_client,
            location,
            presigned_url_expiry_secs,
        }
    }

    /// Public URL the object named `file_name` has once written
    #[must_use]
    pub fn object_url(&self, file_name: &str) -> String {
        self.location.object_url(file_name)
    }

    /// Generates a presigned URL for a single `PUT` of `file_name`
    ///
    /// The signature covers `Content-Type: text/csv`, so the upload must declare that
    /// type. Nothing is written to the bucket here; an existing object with the same
    /// name is overwritten once the URL is used.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if the presigning config cannot be created
    /// Returns `StorageError::SigningError` if the SDK fails to sign the request
    pub async fn presign_upload(&self, file_name: &str) -> StorageResult<PresignedUpload> {
        let expires_in = Duration::from_secs(self.presigned_url_expiry_secs);

        let presigning_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            StorageError::ConfigError(format!("Failed to create presigning config: {e}"))
        })?;
        let validity = TimeDelta::from_std(expires_in).map_err(|e| {
            StorageError::ConfigError(format!("Presign expiry out of range: {e}"))
        })?;

        let presigned_request = self
            .s3_client
            .put_object()
            .bucket(self.location.bucket())
            .key(file_name)
            .content_type(SIGNED_CONTENT_TYPE)
            .presigned(presigning_config)
            .await
            .map_err(|e| StorageError::SigningError(format!("Failed to presign upload: {e}")))?;

        Ok(PresignedUpload {
            upload_url: presigned_request.uri().to_string(),
            file_url: self.object_url(file_name),
            expires_at: Utc::now() + validity,
        })
    }
}
