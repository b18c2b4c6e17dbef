//! Public addressing of stored DNC lists

use url::Url;

use super::{StorageError, StorageResult};

/// Fixed bucket and the base URL its objects are publicly addressed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    bucket: String,
    base_url: Url,
}

impl StorageLocation {
    /// Creates a storage location
    ///
    /// Without an endpoint override objects use virtual-hosted AWS addressing
    /// (`https://{bucket}.s3.{region}.amazonaws.com/{key}`). With an override the
    /// bucket becomes the first path segment, matching path-style `LocalStack`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidLocation` if the bucket or region is empty or the
    /// resulting base URL cannot be parsed
    pub fn new(
        bucket: impl Into<String>,
        region: &str,
        endpoint_url: Option<&str>,
    ) -> StorageResult<Self> {
        let bucket = bucket.into();
        if bucket.is_empty() {
            return Err(StorageError::InvalidLocation("bucket name is empty".to_string()));
        }
        if region.is_empty() {
            return Err(StorageError::InvalidLocation("region is empty".to_string()));
        }

        let base = match endpoint_url {
            Some(endpoint) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
            None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
        };

        let base_url = Url::parse(&base)
            .map_err(|e| StorageError::InvalidLocation(format!("{base}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::InvalidLocation(format!(
                "{base} cannot be used as a base URL"
            )));
        }

        Ok(Self { bucket, base_url })
    }

    /// Bucket objects are written to
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public URL of the object stored under `key`
    ///
    /// Pure function of the location and the key. Each `/`-separated segment of the key
    /// is percent-encoded. `.` and `..` segments become `%2E` and `%2E%2E`, S3 keys are
    /// never path-normalized.
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        let encoded = key
            .split('/')
            .map(|segment| match segment {
                "." | ".." => segment.replace('.', "%2E"),
                _ => urlencoding::encode(segment).into_owned(),
            })
            .collect::<Vec<_>>()
            .join("/");

        format!("{}/{encoded}", self.base_url.as_str().trim_end_matches('/'))
    }
}
