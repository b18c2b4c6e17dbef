//! Direct writes to storage through issued upload URLs

use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;

use crate::error::SubmissionError;

/// Writes one object through a presigned URL
#[async_trait::async_trait]
pub trait ObjectUploader: Send + Sync {
    /// `PUT`s `bytes` to `upload_url`; any 2xx response is success
    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), SubmissionError>;
}

/// Uploads over plain HTTP, the signature lives in the URL
pub struct PresignedUploader {
    http_client: ClientWithMiddleware,
}

impl PresignedUploader {
    /// Creates an uploader on top of `http_client`
    #[must_use]
    pub const fn new(http_client: ClientWithMiddleware) -> Self {
        Self { http_client }
    }
}

#[async_trait::async_trait]
impl ObjectUploader for PresignedUploader {
    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), SubmissionError> {
        let response = self
            .http_client
            .put(upload_url)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "Failed to upload to S3");

            return Err(SubmissionError::Upload {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(len = bytes.len(), "list file uploaded");
        Ok(())
    }
}
