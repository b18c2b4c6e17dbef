//! Client for the upload-URL issuer

use common_types::{ErrorMessage, UploadUrlRequest, UploadUrlResponse};
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use crate::error::SubmissionError;

/// Trait for the upload-URL issuer
#[async_trait::async_trait]
pub trait IssuerApi: Send + Sync {
    /// Requests a one-time upload URL for an object named `file_name`
    async fn request_upload_url(
        &self,
        file_name: &str,
        file_type: &str,
    ) -> Result<UploadUrlResponse, SubmissionError>;
}

/// HTTP client to the issuer's `POST /api/upload` endpoint
pub struct IssuerApiClient {
    upload_endpoint: Url,
    http_client: ClientWithMiddleware,
}

impl IssuerApiClient {
    /// Creates a client posting to `upload_endpoint`
    #[must_use]
    pub const fn new(upload_endpoint: Url, http_client: ClientWithMiddleware) -> Self {
        Self {
            upload_endpoint,
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl IssuerApi for IssuerApiClient {
    async fn request_upload_url(
        &self,
        file_name: &str,
        file_type: &str,
    ) -> Result<UploadUrlResponse, SubmissionError> {
        let request = UploadUrlRequest {
            file_name: file_name.to_string(),
            file_type: file_type.to_string(),
        };
        let json_body = serde_json::to_string(&request)
            .map_err(|e| SubmissionError::Config(format!("Failed to serialize request: {e}")))?;

        let response = self
            .http_client
            .post(self.upload_endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The issuer answers `{ message }`, anything else is passed through as is
            let message = serde_json::from_str::<ErrorMessage>(&body)
                .map(|error| error.message)
                .unwrap_or(body);
            tracing::error!(status = status.as_u16(), %message, "issuer refused upload URL");

            return Err(SubmissionError::Authorization(message));
        }

        Ok(response.json::<UploadUrlResponse>().await?)
    }
}
