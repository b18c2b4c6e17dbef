use std::sync::Arc;

use axum::{Extension, Json};
use common_types::{UploadUrlRequest, UploadUrlResponse, SIGNED_CONTENT_TYPE};
use tracing::instrument;

use crate::{
    types::{AppError, ValidatedJson},
    upload_storage::UploadStorage,
};

/// Issues a presigned URL for uploading a DNC list file to S3
///
/// The caller is not authenticated; the URL is signed with the process's own AWS
/// credentials. The response carries:
/// - `uploadUrl`: presigned URL accepting one `PUT` with `Content-Type: text/csv`
/// - `fileUrl`: public URL of the object once written, derived from bucket, region
///   and `fileName` only
/// - `expiresAt`: RFC 3339 timestamp when `uploadUrl` expires
///
/// # Errors
///
/// - `400` with `{ message }` when the payload is malformed or `fileName` is invalid
/// - `500` with `{ message: "Error generating signed URL" }` when signing fails
#[instrument(skip_all)]
pub async fn create_upload_url(
    Extension(upload_storage): Extension<Arc<UploadStorage>>,
    ValidatedJson(payload): ValidatedJson<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    tracing::info!(file_name = %payload.file_name, "issuing upload URL");

    if payload.file_type != SIGNED_CONTENT_TYPE {
        tracing::warn!(
            file_type = %payload.file_type,
            "declared file type differs from the signed content type {SIGNED_CONTENT_TYPE}"
        );
    }

    let presigned = upload_storage.presign_upload(&payload.file_name).await?;

    tracing::info!(file_url = %presigned.file_url, "upload URL issued");

    Ok(Json(UploadUrlResponse {
        upload_url: presigned.upload_url,
        file_url: presigned.file_url,
        expires_at: Some(presigned.expires_at.to_rfc3339()),
    }))
}
