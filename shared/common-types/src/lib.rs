use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::{Validate, ValidationError};

/// Content type every issued upload URL is signed for
pub const SIGNED_CONTENT_TYPE: &str = "text/csv";

/// Longest S3 object key, in UTF-8 bytes
pub const MAX_OBJECT_KEY_BYTES: usize = 1024;

/// Request body of the upload-URL issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Object name the list is stored under, used verbatim as the S3 key
    #[validate(
        length(
            min = 1,
            max = 1024,
            message = "fileName must be between 1 and 1024 characters"
        ),
        custom(function = "validate_object_key")
    )]
    pub file_name: String,
    /// Content type declared by the uploader
    #[serde(default)]
    #[validate(length(max = 255, message = "fileType must be at most 255 characters"))]
    pub file_type: String,
}

/// Response of the upload-URL issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Presigned URL authorizing one `PUT` of the object
    pub upload_url: String,
    /// Public URL of the object once written
    pub file_url: String,
    /// RFC 3339 timestamp when `upload_url` stops being accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Error body returned by the issuer for every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorMessage {
    /// Human-readable error message
    pub message: String,
}

/// How a DNC list was submitted, as stored in the `Upload Type` column
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UploadType {
    /// A list file, uploaded or referenced by URL
    File,
    /// One email address or domain
    Single,
}

fn validate_object_key(file_name: &str) -> Result<(), ValidationError> {
    if file_name.len() > MAX_OBJECT_KEY_BYTES {
        return Err(ValidationError::new("invalid_file_name")
            .with_message(Cow::Borrowed("fileName must be at most 1024 bytes")));
    }
    if file_name.starts_with('/') {
        return Err(ValidationError::new("invalid_file_name")
            .with_message(Cow::Borrowed("fileName must not start with '/'")));
    }
    if file_name.chars().any(char::is_control) {
        return Err(ValidationError::new("invalid_file_name")
            .with_message(Cow::Borrowed("fileName must not contain control characters")));
    }
    if file_name.split('/').any(|segment| matches!(segment, "." | "..")) {
        return Err(ValidationError::new("invalid_file_name")
            .with_message(Cow::Borrowed("fileName must not contain '.' or '..' segments")));
    }
    Ok(())
}
