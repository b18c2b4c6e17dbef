//! In-memory collaborators that record every call in order

use std::sync::{Arc, Mutex, PoisonError};

use common_types::UploadUrlResponse;
use tokio::sync::Notify;

use crate::{
    airtable::{CreatedRecord, RecordFields, RecordStore},
    error::SubmissionError,
    issuer_api::IssuerApi,
    object_upload::ObjectUploader,
};

/// One call made to a mock collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// Upload URL requested from the issuer
    Issuer {
        /// Requested object name
        file_name: String,
        /// Declared content type
        file_type: String,
    },
    /// Object written to storage
    Upload {
        /// URL the bytes were sent to
        upload_url: String,
        /// Content type of the write
        content_type: String,
        /// Number of bytes written
        len: usize,
    },
    /// Record created
    Record(RecordFields),
}

/// Shared, ordered log of calls across mocks
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<RecordedCall>>>);

impl CallLog {
    fn push(&self, call: RecordedCall) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Calls made so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Forgets all recorded calls
    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Issuer answering with fixed URLs or a fixed refusal
pub struct MockIssuer {
    log: CallLog,
    refusal: Option<String>,
}

impl MockIssuer {
    /// Upload URL handed out on success
    pub const UPLOAD_URL: &'static str =
        "https://dnc-lists.s3.us-east-1.amazonaws.com/list.csv?X-Amz-Signature=mock";
    /// Object URL handed out on success
    pub const FILE_URL: &'static str = "https://dnc-lists.s3.us-east-1.amazonaws.com/list.csv";

    /// Issuer that always authorizes
    #[must_use]
    pub const fn new(log: CallLog) -> Self {
        Self { log, refusal: None }
    }

    /// Issuer that always refuses with `message`
    #[must_use]
    pub fn failing(log: CallLog, message: impl Into<String>) -> Self {
        Self {
            log,
            refusal: Some(message.into()),
        }
    }
}

#[async_trait::async_trait]
impl IssuerApi for MockIssuer {
    async fn request_upload_url(
        &self,
        file_name: &str,
        file_type: &str,
    ) -> Result<UploadUrlResponse, SubmissionError> {
        self.log.push(RecordedCall::Issuer {
            file_name: file_name.to_string(),
            file_type: file_type.to_string(),
        });

        match &self.refusal {
            Some(message) => Err(SubmissionError::Authorization(message.clone())),
            None => Ok(UploadUrlResponse {
                upload_url: Self::UPLOAD_URL.to_string(),
                file_url: Self::FILE_URL.to_string(),
                expires_at: None,
            }),
        }
    }
}

/// Storage accepting every write, or rejecting every write with one status
pub struct MockUploader {
    log: CallLog,
    failure_status: Option<u16>,
}

impl MockUploader {
    /// Storage that accepts every write
    #[must_use]
    pub const fn new(log: CallLog) -> Self {
        Self {
            log,
            failure_status: None,
        }
    }

    /// Storage that answers every write with `status`
    #[must_use]
    pub const fn failing(log: CallLog, status: u16) -> Self {
        Self {
            log,
            failure_status: Some(status),
        }
    }
}

#[async_trait::async_trait]
impl ObjectUploader for MockUploader {
    async fn put_object(
        &self,
        upload_url: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), SubmissionError> {
        self.log.push(RecordedCall::Upload {
            upload_url: upload_url.to_string(),
            content_type: content_type.to_string(),
            len: bytes.len(),
        });

        match self.failure_status {
            Some(status) => Err(SubmissionError::Upload {
                status,
                body: "<Error><Code>SignatureDoesNotMatch</Code></Error>".to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Record store that can fail or hold each call until released
pub struct MockRecordStore {
    log: CallLog,
    failure_status: Option<u16>,
    gate: Option<Arc<Notify>>,
}

impl MockRecordStore {
    /// Record store that creates every record
    #[must_use]
    pub const fn new(log: CallLog) -> Self {
        Self {
            log,
            failure_status: None,
            gate: None,
        }
    }

    /// Record store that answers every call with `status`
    #[must_use]
    pub const fn failing(log: CallLog, status: u16) -> Self {
        Self {
            log,
            failure_status: Some(status),
            gate: None,
        }
    }

    /// Record store whose calls wait for a `notify_one` on `gate` before answering
    #[must_use]
    pub const fn gated(log: CallLog, gate: Arc<Notify>) -> Self {
        Self {
            log,
            failure_status: None,
            gate: Some(gate),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for MockRecordStore {
    async fn create_record(&self, fields: &RecordFields) -> Result<CreatedRecord, SubmissionError> {
        self.log.push(RecordedCall::Record(fields.clone()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match self.failure_status {
            Some(status) => Err(SubmissionError::Record {
                status,
                body: r#"{"error":{"type":"INVALID_PERMISSIONS"}}"#.to_string(),
            }),
            None => Ok(CreatedRecord {
                id: format!("rec{}", self.log.calls().len()),
                created_time: None,
            }),
        }
    }
}
