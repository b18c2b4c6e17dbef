//! End-to-end submission: authorize, upload, record

use std::sync::Arc;

use crate::{
    airtable::{AirtableClient, CreatedRecord, RecordStore},
    config::ClientConfig,
    error::SubmissionError,
    http::build_http_client,
    issuer_api::{IssuerApi, IssuerApiClient},
    object_upload::{ObjectUploader, PresignedUploader},
    submission::{LocalFile, Submission},
};

/// Outcome of a completed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Identifier of the created record
    pub record_id: String,
    /// Object URL of the uploaded list, if one was uploaded
    pub file_url: Option<String>,
}

/// Step a running submission has entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    /// Requesting an upload URL and writing the list file
    Uploading,
    /// Creating the record
    Recording,
}

/// Runs submissions against the issuer, storage and the record store
///
/// Calls happen strictly in sequence and at most once each per submission.
#[derive(Clone)]
pub struct SubmissionClient {
    issuer: Arc<dyn IssuerApi>,
    uploader: Arc<dyn ObjectUploader>,
    records: Arc<dyn RecordStore>,
}

impl SubmissionClient {
    /// Creates a client from its three collaborators
    #[must_use]
    pub fn new(
        issuer: Arc<dyn IssuerApi>,
        uploader: Arc<dyn ObjectUploader>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            issuer,
            uploader,
            records,
        }
    }

    /// Creates HTTP-backed collaborators sharing one connection pool
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Config` if an endpoint URL cannot be built or the
    /// HTTP client cannot be created
    pub fn from_config(config: &ClientConfig) -> Result<Self, SubmissionError> {
        let http_client = build_http_client()?;

        let issuer = IssuerApiClient::new(config.upload_endpoint()?, http_client.clone());
        let uploader = PresignedUploader::new(http_client.clone());
        let records = AirtableClient::new(&config.airtable, http_client)?;

        Ok(Self::new(
            Arc::new(issuer),
            Arc::new(uploader),
            Arc::new(records),
        ))
    }

    async fn upload_file(&self, file: &LocalFile) -> Result<String, SubmissionError> {
        let authorization = self
            .issuer
            .request_upload_url(file.name(), file.content_type())
            .await?;

        self.uploader
            .put_object(&authorization.upload_url, file.content_type(), file.bytes())
            .await?;

        tracing::info!(file_url = %authorization.file_url, "list file stored");
        Ok(authorization.file_url)
    }

    async fn create_record(
        &self,
        submission: &Submission,
        uploaded_file_url: Option<&str>,
    ) -> Result<CreatedRecord, SubmissionError> {
        let fields = submission.record_fields(uploaded_file_url);
        self.records.create_record(&fields).await
    }

    /// Uploads the file if needed, then creates the record
    ///
    /// A failed upload aborts before any record is created.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_with_progress`]
    pub async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, SubmissionError> {
        self.submit_with_progress(submission, |_| {}).await
    }

    /// Same as [`Self::submit`], calling `on_stage` as each step starts
    ///
    /// Single entries and externally hosted files skip `Uploading`.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Authorization` if the issuer refuses, `Upload` if storage
    /// rejects the write, `Record` if the record store answers non-2xx, `Transport` if
    /// a call fails on the wire
    pub async fn submit_with_progress(
        &self,
        submission: &Submission,
        mut on_stage: impl FnMut(SubmissionStage) + Send,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let file_url = match submission.file_to_upload() {
            Some(file) => {
                on_stage(SubmissionStage::Uploading);
                Some(self.upload_file(file).await?)
            }
            None => None,
        };

        on_stage(SubmissionStage::Recording);
        let record = self.create_record(submission, file_url.as_deref()).await?;

        Ok(SubmissionReceipt {
            record_id: record.id,
            file_url,
        })
    }
}
