//! Airtable record creation

use common_types::UploadType;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{config::AirtableConfig, error::SubmissionError};

/// Columns of one submission row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFields {
    /// Login email of the person submitting
    #[serde(rename = "Email")]
    pub email: String,
    /// `file` or `single`
    #[serde(rename = "Upload Type")]
    pub upload_type: UploadType,
    /// Object URL of an uploaded list, `null` otherwise
    #[serde(rename = "File")]
    pub file: Option<String>,
    /// URL of an externally hosted list, omitted otherwise
    #[serde(rename = "File URL", skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// The single entry, `null` for file submissions
    #[serde(rename = "DNC Mail")]
    pub dnc_mail: Option<String>,
    /// Whether the submitter confirmed the list contents
    #[serde(rename = "Confirmed")]
    pub confirmed: bool,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    fields: &'a RecordFields,
}

/// Record returned by Airtable after creation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRecord {
    /// Record identifier (`rec...`)
    pub id: String,
    /// Creation timestamp as reported by Airtable
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
}

/// Creates one record per submission
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates one record holding `fields`
    async fn create_record(&self, fields: &RecordFields) -> Result<CreatedRecord, SubmissionError>;
}

/// Airtable REST API client for a single table
pub struct AirtableClient {
    records_url: Url,
    api_key: String,
    http_client: ClientWithMiddleware,
}

impl AirtableClient {
    /// Creates a client for the table described by `config`
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Config` if the records URL cannot be built
    pub fn new(
        config: &AirtableConfig,
        http_client: ClientWithMiddleware,
    ) -> Result<Self, SubmissionError> {
        Ok(Self {
            records_url: config.records_url()?,
            api_key: config.api_key.clone(),
            http_client,
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for AirtableClient {
    async fn create_record(&self, fields: &RecordFields) -> Result<CreatedRecord, SubmissionError> {
        let json_body = serde_json::to_string(&CreateRecordRequest { fields })
            .map_err(|e| SubmissionError::Config(format!("Failed to serialize record: {e}")))?;

        let response = self
            .http_client
            .post(self.records_url.clone())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = status.as_u16(), %body, "Airtable rejected the record");

            return Err(SubmissionError::Record {
                status: status.as_u16(),
                body,
            });
        }

        let record = response.json::<CreatedRecord>().await?;
        tracing::info!(record_id = %record.id, "Airtable record created");

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_entry_record_body() {
        let fields = RecordFields {
            email: "a@b.com".to_string(),
            upload_type: UploadType::Single,
            file: None,
            file_url: None,
            dnc_mail: Some("spam@x.com".to_string()),
            confirmed: false,
        };

        let body = serde_json::to_value(CreateRecordRequest { fields: &fields }).unwrap();
        assert_eq!(
            body,
            json!({
                "fields": {
                    "Email": "a@b.com",
                    "Upload Type": "single",
                    "File": null,
                    "DNC Mail": "spam@x.com",
                    "Confirmed": false
                }
            })
        );
    }

    #[test]
    fn test_external_url_record_body() {
        let fields = RecordFields {
            email: "a@b.com".to_string(),
            upload_type: UploadType::File,
            file: None,
            file_url: Some("https://host/list.csv".to_string()),
            dnc_mail: None,
            confirmed: true,
        };

        let body = serde_json::to_value(CreateRecordRequest { fields: &fields }).unwrap();
        assert_eq!(body["fields"]["File URL"], "https://host/list.csv");
        assert_eq!(body["fields"]["Upload Type"], "file");
        assert_eq!(body["fields"]["Confirmed"], true);
    }

    #[test]
    fn test_created_record_parses_airtable_response() {
        let record: CreatedRecord = serde_json::from_value(json!({
            "id": "rec123",
            "createdTime": "2026-10-18T10:00:00.000Z",
            "fields": { "Email": "a@b.com" }
        }))
        .unwrap();

        assert_eq!(record.id, "rec123");
        assert_eq!(record.created_time.as_deref(), Some("2026-10-18T10:00:00.000Z"));
    }
}
