//! Submission client configuration

use std::fmt;

use url::Url;

use crate::error::SubmissionError;

/// Airtable REST API root
pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

/// Issuer the client talks to when none is configured
pub const DEFAULT_ISSUER_URL: &str = "http://localhost:8001";

/// Everything the client needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the upload-URL issuer
    pub issuer_url: Url,
    /// Target table for submission records
    pub airtable: AirtableConfig,
}

/// Airtable credentials and the table submissions are recorded in
#[derive(Clone)]
pub struct AirtableConfig {
    /// API root, `https://api.airtable.com/v0` in production
    pub api_url: Url,
    /// Personal access token sent as a bearer token
    pub api_key: String,
    /// Base identifier (`app...`)
    pub base_id: String,
    /// Table name or identifier
    pub table_name: String,
}

impl AirtableConfig {
    /// Collection endpoint records are created at: `{api_url}/{base_id}/{table_name}`
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Config` if an identifier is empty or the API URL
    /// cannot be used as a base
    pub fn records_url(&self) -> Result<Url, SubmissionError> {
        if self.base_id.is_empty() || self.table_name.is_empty() {
            return Err(SubmissionError::Config(
                "Airtable base id and table name are required".to_string(),
            ));
        }

        join_segments(&self.api_url, &[&self.base_id, &self.table_name])
    }
}

// The API key never ends up in logs
impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl ClientConfig {
    /// Issuer endpoint: `{issuer_url}/api/upload`
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Config` if the issuer URL cannot be used as a base
    pub fn upload_endpoint(&self) -> Result<Url, SubmissionError> {
        join_segments(&self.issuer_url, &["api", "upload"])
    }
}

/// Appends percent-encoded path segments to `base`
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, SubmissionError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SubmissionError::Config(format!("{base} cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airtable(api_url: &str, table_name: &str) -> AirtableConfig {
        AirtableConfig {
            api_url: Url::parse(api_url).unwrap(),
            api_key: "patSECRET".to_string(),
            base_id: "appBASE".to_string(),
            table_name: table_name.to_string(),
        }
    }

    #[test]
    fn test_records_url() {
        let url = airtable(DEFAULT_AIRTABLE_API_URL, "DNC")
            .records_url()
            .unwrap();
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appBASE/DNC");
    }

    #[test]
    fn test_records_url_encodes_table_name() {
        let url = airtable("https://api.airtable.com/v0/", "DNC Lists")
            .records_url()
            .unwrap();
        assert_eq!(url.as_str(), "https://api.airtable.com/v0/appBASE/DNC%20Lists");
    }

    #[test]
    fn test_records_url_requires_identifiers() {
        let result = airtable(DEFAULT_AIRTABLE_API_URL, "").records_url();
        assert!(matches!(result, Err(SubmissionError::Config(_))));
    }

    #[test]
    fn test_upload_endpoint() {
        let config = ClientConfig {
            issuer_url: Url::parse("http://localhost:8001").unwrap(),
            airtable: airtable(DEFAULT_AIRTABLE_API_URL, "DNC"),
        };
        assert_eq!(
            config.upload_endpoint().unwrap().as_str(),
            "http://localhost:8001/api/upload"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", airtable(DEFAULT_AIRTABLE_API_URL, "DNC"));
        assert!(!debug.contains("patSECRET"));
        assert!(debug.contains("<redacted>"));
    }
}
