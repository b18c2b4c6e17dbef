use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::error::SubmissionError;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// Builds the HTTP client shared by the issuer, storage and Airtable clients
pub fn build_http_client() -> Result<ClientWithMiddleware, SubmissionError> {
    let reqwest_client = Client::builder()
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
        .user_agent(format!("dnc-submission-client/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SubmissionError::Config(format!("Failed to create HTTP client: {e}")))?;

    Ok(ClientBuilder::new(reqwest_client)
        .with(TracingMiddleware::default())
        .build())
}
