use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::json;

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Build an issuer request body
pub fn create_upload_request(file_name: &str, file_type: &str) -> serde_json::Value {
    json!({
        "fileName": file_name,
        "fileType": file_type
    })
}
