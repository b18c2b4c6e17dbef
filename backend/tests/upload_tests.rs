mod common;

use common::*;

use http::StatusCode;
use serde_json::json;

const UPLOAD_ROUTE: &str = "/api/upload";

// Happy path tests

#[tokio::test]
async fn test_upload_url_happy_path() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(UPLOAD_ROUTE, create_upload_request("list.csv", "text/csv"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let upload_url = body["uploadUrl"].as_str().unwrap();
    assert!(upload_url.starts_with("https://dnc-lists.s3.eu-west-1.amazonaws.com/list.csv?"));
    assert!(upload_url.contains("X-Amz-Signature="));
    assert!(upload_url.contains("X-Amz-Expires=432000"));

    assert_eq!(
        body["fileUrl"],
        "https://dnc-lists.s3.eu-west-1.amazonaws.com/list.csv"
    );
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn test_file_url_is_deterministic() {
    let setup = TestSetup::new();

    let mut file_urls = Vec::new();
    for _ in 0..2 {
        let response = setup
            .send_post_request(UPLOAD_ROUTE, create_upload_request("list.csv", "text/csv"))
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);

        let body = parse_response_body(response).await;
        file_urls.push(body["fileUrl"].as_str().unwrap().to_string());
    }

    assert_eq!(file_urls[0], file_urls[1]);
    assert_eq!(file_urls[0], setup.upload_storage.object_url("list.csv"));
}

#[tokio::test]
async fn test_upload_url_with_other_file_type_is_still_signed_for_csv() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(UPLOAD_ROUTE, create_upload_request("list.txt", "text/plain"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let upload_url = body["uploadUrl"].as_str().unwrap();
    assert!(upload_url.contains("X-Amz-SignedHeaders=content-type%3Bhost"));
    assert_eq!(
        body["fileUrl"],
        "https://dnc-lists.s3.eu-west-1.amazonaws.com/list.txt"
    );
}

#[tokio::test]
async fn test_upload_url_without_file_type() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(UPLOAD_ROUTE, json!({ "fileName": "list.csv" }))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_url_encodes_file_name_in_file_url() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(
            UPLOAD_ROUTE,
            create_upload_request("October list.csv", "text/csv"),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(
        body["fileUrl"],
        "https://dnc-lists.s3.eu-west-1.amazonaws.com/October%20list.csv"
    );
}

#[tokio::test]
async fn test_upload_url_respects_expiry_override() {
    let setup = TestSetup::with_expiry(600);

    let response = setup
        .send_post_request(UPLOAD_ROUTE, create_upload_request("list.csv", "text/csv"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["uploadUrl"]
        .as_str()
        .unwrap()
        .contains("X-Amz-Expires=600"));
}

// Validation error tests

#[tokio::test]
async fn test_upload_url_missing_file_name() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(UPLOAD_ROUTE, json!({ "fileType": "text/csv" }))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_upload_url_empty_file_name() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(UPLOAD_ROUTE, create_upload_request("", "text/csv"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(
        body["message"],
        "fileName must be between 1 and 1024 characters"
    );
}

#[tokio::test]
async fn test_upload_url_file_name_with_leading_slash() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(UPLOAD_ROUTE, create_upload_request("/list.csv", "text/csv"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "fileName must not start with '/'");
}

#[tokio::test]
async fn test_upload_url_file_name_too_long() {
    let setup = TestSetup::new();

    let response = setup
        .send_post_request(
            UPLOAD_ROUTE,
            create_upload_request(&"a".repeat(1025), "text/csv"),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_url_multibyte_file_name_over_key_limit() {
    let setup = TestSetup::new();

    // 600 characters, 1200 bytes
    let response = setup
        .send_post_request(
            UPLOAD_ROUTE,
            create_upload_request(&"é".repeat(600), "text/csv"),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "fileName must be at most 1024 bytes");
}

#[tokio::test]
async fn test_upload_url_rejects_dot_segments() {
    let setup = TestSetup::new();

    for file_name in ["..", "a/../list.csv", "./list.csv"] {
        let response = setup
            .send_post_request(UPLOAD_ROUTE, create_upload_request(file_name, "text/csv"))
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{file_name}");

        let body = parse_response_body(response).await;
        assert_eq!(
            body["message"],
            "fileName must not contain '.' or '..' segments"
        );
    }
}

// Malformed request tests

#[tokio::test]
async fn test_upload_url_invalid_json() {
    let setup = TestSetup::new();

    let response = setup
        .send_raw_post_request(
            UPLOAD_ROUTE,
            Some("application/json"),
            "{ not json".to_string(),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Invalid JSON payload");
}

#[tokio::test]
async fn test_upload_url_missing_content_type() {
    let setup = TestSetup::new();

    let response = setup
        .send_raw_post_request(
            UPLOAD_ROUTE,
            None,
            create_upload_request("list.csv", "text/csv").to_string(),
        )
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(
        body["message"],
        "Missing Content-Type: application/json header"
    );
}

// Signing failure

#[tokio::test]
async fn test_upload_url_signing_failure_returns_generic_message() {
    // SigV4 presigned URLs cannot outlive one week
    let setup = TestSetup::with_expiry(8 * 24 * 60 * 60);

    let response = setup
        .send_post_request(UPLOAD_ROUTE, create_upload_request("list.csv", "text/csv"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = parse_response_body(response).await;
    assert_eq!(body, json!({ "message": "Error generating signed URL" }));
}

#[tokio::test]
async fn test_upload_url_rejects_get() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request(UPLOAD_ROUTE)
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
