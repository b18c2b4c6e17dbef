mod common;

use backend::types::Environment;
use common::*;

use http::StatusCode;

#[tokio::test]
async fn test_health_endpoint() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/health")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["semver"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_openapi_schema_in_development() {
    let setup = TestSetup::new();

    let response = setup
        .send_get_request("/openapi.json")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert!(body["paths"]["/api/upload"]["post"].is_object());
}

#[tokio::test]
async fn test_openapi_schema_hidden_in_production() {
    let setup = TestSetup::with_environment(Environment::Production, FIVE_DAYS_SECS);

    let response = setup
        .send_get_request("/openapi.json")
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
