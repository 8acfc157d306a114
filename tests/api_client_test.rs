use httpmock::prelude::*;
use portfolio_api::domain::model::ContactFormInput;
use portfolio_api::{ApiClient, PortfolioError};

#[tokio::test]
async fn test_health_decodes_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"message": "Hello World"}));
    });

    // 結尾斜線會被去掉
    let client = ApiClient::new(format!("{}/", server.base_url())).unwrap();
    assert_eq!(client.base_url(), server.base_url());

    let health = client.health().await.unwrap();
    assert_eq!(health.message, "Hello World");
    mock.assert();
}

#[tokio::test]
async fn test_submit_contact_sends_json_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/contact")
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "name": "Alex Johnson",
                "email": "alex@x.com",
                "subject": "Hello there",
                "message": "A message that is long enough."
            }));
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "message": "Thank you for your message! I'll get back to you soon."
        }));
    });

    let client = ApiClient::new(server.base_url()).unwrap();
    let form = ContactFormInput {
        name: Some("Alex Johnson".to_string()),
        email: Some("alex@x.com".to_string()),
        subject: Some("Hello there".to_string()),
        message: Some("A message that is long enough.".to_string()),
    };

    let response = client.submit_contact(&form).await.unwrap();
    assert!(response.success);
    mock.assert();
}

#[tokio::test]
async fn test_non_success_status_keeps_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/contacts");
        then.status(500).json_body(serde_json::json!({
            "success": false,
            "message": "Failed to retrieve contacts"
        }));
    });

    let client = ApiClient::new(server.base_url()).unwrap();
    match client.contacts().await {
        Err(PortfolioError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("Failed to retrieve contacts"));
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/status");
        then.status(200).body("not json");
    });

    let client = ApiClient::new(server.base_url()).unwrap();
    let err = client.status_checks().await.unwrap_err();
    // reqwest 的 decode 失敗仍是 reqwest::Error
    assert!(matches!(err, PortfolioError::ApiError(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_api_error() {
    let client = ApiClient::new("http://127.0.0.1:1").unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, PortfolioError::ApiError(_)));
}
