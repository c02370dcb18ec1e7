//! Integration tests for the HTTP client functionality.
//!
//! These tests verify request encoding, response decoding, and error
//! handling against a mock server.

use std::time::Duration;

use twitter_login::clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, ResponseBody, FORM_CONTENT_TYPE,
};
use twitter_login::{ConsumerKey, ConsumerSecret, TwitterConfig};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_config() -> TwitterConfig {
    TwitterConfig::builder()
        .consumer_key(ConsumerKey::new("ck").unwrap())
        .consumer_secret(ConsumerSecret::new("cs").unwrap())
        .build()
        .unwrap()
}

// ============================================================================
// Request Encoding
// ============================================================================

#[tokio::test]
async fn test_form_body_and_authorization_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(header("content-type", FORM_CONTENT_TYPE))
        .and(header("authorization", "OAuth oauth_consumer_key=\"ck\""))
        .and(body_string("oauth_verifier=V%20123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oauth_token=T"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&create_config()).unwrap();
    let request = HttpRequest::builder(
        HttpMethod::Post,
        format!("{}/oauth/access_token", server.uri()),
    )
    .authorization("OAuth oauth_consumer_key=\"ck\"")
    .body_param("oauth_verifier", "V 123")
    .build()
    .unwrap();

    let response = client.request(request).await.unwrap();
    assert!(response.is_ok());
}

#[tokio::test]
async fn test_query_params_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/search/tweets.json"))
        .and(query_param("q", "rust lang"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"statuses":[]}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&create_config()).unwrap();
    let request = HttpRequest::builder(
        HttpMethod::Get,
        format!("{}/1.1/search/tweets.json", server.uri()),
    )
    .query_param("q", "rust lang")
    .build()
    .unwrap();

    let response = client.request(request).await.unwrap();
    assert_eq!(
        response.body,
        ResponseBody::Json(serde_json::json!({"statuses": []}))
    );
}

// ============================================================================
// Response Decoding
// ============================================================================

#[tokio::test]
async fn test_response_parsing_rate_limit_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/account/verify_credentials.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"screen_name":"jack"}"#, "application/json;charset=utf-8")
                .insert_header("x-rate-limit-limit", "75")
                .insert_header("x-rate-limit-remaining", "74")
                .insert_header("x-rate-limit-reset", "1700000000")
                .insert_header("x-transaction-id", "abc123"),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&create_config()).unwrap();
    let request = HttpRequest::builder(
        HttpMethod::Get,
        format!("{}/1.1/account/verify_credentials.json", server.uri()),
    )
    .build()
    .unwrap();

    let response = client.request(request).await.unwrap();

    let limit = response.rate_limit.unwrap();
    assert_eq!(limit.limit, 75);
    assert_eq!(limit.remaining, 74);
    assert_eq!(limit.reset_at.timestamp(), 1_700_000_000);
    assert_eq!(response.transaction_id(), Some("abc123"));
    assert_eq!(
        response.body.as_json().and_then(|v| v.get("screen_name")),
        Some(&serde_json::json!("jack"))
    );
}

#[tokio::test]
async fn test_non_json_response_is_decoded_as_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("oauth_token=rt&oauth_token_secret=rs", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&create_config()).unwrap();
    let request = HttpRequest::builder(
        HttpMethod::Post,
        format!("{}/oauth/request_token", server.uri()),
    )
    .build()
    .unwrap();

    let response = client.request(request).await.unwrap();
    let form = response.body.as_form().unwrap();
    assert_eq!(form.get("oauth_token").map(String::as_str), Some("rt"));
    assert_eq!(form.get("oauth_token_secret").map(String::as_str), Some("rs"));
}

// ============================================================================
// Error Handling
// ============================================================================

#[tokio::test]
async fn test_non_2xx_response_produces_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Failed to validate oauth signature"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&create_config()).unwrap();
    let request = HttpRequest::builder(
        HttpMethod::Post,
        format!("{}/oauth/request_token", server.uri()),
    )
    .build()
    .unwrap();

    match client.request(request).await {
        Err(HttpError::Response(error)) => {
            assert_eq!(error.code, 401);
            assert_eq!(error.message, "Failed to validate oauth signature");
        }
        other => panic!("Expected HttpError::Response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_produces_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = TwitterConfig::builder()
        .consumer_key(ConsumerKey::new("ck").unwrap())
        .consumer_secret(ConsumerSecret::new("cs").unwrap())
        .request_timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = HttpClient::new(&config).unwrap();
    let request = HttpRequest::builder(HttpMethod::Get, format!("{}/slow", server.uri()))
        .build()
        .unwrap();

    let result = client.request(request).await;
    match result {
        Err(HttpError::Network(error)) => assert!(error.is_timeout()),
        other => panic!("Expected a timeout, got {other:?}"),
    }
}

#[test]
fn test_http_method_display() {
    assert_eq!(HttpMethod::Get.to_string(), "GET");
    assert_eq!(HttpMethod::Post.to_string(), "POST");
    assert_eq!(HttpMethod::Put.to_string(), "PUT");
    assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
}
