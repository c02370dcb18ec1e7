//! HTTP client for Twitter API communication.
//!
//! This module provides the [`HttpClient`] type that sends [`HttpRequest`]s
//! and decodes their responses. Signing happens before a request reaches the
//! client; the client only transports it.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest, FORM_CONTENT_TYPE};
use crate::clients::http_response::HttpResponse;
use crate::config::TwitterConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Twitter API.
///
/// The client handles:
/// - Default headers including User-Agent
/// - Request timeouts from [`TwitterConfig::request_timeout`]
/// - Decoding of form and JSON response bodies
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use twitter_login::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Post, config.request_token_url())
///     .authorization(header.to_string())
///     .build()?;
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (for example, TLS initialization failure).
    pub fn new(config: &TwitterConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Twitter Login Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request once and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error or timeout occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = crate::auth::oauth::percent::escape_uri(&request.full_url());

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string());
        }
        if let Some(authorization) = &request.authorization {
            headers.insert("Authorization".to_string(), authorization.clone());
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.encoded_body() {
            req_builder = req_builder.body(body);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let response = HttpResponse::new(code, res_headers, body_text);

        if let Some(limit) = response.rate_limit {
            if limit.remaining == 0 {
                tracing::warn!(
                    "Rate limit exhausted for {} {}, resets at {}",
                    request.http_method,
                    request.url,
                    limit.reset_at
                );
            }
        }

        if response.is_ok() {
            return Ok(response);
        }

        tracing::debug!(
            status = code,
            transaction_id = response.transaction_id(),
            "{} {} failed",
            request.http_method,
            request.url
        );

        Err(HttpError::Response(HttpResponseError {
            code,
            message: response.raw_body,
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
