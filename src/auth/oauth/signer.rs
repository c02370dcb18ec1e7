//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! This module turns an [`AuthorizationRequest`] into the value of an
//! `Authorization: OAuth ...` header, following RFC 5849 §3.4:
//!
//! 1. Collect the protocol parameters (`oauth_consumer_key`, `oauth_nonce`,
//!    `oauth_signature_method`, `oauth_timestamp`, `oauth_token`,
//!    `oauth_version`, plus extras such as `oauth_callback`).
//! 2. Merge them with the request's query/body parameters.
//! 3. Encode every key and value, sort by key then value, join with `&`.
//! 4. Build the base string `METHOD&encode(url)&encode(parameters)`.
//! 5. Build the key `encode(consumer_secret)&encode(token_secret)`.
//! 6. Sign with HMAC-SHA1 and base64-encode the digest.
//! 7. Emit the protocol parameters and signature as `key="value"` pairs.
//!
//! The base string is rebuilt on every call and nothing is cached.
//!
//! # Example
//!
//! ```rust
//! use twitter_login::auth::oauth::{sign, AuthorizationRequest};
//! use twitter_login::auth::ConsumerCredentials;
//! use twitter_login::clients::HttpMethod;
//!
//! let consumer = ConsumerCredentials::new("ck", "cs");
//! let request = AuthorizationRequest::new(
//!     HttpMethod::Post,
//!     "https://api.twitter.com/oauth/request_token",
//!     &consumer,
//! )
//! .protocol_param("oauth_callback", "myapp://cb");
//!
//! let header = sign(&request, Some("abc123"), Some(1_000_000_000)).unwrap();
//! assert!(header.as_ref().starts_with("OAuth oauth_callback=\"myapp%3A%2F%2Fcb\""));
//! assert_eq!(header, sign(&request, Some("abc123"), Some(1_000_000_000)).unwrap());
//! ```

use std::fmt;

use base64::prelude::*;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::auth::credentials::{ConsumerCredentials, TokenCredentials};
use crate::auth::oauth::form::{self, FormParams};
use crate::auth::oauth::percent;
use crate::auth::oauth::SigningError;
use crate::clients::HttpMethod;

type HmacSha1 = Hmac<Sha1>;

/// Value of `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Value of `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

/// Length of generated nonces.
const NONCE_LENGTH: usize = 32;

/// Input to the signer.
///
/// Built per request and dropped once the header exists.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest<'a> {
    method: HttpMethod,
    url: &'a str,
    params: FormParams,
    protocol_params: FormParams,
    consumer: &'a ConsumerCredentials,
    token: Option<&'a TokenCredentials>,
}

impl<'a> AuthorizationRequest<'a> {
    /// Creates a request signed with the consumer credentials only.
    #[must_use]
    pub fn new(method: HttpMethod, url: &'a str, consumer: &'a ConsumerCredentials) -> Self {
        Self {
            method,
            url,
            params: FormParams::new(),
            protocol_params: FormParams::new(),
            consumer,
            token: None,
        }
    }

    /// Adds query or form-body parameters. They are signed but not sent in the header.
    #[must_use]
    pub fn params(mut self, params: &FormParams) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Adds a single query or form-body parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Adds an `oauth_*` parameter that travels in the `Authorization` header.
    #[must_use]
    pub fn protocol_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.protocol_params.insert(key.into(), value.into());
        self
    }

    /// Signs with token credentials in addition to the consumer credentials.
    #[must_use]
    pub const fn token(mut self, token: &'a TokenCredentials) -> Self {
        self.token = Some(token);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the request URL.
    #[must_use]
    pub const fn url(&self) -> &str {
        self.url
    }

    /// Returns the query or form-body parameters, without the protocol parameters.
    #[must_use]
    pub const fn request_params(&self) -> &FormParams {
        &self.params
    }
}

/// A complete `Authorization` header value, e.g. `OAuth oauth_consumer_key="..", ...`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    value: String,
    signature: String,
}

impl AuthorizationHeader {
    /// Returns the base64 `oauth_signature`, before percent-encoding.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl AsRef<str> for AuthorizationHeader {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Debug for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationHeader(OAuth *****)")
    }
}

/// Signs `request` and returns the `Authorization` header value.
///
/// `nonce` and `timestamp` default to a fresh random nonce and the current
/// Unix time. With both fixed, the output is reproducible byte for byte.
///
/// # Errors
///
/// Returns [`SigningError`] if the consumer key or secret is empty.
pub fn sign(
    request: &AuthorizationRequest<'_>,
    nonce: Option<&str>,
    timestamp: Option<i64>,
) -> Result<AuthorizationHeader, SigningError> {
    let nonce = nonce.map_or_else(generate_nonce, str::to_string);
    let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());

    let mut protocol = protocol_params(request, &nonce, timestamp)?;
    let base_string = build_base_string(request, &protocol);
    let signature = compute_signature(&signing_key(request), &base_string);

    tracing::trace!(
        method = request.method.as_str(),
        url = base_url(request.url),
        "signed OAuth request"
    );

    protocol.insert("oauth_signature".to_string(), signature.clone());
    let header = sorted_encoded(protocol.iter())
        .into_iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(AuthorizationHeader {
        value: format!("OAuth {header}"),
        signature,
    })
}

/// Returns the signature base string `sign` would produce for these inputs.
///
/// # Errors
///
/// Returns [`SigningError`] if the consumer key or secret is empty.
pub fn signature_base_string(
    request: &AuthorizationRequest<'_>,
    nonce: &str,
    timestamp: i64,
) -> Result<String, SigningError> {
    let protocol = protocol_params(request, nonce, timestamp)?;
    Ok(build_base_string(request, &protocol))
}

/// Computes the base64 HMAC-SHA1 of `message` under `key`.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(key: &str, message: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

fn protocol_params(
    request: &AuthorizationRequest<'_>,
    nonce: &str,
    timestamp: i64,
) -> Result<FormParams, SigningError> {
    if request.consumer.key().is_empty() {
        return Err(SigningError::EmptyConsumerKey);
    }
    if request.consumer.secret().is_empty() {
        return Err(SigningError::EmptyConsumerSecret);
    }

    let mut params = request.protocol_params.clone();
    params.insert(
        "oauth_consumer_key".to_string(),
        request.consumer.key().to_string(),
    );
    params.insert("oauth_nonce".to_string(), nonce.to_string());
    params.insert(
        "oauth_signature_method".to_string(),
        SIGNATURE_METHOD.to_string(),
    );
    params.insert("oauth_timestamp".to_string(), timestamp.to_string());
    if let Some(token) = request.token {
        params.insert("oauth_token".to_string(), token.token().to_string());
    }
    params.insert("oauth_version".to_string(), OAUTH_VERSION.to_string());
    Ok(params)
}

fn build_base_string(request: &AuthorizationRequest<'_>, protocol: &FormParams) -> String {
    let url_query = request
        .url
        .split_once('?')
        .map(|(_, query)| query.split('#').next().unwrap_or_default())
        .map(form::decode)
        .unwrap_or_default();

    let all = protocol
        .iter()
        .chain(request.params.iter())
        .chain(url_query.iter());
    let parameter_string = sorted_encoded(all)
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        request.method.as_str(),
        percent::encode(base_url(request.url)),
        percent::encode(&parameter_string)
    )
}

fn signing_key(request: &AuthorizationRequest<'_>) -> String {
    format!(
        "{}&{}",
        percent::encode(request.consumer.secret()),
        percent::encode(request.token.map_or("", TokenCredentials::token_secret))
    )
}

/// Encodes each pair and sorts by encoded key, then encoded value.
fn sorted_encoded<'a, I>(pairs: I) -> Vec<(String, String)>
where
    I: Iterator<Item = (&'a String, &'a String)>,
{
    let mut encoded: Vec<(String, String)> = pairs
        .map(|(k, v)| (percent::encode(k), percent::encode(v)))
        .collect();
    encoded.sort();
    encoded
}

/// Strips the query string and fragment.
fn base_url(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}
