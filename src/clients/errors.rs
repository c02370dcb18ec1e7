//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: the server answered with a non-2xx status
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: unified error type for all of the above plus network failures
//!
//! Requests are attempted exactly once; retry policy belongs to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_login::clients::{HttpClient, HttpError};
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {:?}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use twitter_login::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 401,
///     message: r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#.to_string(),
/// };
///
/// assert!(error.to_string().contains("401"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The raw response body.
    pub message: String,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request URL is empty.
    #[error("Cannot send a request without a URL.")]
    EmptyUrl,

    /// A body was attached to a method that does not carry one.
    #[error("Cannot send a body with {method}.")]
    BodyNotAllowed {
        /// The HTTP method that rejected the body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error, including timeouts.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
