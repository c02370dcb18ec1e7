//! HTTP client types for Twitter API communication.
//!
//! This module provides the transport layer underneath the OAuth token flow.
//! Requests arrive here already signed; the client sends each one exactly
//! once and decodes the response.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client
//! - [`HttpRequest`]: A request to be sent, with query and form parameters
//! - [`HttpResponse`]: A decoded response
//! - [`ResponseBody`]: Form or JSON body, chosen from `Content-Type`
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`RateLimit`]: Values of the `x-rate-limit-*` headers
//!
//! # Error Handling
//!
//! Non-2xx responses surface as [`HttpError::Response`] carrying the status
//! and raw body. Connection failures and timeouts surface as
//! [`HttpError::Network`].

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, FORM_CONTENT_TYPE};
pub use http_response::{HttpResponse, RateLimit, ResponseBody};
