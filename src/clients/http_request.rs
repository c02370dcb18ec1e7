//! HTTP request types.
//!
//! This module provides the [`HttpRequest`] type and its builder. Query and
//! body parameters are kept as [`FormParams`] so the exact set that is sent
//! is also the set the OAuth signer sees.

use std::fmt;

use crate::auth::oauth::form::FormParams;
use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the Twitter REST and OAuth endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and the OAuth token endpoints.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the uppercase method name used on the wire and in signature base strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` if a request body may be attached.
    #[must_use]
    pub const fn allows_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content type of form bodies.
///
/// Bodies are URL-encoded rather than `multipart/form-data` so their
/// parameters are covered by the OAuth 1.0a signature base string.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An HTTP request.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use twitter_login::clients::{HttpRequest, HttpMethod};
///
/// let request = HttpRequest::builder(HttpMethod::Post, "https://api.twitter.com/oauth/access_token")
///     .body_param("oauth_verifier", "V123")
///     .authorization("OAuth oauth_consumer_key=\"ck\"")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.full_url(), "https://api.twitter.com/oauth/access_token");
/// assert_eq!(request.encoded_body().as_deref(), Some("oauth_verifier=V123"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute URL, without query parameters.
    pub url: String,
    /// Query parameters appended to the URL.
    pub query: FormParams,
    /// Form body parameters, if any.
    pub body: Option<FormParams>,
    /// The `Authorization` header value, if the request is signed.
    pub authorization: Option<String>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `url` is empty
    /// - a body is attached to a `GET` or `DELETE`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.url.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyUrl);
        }

        if self.body.is_some() && !self.http_method.allows_body() {
            return Err(InvalidHttpRequestError::BodyNotAllowed {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }

    /// Returns the URL with the encoded query string appended.
    #[must_use]
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}{}",
            self.url,
            crate::auth::oauth::form::encode(&self.query)
        )
    }

    /// Returns the form-encoded body, if any.
    #[must_use]
    pub fn encoded_body(&self) -> Option<String> {
        self.body.as_ref().map(crate::auth::oauth::form::encode)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    url: String,
    query: FormParams,
    body: Option<FormParams>,
    authorization: Option<String>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            http_method: method,
            url: url.into(),
            query: FormParams::new(),
            body: None,
            authorization: None,
        }
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: FormParams) -> Self {
        self.query = query;
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets the form body.
    #[must_use]
    pub fn body(mut self, body: FormParams) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a single form body parameter.
    #[must_use]
    pub fn body_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body
            .get_or_insert_with(FormParams::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the `Authorization` header value.
    #[must_use]
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Builds the request, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if validation fails.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            url: self.url,
            query: self.query,
            body: self.body,
            authorization: self.authorization,
        };
        request.verify()?;
        Ok(request)
    }
}
