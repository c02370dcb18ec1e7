//! HTTP response types.
//!
//! The OAuth endpoints answer with form-encoded bodies while the REST API
//! answers with JSON, so [`HttpResponse::body`] is a [`ResponseBody`] chosen
//! from the `Content-Type` header.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::auth::oauth::form::{self, FormParams};

/// Rate limit information parsed from the `x-rate-limit-*` headers.
///
/// # Example
///
/// ```rust
/// use twitter_login::clients::RateLimit;
///
/// let limit = RateLimit::parse("75", "74", "1700000000").unwrap();
/// assert_eq!(limit.limit, 75);
/// assert_eq!(limit.remaining, 74);
/// assert_eq!(limit.reset_at.timestamp(), 1_700_000_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed in the current window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the window resets.
    pub reset_at: DateTime<Utc>,
}

impl RateLimit {
    /// Parses the three header values.
    ///
    /// Returns `None` if any value is not a number.
    #[must_use]
    pub fn parse(limit: &str, remaining: &str, reset: &str) -> Option<Self> {
        let limit = limit.trim().parse().ok()?;
        let remaining = remaining.trim().parse().ok()?;
        let reset: i64 = reset.trim().parse().ok()?;
        let reset_at = Utc.timestamp_opt(reset, 0).single()?;

        Some(Self {
            limit,
            remaining,
            reset_at,
        })
    }
}

/// A decoded response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// A JSON document. Unparseable JSON is wrapped as `{"raw_body": "..."}`.
    Json(serde_json::Value),
    /// A form-encoded body, as returned by the OAuth token endpoints.
    Form(FormParams),
}

impl ResponseBody {
    /// Decodes `text` according to `content_type`.
    ///
    /// Anything that is not declared as JSON is decoded as a form body.
    #[must_use]
    pub fn from_text(content_type: Option<&str>, text: &str) -> Self {
        let is_json = content_type.is_some_and(|ct| ct.contains("json"));
        if !is_json {
            return Self::Form(form::decode(text));
        }
        if text.trim().is_empty() {
            return Self::Json(serde_json::json!({}));
        }
        Self::Json(
            serde_json::from_str(text)
                .unwrap_or_else(|_| serde_json::json!({ "raw_body": text })),
        )
    }

    /// Returns the JSON value, if this is a JSON body.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Form(_) => None,
        }
    }

    /// Returns the form parameters, if this is a form body.
    #[must_use]
    pub const fn as_form(&self) -> Option<&FormParams> {
        match self {
            Self::Form(params) => Some(params),
            Self::Json(_) => None,
        }
    }
}

/// An HTTP response.
///
/// Contains the status code, headers, decoded body, and the raw body text.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded body.
    pub body: ResponseBody,
    /// The body text as received.
    pub raw_body: String,
    /// Rate limit information, when all three `x-rate-limit-*` headers are present.
    pub rate_limit: Option<RateLimit>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, decoding the body and rate-limit headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, raw_body: String) -> Self {
        let first = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(String::as_str)
        };

        let body = ResponseBody::from_text(first("content-type"), &raw_body);

        let rate_limit = match (
            first("x-rate-limit-limit"),
            first("x-rate-limit-remaining"),
            first("x-rate-limit-reset"),
        ) {
            (Some(limit), Some(remaining), Some(reset)) => {
                RateLimit::parse(limit, remaining, reset)
            }
            _ => None,
        };

        Self {
            code,
            headers,
            body,
            raw_body,
            rate_limit,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `x-transaction-id` header value, if present.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.headers
            .get("x-transaction-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
