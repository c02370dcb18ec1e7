//! Credential pairs used to sign OAuth 1.0a requests.
//!
//! - [`ConsumerCredentials`]: the app's key and secret, fixed for the lifetime
//!   of a [`TwitterConfig`](crate::TwitterConfig)
//! - [`TokenCredentials`]: a token and its secret; during login this is the
//!   short-lived request token
//! - [`AccessToken`]: the durable credential pair handed to the caller once
//!   login succeeds
//!
//! Secrets are masked in every `Debug` implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::oauth::form::FormParams;
use crate::auth::oauth::ParseError;

/// The registered app's consumer key and secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerCredentials {
    key: String,
    secret: String,
}

impl ConsumerCredentials {
    /// Creates a consumer credential pair.
    ///
    /// No validation happens here; the signer rejects empty values.
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Returns the consumer key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the consumer secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("key", &self.key)
            .field("secret", &"*****")
            .finish()
    }
}

/// A token and its secret.
///
/// Produced by the request-token step and used read-only to sign the
/// access-token exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenCredentials {
    token: String,
    token_secret: String,
}

impl TokenCredentials {
    /// Creates a token credential pair.
    #[must_use]
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }

    /// Returns the token (`oauth_token`).
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the token secret (`oauth_token_secret`).
    #[must_use]
    pub fn token_secret(&self) -> &str {
        &self.token_secret
    }

    /// Reads `oauth_token` and `oauth_token_secret` out of a form-encoded response.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] if either field is absent or empty.
    pub fn from_form(params: &FormParams) -> Result<Self, ParseError> {
        Ok(Self::new(
            required_field(params, "oauth_token")?,
            required_field(params, "oauth_token_secret")?,
        ))
    }
}

impl fmt::Debug for TokenCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCredentials")
            .field("token", &self.token)
            .field("token_secret", &"*****")
            .finish()
    }
}

impl From<&AccessToken> for TokenCredentials {
    fn from(token: &AccessToken) -> Self {
        Self::new(&token.oauth_token, &token.oauth_token_secret)
    }
}

/// The access token returned at the end of a successful login.
///
/// Ownership passes to the caller, who decides whether and where to persist it.
///
/// # Example
///
/// ```rust
/// use twitter_login::AccessToken;
///
/// let token = AccessToken::new("T", "S");
/// let json = serde_json::to_string(&token).unwrap();
/// assert!(json.contains("\"oauth_token\":\"T\""));
/// assert!(!format!("{:?}", token).contains("\"S\""));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The access token.
    pub oauth_token: String,

    /// The access token secret.
    pub oauth_token_secret: String,

    /// The numeric ID of the user who authorized the app, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// The screen name of the user who authorized the app, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
}

impl AccessToken {
    /// Creates an access token from its two required parts.
    #[must_use]
    pub fn new(oauth_token: impl Into<String>, oauth_token_secret: impl Into<String>) -> Self {
        Self {
            oauth_token: oauth_token.into(),
            oauth_token_secret: oauth_token_secret.into(),
            user_id: None,
            screen_name: None,
        }
    }

    /// Reads an access token out of a form-encoded access-token response.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] if `oauth_token` or
    /// `oauth_token_secret` is absent or empty.
    pub fn from_form(params: &FormParams) -> Result<Self, ParseError> {
        Ok(Self {
            oauth_token: required_field(params, "oauth_token")?,
            oauth_token_secret: required_field(params, "oauth_token_secret")?,
            user_id: params.get("user_id").filter(|v| !v.is_empty()).cloned(),
            screen_name: params.get("screen_name").filter(|v| !v.is_empty()).cloned(),
        })
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("oauth_token", &self.oauth_token)
            .field("oauth_token_secret", &"*****")
            .field("user_id", &self.user_id)
            .field("screen_name", &self.screen_name)
            .finish()
    }
}

fn required_field(params: &FormParams, field: &'static str) -> Result<String, ParseError> {
    params
        .get(field)
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or(ParseError::MissingField { field })
}

// Verify credential types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConsumerCredentials>();
    assert_send_sync::<TokenCredentials>();
    assert_send_sync::<AccessToken>();
};
