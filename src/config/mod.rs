//! Configuration types for the Twitter login SDK.
//!
//! This module provides the core configuration types used to initialize
//! the OAuth 1.0a flow.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`TwitterConfig`]: The main configuration struct holding all SDK settings
//! - [`TwitterConfigBuilder`]: A builder for constructing [`TwitterConfig`] instances
//! - [`ConsumerKey`]: A validated consumer key newtype
//! - [`ConsumerSecret`]: A validated consumer secret newtype with masked debug output
//! - [`HostUrl`]: A validated API host URL
//! - [`CallbackUrl`]: A validated OAuth callback URL
//!
//! # Example
//!
//! ```rust
//! use twitter_login::{TwitterConfig, ConsumerKey, ConsumerSecret};
//!
//! let config = TwitterConfig::builder()
//!     .consumer_key(ConsumerKey::new("my-consumer-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("my-consumer-secret").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_host().as_ref(), "https://api.twitter.com");
//! ```

mod newtypes;

pub use newtypes::{CallbackUrl, ConsumerKey, ConsumerSecret, HostUrl};

use std::time::Duration;

use crate::auth::ConsumerCredentials;
use crate::error::ConfigError;

/// Path of the request-token endpoint.
pub const REQUEST_TOKEN_PATH: &str = "/oauth/request_token";

/// Path of the user authorization endpoint.
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";

/// Path of the access-token endpoint.
pub const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

/// Base path of the v1.1 REST API.
pub const REST_API_PATH: &str = "/1.1";

/// Configuration for the Twitter login SDK.
///
/// Holds the consumer credentials of the registered app plus transport
/// settings. Tokens obtained during login are never stored here.
///
/// # Thread Safety
///
/// `TwitterConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct TwitterConfig {
    consumer_key: ConsumerKey,
    consumer_secret: ConsumerSecret,
    api_host: HostUrl,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
    force_login: bool,
    screen_name: Option<String>,
}

impl TwitterConfig {
    /// Creates a new builder for constructing a `TwitterConfig`.
    #[must_use]
    pub fn builder() -> TwitterConfigBuilder {
        TwitterConfigBuilder::new()
    }

    /// Returns the consumer key.
    #[must_use]
    pub const fn consumer_key(&self) -> &ConsumerKey {
        &self.consumer_key
    }

    /// Returns the consumer secret.
    #[must_use]
    pub const fn consumer_secret(&self) -> &ConsumerSecret {
        &self.consumer_secret
    }

    /// Returns the consumer credential pair used to sign every request.
    #[must_use]
    pub fn consumer_credentials(&self) -> ConsumerCredentials {
        ConsumerCredentials::new(self.consumer_key.as_ref(), self.consumer_secret.as_ref())
    }

    /// Returns the API host.
    #[must_use]
    pub const fn api_host(&self) -> &HostUrl {
        &self.api_host
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request timeout, if configured.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Returns whether the authorization page forces the user to sign in again.
    #[must_use]
    pub const fn force_login(&self) -> bool {
        self.force_login
    }

    /// Returns the screen name prefilled on the authorization page, if any.
    #[must_use]
    pub fn screen_name(&self) -> Option<&str> {
        self.screen_name.as_deref()
    }

    /// Returns the full request-token endpoint URL.
    #[must_use]
    pub fn request_token_url(&self) -> String {
        self.api_host.join(REQUEST_TOKEN_PATH)
    }

    /// Returns the full authorization endpoint URL.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        self.api_host.join(AUTHORIZE_PATH)
    }

    /// Returns the full access-token endpoint URL.
    #[must_use]
    pub fn access_token_url(&self) -> String {
        self.api_host.join(ACCESS_TOKEN_PATH)
    }

    /// Returns the URL of a REST API resource, e.g. `account/verify_credentials.json`.
    #[must_use]
    pub fn rest_url(&self, path: &str) -> String {
        self.api_host
            .join(&format!("{REST_API_PATH}/{}", path.trim_start_matches('/')))
    }
}

// Verify TwitterConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TwitterConfig>();
};

/// Builder for constructing [`TwitterConfig`] instances.
///
/// Required fields are `consumer_key` and `consumer_secret`.
///
/// # Defaults
///
/// - `api_host`: `https://api.twitter.com`
/// - `user_agent_prefix`: `None`
/// - `request_timeout`: `None` (reqwest default, no timeout)
/// - `force_login`: `false`
/// - `screen_name`: `None`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use twitter_login::{TwitterConfig, ConsumerKey, ConsumerSecret, HostUrl};
///
/// let config = TwitterConfig::builder()
///     .consumer_key(ConsumerKey::new("key").unwrap())
///     .consumer_secret(ConsumerSecret::new("secret").unwrap())
///     .api_host(HostUrl::new("http://localhost:8080").unwrap())
///     .request_timeout(Duration::from_secs(10))
///     .force_login(true)
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.request_token_url(), "http://localhost:8080/oauth/request_token");
/// ```
#[derive(Debug, Default)]
pub struct TwitterConfigBuilder {
    consumer_key: Option<ConsumerKey>,
    consumer_secret: Option<ConsumerSecret>,
    api_host: Option<HostUrl>,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
    force_login: Option<bool>,
    screen_name: Option<String>,
}

impl TwitterConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the consumer key (required).
    #[must_use]
    pub fn consumer_key(mut self, key: ConsumerKey) -> Self {
        self.consumer_key = Some(key);
        self
    }

    /// Sets the consumer secret (required).
    #[must_use]
    pub fn consumer_secret(mut self, secret: ConsumerSecret) -> Self {
        self.consumer_secret = Some(secret);
        self
    }

    /// Sets the API host the OAuth and REST endpoints are resolved against.
    #[must_use]
    pub fn api_host(mut self, host: HostUrl) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the timeout applied to every HTTP request.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Forces the user to enter their credentials on the authorization page.
    #[must_use]
    pub const fn force_login(mut self, force: bool) -> Self {
        self.force_login = Some(force);
        self
    }

    /// Prefills the screen name field on the authorization page.
    #[must_use]
    pub fn screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }

    /// Builds the [`TwitterConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `consumer_key` or
    /// `consumer_secret` are not set.
    pub fn build(self) -> Result<TwitterConfig, ConfigError> {
        let consumer_key = self.consumer_key.ok_or(ConfigError::MissingRequiredField {
            field: "consumer_key",
        })?;
        let consumer_secret = self
            .consumer_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "consumer_secret",
            })?;

        Ok(TwitterConfig {
            consumer_key,
            consumer_secret,
            api_host: self.api_host.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            request_timeout: self.request_timeout,
            force_login: self.force_login.unwrap_or(false),
            screen_name: self.screen_name,
        })
    }
}
