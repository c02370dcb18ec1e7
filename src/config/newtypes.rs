//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Twitter consumer key (the app's "API key").
///
/// # Example
///
/// ```rust
/// use twitter_login::ConsumerKey;
///
/// let key = ConsumerKey::new("my-consumer-key").unwrap();
/// assert_eq!(key.as_ref(), "my-consumer-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerKey(String);

impl ConsumerKey {
    /// Creates a new validated consumer key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyConsumerKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyConsumerKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ConsumerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Twitter consumer secret (the app's "API secret").
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ConsumerSecret(*****)` instead of the actual secret.
///
/// # Example
///
/// ```rust
/// use twitter_login::ConsumerSecret;
///
/// let secret = ConsumerSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ConsumerSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerSecret(String);

impl ConsumerSecret {
    /// Creates a new validated consumer secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyConsumerSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyConsumerSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ConsumerSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConsumerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConsumerSecret(*****)")
    }
}

/// Byte offsets of the scheme and host inside an absolute URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct UrlParts {
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl UrlParts {
    fn parse(url: &str) -> Option<Self> {
        let scheme_end = url.find("://")?;

        let scheme = &url[..scheme_end];
        let scheme_ok = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return None;
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return None;
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return None;
        }

        Some(Self {
            scheme_end,
            host_start,
            host_end,
        })
    }
}

/// A validated API host URL.
///
/// The OAuth and REST endpoints are resolved against this host, which makes
/// it possible to point the SDK at a proxy or a local mock server.
///
/// # Example
///
/// ```rust
/// use twitter_login::HostUrl;
///
/// let url = HostUrl::new("https://api.twitter.com").unwrap();
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), Some("api.twitter.com"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
    parts: UrlParts,
}

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// A trailing slash is removed so endpoint paths can be appended directly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL is invalid.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let parts = UrlParts::parse(&url).ok_or_else(|| ConfigError::InvalidHostUrl {
            url: url.clone(),
        })?;

        Ok(Self { url, parts })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.parts.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        let host = &self.url[self.parts.host_start..self.parts.host_end];
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    /// Joins an absolute endpoint path onto this host.
    ///
    /// ```rust
    /// use twitter_login::HostUrl;
    ///
    /// let host = HostUrl::new("https://api.twitter.com/").unwrap();
    /// assert_eq!(host.join("/oauth/request_token"), "https://api.twitter.com/oauth/request_token");
    /// ```
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl Default for HostUrl {
    fn default() -> Self {
        Self {
            url: "https://api.twitter.com".to_string(),
            parts: UrlParts {
                scheme_end: 5,
                host_start: 8,
                host_end: 23,
            },
        }
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

/// A validated OAuth callback URL.
///
/// The callback URL is sent as `oauth_callback` when requesting a request
/// token, and the authorization surface redirects to it once the user has
/// granted (or denied) access. Custom schemes such as `myapp://callback` are
/// accepted since embedded clients usually intercept them.
///
/// # Example
///
/// ```rust
/// use twitter_login::CallbackUrl;
///
/// let callback = CallbackUrl::new("myapp://twitter-callback").unwrap();
/// assert!(callback.matches("myapp://twitter-callback?oauth_token=t&oauth_verifier=v"));
/// assert!(!callback.matches("https://api.twitter.com/oauth/authorize?oauth_token=t"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackUrl(String);

impl CallbackUrl {
    /// Creates a new validated callback URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCallbackUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();
        if UrlParts::parse(&url).is_none() {
            return Err(ConfigError::InvalidCallbackUrl { url });
        }
        Ok(Self(url))
    }

    /// Returns `true` if `url` is a redirect to this callback.
    ///
    /// Query strings and fragments are ignored on both sides, as is a
    /// trailing slash; scheme and host compare case-insensitively.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        fn base(url: &str) -> &str {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            url[..end].trim_end_matches('/')
        }

        let expected = base(&self.0);
        let actual = base(url.trim());

        match (UrlParts::parse(expected), UrlParts::parse(actual)) {
            (Some(e), Some(a)) => {
                expected[..e.host_end].eq_ignore_ascii_case(&actual[..a.host_end])
                    && expected[e.host_end..] == actual[a.host_end..]
            }
            _ => false,
        }
    }
}

impl AsRef<str> for CallbackUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CallbackUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CallbackUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
