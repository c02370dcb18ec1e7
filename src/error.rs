//! Error types for SDK configuration.
//!
//! This module contains the error type returned when building a
//! [`TwitterConfig`](crate::TwitterConfig) or one of its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use twitter_login::{ConsumerKey, ConfigError};
//!
//! let result = ConsumerKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyConsumerKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Consumer key cannot be empty.
    #[error("Consumer key cannot be empty. Please provide the API key of your Twitter app.")]
    EmptyConsumerKey,

    /// Consumer secret cannot be empty.
    #[error("Consumer secret cannot be empty. Please provide the API secret of your Twitter app.")]
    EmptyConsumerSecret,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.twitter.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Callback URL is invalid.
    #[error("Invalid callback URL '{url}'. Expected an absolute URL such as 'myapp://twitter-callback' or 'https://example.com/callback'.")]
    InvalidCallbackUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}
