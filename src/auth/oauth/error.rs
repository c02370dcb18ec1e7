//! OAuth-specific error types for the Twitter login SDK.
//!
//! # Error Types
//!
//! - [`SigningError`]: the consumer credentials are unusable (programmer error)
//! - [`OAuthError::AuthFlow`]: one of the token-flow stages failed; the
//!   [`FlowFailure`] source says whether the server answered with an error
//!   status, the body could not be parsed, or the transport failed
//! - [`OAuthError::LoginInProgress`]: a second login was started while one is
//!   still running
//!
//! A user dismissing the authorization page is not an error; see
//! [`FailureKind::UserCancelled`](crate::auth::FailureKind::UserCancelled).
//!
//! # Example
//!
//! ```rust
//! use twitter_login::auth::oauth::{FlowFailure, FlowStage, OAuthError};
//!
//! let error = OAuthError::AuthFlow {
//!     stage: FlowStage::RequestToken,
//!     cause: FlowFailure::Status { status: 401, message: "Invalid consumer key".to_string() },
//! };
//! assert_eq!(error.stage(), Some(FlowStage::RequestToken));
//! assert!(error.to_string().contains("request_token"));
//! ```

use std::fmt;

use thiserror::Error;

use crate::clients::HttpError;
use crate::error::ConfigError;

/// The consumer credentials cannot be used to sign a request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SigningError {
    /// The consumer key is empty.
    #[error("Cannot sign an OAuth request with an empty consumer key")]
    EmptyConsumerKey,

    /// The consumer secret is empty.
    #[error("Cannot sign an OAuth request with an empty consumer secret")]
    EmptyConsumerSecret,
}

/// The stage of the token flow an error happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
    /// `POST oauth/request_token`.
    RequestToken,
    /// `POST oauth/access_token`.
    AccessToken,
    /// `GET account/verify_credentials.json`.
    VerifyCredentials,
    /// Any other signed REST call.
    Api,
}

impl FlowStage {
    /// Returns the stage name, e.g. `"request_token"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestToken => "request_token",
            Self::AccessToken => "access_token",
            Self::VerifyCredentials => "verify_credentials",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A response body lacked what the flow needed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field was absent or empty.
    #[error("Response is missing the '{field}' field")]
    MissingField {
        /// The missing field.
        field: &'static str,
    },

    /// The request-token response reported `oauth_callback_confirmed` other than `true`.
    #[error("The provider did not confirm the OAuth callback URL")]
    CallbackNotConfirmed,

    /// A JSON body did not have the expected shape.
    #[error("Unexpected response body: {message}")]
    UnexpectedBody {
        /// What went wrong.
        message: String,
    },
}

/// Why a flow stage failed.
#[derive(Debug, Error)]
pub enum FlowFailure {
    /// The endpoint answered with a non-2xx status.
    #[error("status {status}: {message}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The response body.
        message: String,
    },

    /// The response could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The transport failed (DNS, connect, timeout); carried unchanged.
    #[error(transparent)]
    Transport(#[from] HttpError),
}

/// Errors that can occur during OAuth operations.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The request could not be signed.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// A stage of the token flow failed.
    #[error("OAuth {stage} step failed: {cause}")]
    AuthFlow {
        /// The stage that failed.
        stage: FlowStage,
        /// The underlying failure.
        #[source]
        cause: FlowFailure,
    },

    /// `start_login` was called while another login is still in flight.
    #[error("A login is already in progress; dismiss it before starting another")]
    LoginInProgress,

    /// Invalid configuration, such as a malformed callback URL.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be created.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl OAuthError {
    /// Wraps `cause` with the stage it happened in.
    pub fn flow(stage: FlowStage, cause: impl Into<FlowFailure>) -> Self {
        Self::AuthFlow {
            stage,
            cause: cause.into(),
        }
    }

    /// Returns the failed stage, for [`OAuthError::AuthFlow`] errors.
    #[must_use]
    pub const fn stage(&self) -> Option<FlowStage> {
        match self {
            Self::AuthFlow { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns `true` when the failure came from the transport rather than the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::AuthFlow {
                cause: FlowFailure::Transport(HttpError::Network(_)),
                ..
            }
        )
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
    assert_send_sync::<FlowFailure>();
};
