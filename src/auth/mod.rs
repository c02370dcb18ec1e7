//! Authentication types for the Twitter login SDK.
//!
//! This module provides the credentials, the authenticated user, and the
//! login state machine built on top of the OAuth 1.0a flow.
//!
//! # Overview
//!
//! - [`ConsumerCredentials`]: The key and secret of the registered app
//! - [`TokenCredentials`]: A request-token pair, valid only during a login
//! - [`AccessToken`]: The durable token handed to the caller after a login
//! - [`User`]: The profile of the user who authorized the app
//! - [`LoginOrchestrator`]: The state machine driving one login
//! - [`oauth`]: Percent-encoding, form bodies, signing and the token flow
//!
//! # Token Lifetimes
//!
//! A request token only lives for the duration of one login. Once it has
//! been traded for an access token it is dropped from the session and never
//! signs another request.
//!
//! The access token is delivered through
//! [`LoginCallbacks::on_get_access_token`] and belongs to the caller from
//! then on. This crate does not persist it.
//!
//! # Example
//!
//! ```rust
//! use twitter_login::auth::{AccessToken, TokenCredentials};
//!
//! let access_token = AccessToken::new("T", "S");
//! let credentials = TokenCredentials::from(&access_token);
//! assert_eq!(credentials.token(), "T");
//! ```

mod credentials;
mod login;
pub mod oauth;
mod user;

pub use credentials::{AccessToken, ConsumerCredentials, TokenCredentials};
pub use login::{FailureKind, LoginCallbacks, LoginOrchestrator, LoginSession, LoginState};
pub use user::User;
