//! OAuth 1.0a implementation for Twitter logins.
//!
//! This module provides the building blocks of the three-legged flow:
//!
//! - [`percent`]: RFC 3986 percent-encoding of parameters and URLs
//! - [`form`]: `application/x-www-form-urlencoded` bodies
//! - [`sign`]: HMAC-SHA1 request signing producing the `Authorization` header
//! - [`TokenFlowClient`]: request token, authorization URL, access token, profile
//!
//! Most applications drive these through
//! [`LoginOrchestrator`](crate::auth::LoginOrchestrator) instead of calling
//! them directly.
//!
//! # Three-Legged Flow
//!
//! 1. **Request token**: a signed `POST oauth/request_token` carrying
//!    `oauth_callback` returns a temporary token pair.
//! 2. **User authorization**: the user signs in at
//!    `oauth/authorize?oauth_token=...` and is redirected to the callback URL
//!    with `oauth_verifier`.
//! 3. **Access token**: a signed `POST oauth/access_token` trades the request
//!    token and verifier for the access token.
//!
//! # Example
//!
//! ```rust
//! use twitter_login::auth::oauth::{sign, AuthorizationRequest};
//! use twitter_login::auth::{ConsumerCredentials, TokenCredentials};
//! use twitter_login::clients::HttpMethod;
//!
//! let consumer = ConsumerCredentials::new("ck", "cs");
//! let token = TokenCredentials::new("rt", "rs");
//! let request = AuthorizationRequest::new(
//!     HttpMethod::Post,
//!     "https://api.twitter.com/oauth/access_token",
//!     &consumer,
//! )
//! .token(&token)
//! .param("oauth_verifier", "V123");
//!
//! let header = sign(&request, None, None).unwrap();
//! assert!(header.as_ref().contains("oauth_token=\"rt\""));
//! assert!(!header.as_ref().contains("oauth_verifier"));
//! ```

mod error;
pub mod form;
pub mod percent;
mod signer;
mod token_flow;

pub use error::{FlowFailure, FlowStage, OAuthError, ParseError, SigningError};
pub use signer::{
    compute_signature, sign, signature_base_string, AuthorizationHeader, AuthorizationRequest,
    OAUTH_VERSION, SIGNATURE_METHOD,
};
pub use token_flow::{TokenFlowClient, VERIFY_CREDENTIALS_PATH};
