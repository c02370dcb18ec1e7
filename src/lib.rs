//! # Twitter Login
//!
//! An OAuth 1.0a three-legged login core for embedded Twitter clients.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`TwitterConfig`] and [`TwitterConfigBuilder`]
//! - Validated newtypes for consumer credentials, hosts and callback URLs
//! - RFC 3986 percent-encoding and form bodies via [`auth::oauth`]
//! - HMAC-SHA1 request signing via [`auth::oauth::sign`]
//! - The request-token / authorize / access-token flow via [`auth::oauth::TokenFlowClient`]
//! - A UI-agnostic login state machine via [`LoginOrchestrator`]
//! - An async HTTP client with rate limit header parsing
//!
//! Rendering the login button and the authorization web view is left to the
//! application. The orchestrator only needs to be told about redirects and
//! dismissals.
//!
//! ## Quick Start
//!
//! ```rust
//! use twitter_login::{TwitterConfig, ConsumerKey, ConsumerSecret};
//!
//! let config = TwitterConfig::builder()
//!     .consumer_key(ConsumerKey::new("your-consumer-key").unwrap())
//!     .consumer_secret(ConsumerSecret::new("your-consumer-secret").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Logging In
//!
//! ```rust,ignore
//! use twitter_login::{CallbackUrl, LoginCallbacks, LoginOrchestrator, LoginState};
//!
//! let callbacks = LoginCallbacks::new()
//!     .on_authorization_url(|url| webview.open(url))
//!     .on_get_access_token(|token| store.save(token))
//!     .on_success(|user| println!("Hello @{}", user.screen_name))
//!     .on_close(|| println!("Login cancelled"))
//!     .on_error(|error| eprintln!("Login failed: {error}"));
//!
//! let mut login = LoginOrchestrator::new(config)?.with_callbacks(callbacks);
//! login.start_login(CallbackUrl::new("myapp://twitter-callback")?).await?;
//!
//! // From the web view's navigation hook:
//! login.on_redirect(&url).await?;
//!
//! // From the web view's close button:
//! login.dismiss();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use twitter_login::auth::oauth::form::FormParams;
//! use twitter_login::clients::HttpMethod;
//!
//! let mut params = FormParams::new();
//! params.insert("count".to_string(), "20".to_string());
//!
//! let timeline = login
//!     .client()
//!     .api(HttpMethod::Get, "statuses/home_timeline.json", &params, &access_token)
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Secrets stay masked**: `Debug` output never contains secrets

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::{
    AccessToken, FailureKind, LoginCallbacks, LoginOrchestrator, LoginState, User,
};
pub use config::{
    CallbackUrl, ConsumerKey, ConsumerSecret, HostUrl, TwitterConfig, TwitterConfigBuilder,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{HttpClient, HttpError, HttpMethod};
