//! The login state machine.
//!
//! [`LoginOrchestrator`] drives one three-legged login at a time through
//! these states:
//!
//! ```text
//! Idle → AwaitingRequestToken → AwaitingUserAuthorization
//!      → ExchangingToken → FetchingProfile → Success | Failed
//! ```
//!
//! The orchestrator never renders anything. It hands the authorization URL
//! to [`LoginCallbacks::on_authorization_url`] and expects the surrounding
//! UI to feed back what happens on that surface:
//!
//! - every navigation through [`LoginOrchestrator::on_redirect`]
//! - the user closing the surface through [`LoginOrchestrator::dismiss`]
//!
//! # Re-entrancy
//!
//! Calling [`start_login`](LoginOrchestrator::start_login) while a login is
//! in flight is rejected with [`OAuthError::LoginInProgress`] and leaves the
//! running session untouched. Dismiss or [`reset`](LoginOrchestrator::reset)
//! it first.
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_login::auth::{LoginCallbacks, LoginOrchestrator, LoginState};
//! use twitter_login::CallbackUrl;
//!
//! let callbacks = LoginCallbacks::new()
//!     .on_authorization_url(|url| webview.load(url))
//!     .on_get_access_token(|token| keychain.store(token))
//!     .on_success(|user| println!("Signed in as @{}", user.screen_name))
//!     .on_error(|error| eprintln!("Login failed: {error}"));
//!
//! let mut login = LoginOrchestrator::new(config)?.with_callbacks(callbacks);
//! login.start_login(CallbackUrl::new("myapp://twitter-callback")?).await?;
//!
//! // Later, from the webview's navigation hook:
//! let state = login.on_redirect(&navigated_url).await?;
//! assert_eq!(state, LoginState::Success);
//! ```

use std::fmt;

use crate::auth::credentials::{AccessToken, TokenCredentials};
use crate::auth::oauth::{form, FlowStage, OAuthError, TokenFlowClient};
use crate::auth::User;
use crate::config::{CallbackUrl, TwitterConfig};

/// Why a login ended in [`LoginState::Failed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The user closed the authorization surface or denied access.
    ///
    /// Reported through `on_close`, never `on_error`.
    UserCancelled,
    /// A stage of the token flow failed.
    Flow(FlowStage),
    /// A request could not be signed.
    Signing,
}

/// The state of a [`LoginOrchestrator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LoginState {
    /// No login has been started, or the last one was reset.
    #[default]
    Idle,
    /// The request token is being fetched.
    AwaitingRequestToken,
    /// The authorization URL has been presented; waiting for the redirect.
    AwaitingUserAuthorization,
    /// The verifier is being exchanged for an access token.
    ExchangingToken,
    /// The access token has been delivered; the profile is being fetched.
    FetchingProfile,
    /// The login completed and the user was delivered.
    Success,
    /// The login ended without a user.
    Failed(FailureKind),
}

impl LoginState {
    /// Returns `true` for [`Success`](Self::Success) and [`Failed`](Self::Failed).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed(_))
    }

    /// Returns `true` while a login is running.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        !matches!(self, Self::Idle) && !self.is_terminal()
    }
}

/// The working state of one login attempt.
///
/// Created by [`LoginOrchestrator::start_login`] and discarded when the login
/// reaches a terminal state.
#[derive(Clone)]
pub struct LoginSession {
    callback_url: CallbackUrl,
    request_token: Option<TokenCredentials>,
    authorization_url: Option<String>,
    verifier: Option<String>,
    access_token: Option<AccessToken>,
}

impl LoginSession {
    const fn new(callback_url: CallbackUrl) -> Self {
        Self {
            callback_url,
            request_token: None,
            authorization_url: None,
            verifier: None,
            access_token: None,
        }
    }

    /// Returns the callback URL the login was started with.
    #[must_use]
    pub const fn callback_url(&self) -> &CallbackUrl {
        &self.callback_url
    }

    /// Returns the request token, until it has been exchanged.
    #[must_use]
    pub const fn request_token(&self) -> Option<&TokenCredentials> {
        self.request_token.as_ref()
    }

    /// Returns the authorization URL, once presented.
    #[must_use]
    pub fn authorization_url(&self) -> Option<&str> {
        self.authorization_url.as_deref()
    }

    /// Returns `true` once a verifier has been consumed.
    #[must_use]
    pub const fn has_verifier(&self) -> bool {
        self.verifier.is_some()
    }

    /// Returns the access token, once obtained.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }
}

impl fmt::Debug for LoginSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSession")
            .field("callback_url", &self.callback_url)
            .field("request_token", &self.request_token)
            .field("authorization_url", &self.authorization_url)
            .field("verifier", &self.verifier.as_ref().map(|_| "*****"))
            .field("access_token", &self.access_token)
            .finish()
    }
}

/// Hooks the surrounding UI registers to follow a login.
///
/// Every hook is optional and defaults to a no-op.
pub struct LoginCallbacks {
    on_press: Box<dyn Fn() + Send + Sync>,
    on_authorization_url: Box<dyn Fn(&str) + Send + Sync>,
    on_get_access_token: Box<dyn Fn(&AccessToken) + Send + Sync>,
    on_close: Box<dyn Fn() + Send + Sync>,
    on_success: Box<dyn Fn(&User) + Send + Sync>,
    on_error: Box<dyn Fn(&OAuthError) + Send + Sync>,
}

impl LoginCallbacks {
    /// Creates a set of no-op callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            on_press: Box::new(|| {}),
            on_authorization_url: Box::new(|_| {}),
            on_get_access_token: Box::new(|_| {}),
            on_close: Box::new(|| {}),
            on_success: Box::new(|_| {}),
            on_error: Box::new(|_| {}),
        }
    }

    /// Called when a login starts.
    #[must_use]
    pub fn on_press(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_press = Box::new(f);
        self
    }

    /// Called with the URL to present once the request token is available.
    #[must_use]
    pub fn on_authorization_url(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_authorization_url = Box::new(f);
        self
    }

    /// Called with the access token as soon as it is obtained, before the profile fetch.
    #[must_use]
    pub fn on_get_access_token(
        mut self,
        f: impl Fn(&AccessToken) + Send + Sync + 'static,
    ) -> Self {
        self.on_get_access_token = Box::new(f);
        self
    }

    /// Called when the user dismisses the authorization surface or denies access.
    #[must_use]
    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Box::new(f);
        self
    }

    /// Called with the authenticated user at the end of a successful login.
    #[must_use]
    pub fn on_success(mut self, f: impl Fn(&User) + Send + Sync + 'static) -> Self {
        self.on_success = Box::new(f);
        self
    }

    /// Called when a stage of the login fails.
    #[must_use]
    pub fn on_error(mut self, f: impl Fn(&OAuthError) + Send + Sync + 'static) -> Self {
        self.on_error = Box::new(f);
        self
    }
}

impl Default for LoginCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoginCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCallbacks").finish_non_exhaustive()
    }
}

/// Drives a three-legged login from start to a terminal state.
///
/// One orchestrator runs one login at a time. Entry points take `&mut self`,
/// so a redirect can be consumed at most once per session.
///
/// If a future returned by [`start_login`](Self::start_login) or
/// [`on_redirect`](Self::on_redirect) is dropped before completion, the
/// orchestrator stays in the intermediate state; call
/// [`reset`](Self::reset) to start over.
#[derive(Debug)]
pub struct LoginOrchestrator {
    client: TokenFlowClient,
    callbacks: LoginCallbacks,
    state: LoginState,
    session: Option<LoginSession>,
}

// Verify LoginOrchestrator is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LoginOrchestrator>();
};

impl LoginOrchestrator {
    /// Creates an orchestrator with no-op callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Http`] if the HTTP client cannot be created.
    pub fn new(config: TwitterConfig) -> Result<Self, OAuthError> {
        Ok(Self::with_client(TokenFlowClient::new(config)?))
    }

    /// Creates an orchestrator around an existing token-flow client.
    #[must_use]
    pub fn with_client(client: TokenFlowClient) -> Self {
        Self {
            client,
            callbacks: LoginCallbacks::new(),
            state: LoginState::Idle,
            session: None,
        }
    }

    /// Replaces the callbacks.
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: LoginCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    /// Returns the running session, if a login is in flight.
    #[must_use]
    pub const fn session(&self) -> Option<&LoginSession> {
        self.session.as_ref()
    }

    /// Returns the underlying token-flow client, e.g. for [`TokenFlowClient::api`] calls.
    #[must_use]
    pub const fn client(&self) -> &TokenFlowClient {
        &self.client
    }

    /// Abandons any running session and returns to [`LoginState::Idle`].
    ///
    /// No callback fires.
    pub fn reset(&mut self) {
        if self.state.is_in_flight() {
            tracing::debug!(state = ?self.state, "Abandoning in-flight login");
        }
        self.session = None;
        self.state = LoginState::Idle;
    }

    /// Starts a login and presents the authorization URL.
    ///
    /// Fires `on_press`, fetches a request token bound to `callback_url`,
    /// then fires `on_authorization_url`. On success the orchestrator waits
    /// in [`LoginState::AwaitingUserAuthorization`].
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::LoginInProgress`] if a login is already in
    /// flight; the running session is left untouched and no callback fires.
    ///
    /// Returns the request-token failure otherwise, after moving to
    /// [`LoginState::Failed`] and reporting it to `on_error`. The
    /// authorization URL is never presented in that case.
    pub async fn start_login(&mut self, callback_url: CallbackUrl) -> Result<LoginState, OAuthError> {
        if self.state.is_in_flight() {
            tracing::warn!(state = ?self.state, "Rejected start_login while a login is in flight");
            return Err(OAuthError::LoginInProgress);
        }

        (self.callbacks.on_press)();
        self.session = Some(LoginSession::new(callback_url.clone()));
        self.transition(LoginState::AwaitingRequestToken);

        let request_token = match self.client.fetch_request_token(&callback_url).await {
            Ok(token) => token,
            Err(error) => return Err(self.fail(FlowStage::RequestToken, error)),
        };

        let authorization_url = self.client.build_authorization_url(&request_token);
        if let Some(session) = self.session.as_mut() {
            session.request_token = Some(request_token);
            session.authorization_url = Some(authorization_url.clone());
        }

        self.transition(LoginState::AwaitingUserAuthorization);
        (self.callbacks.on_authorization_url)(&authorization_url);

        Ok(self.state)
    }

    /// Feeds a navigation of the authorization surface into the state machine.
    ///
    /// The URL is ignored unless the orchestrator is in
    /// [`LoginState::AwaitingUserAuthorization`] and the URL is a redirect to
    /// the session's callback URL. A matching redirect carrying `denied` is
    /// handled like [`dismiss`](Self::dismiss). One carrying `oauth_verifier`
    /// is consumed: the verifier is exchanged, `on_get_access_token` fires,
    /// the profile is fetched and `on_success` fires.
    ///
    /// Returns the state after handling the URL.
    ///
    /// # Errors
    ///
    /// Returns the access-token or profile failure after moving to
    /// [`LoginState::Failed`] and reporting it to `on_error`. A profile
    /// failure happens after `on_get_access_token`, so the token stays valid.
    pub async fn on_redirect(&mut self, url: &str) -> Result<LoginState, OAuthError> {
        if self.state != LoginState::AwaitingUserAuthorization {
            tracing::debug!(state = ?self.state, "Ignoring redirect outside of authorization");
            return Ok(self.state);
        }

        let is_callback = self
            .session
            .as_ref()
            .is_some_and(|session| session.callback_url.matches(url));
        if !is_callback {
            return Ok(self.state);
        }

        let params = redirect_params(url);
        if params.contains_key("denied") {
            return Ok(self.dismiss());
        }

        let Some(verifier) = params.get("oauth_verifier").filter(|v| !v.is_empty()) else {
            tracing::warn!("Callback redirect without oauth_verifier ignored");
            return Ok(self.state);
        };

        let Some(session) = self.session.as_mut() else {
            return Ok(self.state);
        };
        if let (Some(token), Some(returned)) =
            (session.request_token.as_ref(), params.get("oauth_token"))
        {
            if token.token() != returned {
                tracing::warn!("Callback redirect for a different request token ignored");
                return Ok(self.state);
            }
        }
        let Some(request_token) = session.request_token.take() else {
            return Ok(self.state);
        };
        session.verifier = Some(verifier.clone());

        self.transition(LoginState::ExchangingToken);
        let access_token = match self.client.exchange_verifier(&request_token, verifier).await {
            Ok(token) => token,
            Err(error) => return Err(self.fail(FlowStage::AccessToken, error)),
        };

        if let Some(session) = self.session.as_mut() {
            session.access_token = Some(access_token.clone());
        }
        self.transition(LoginState::FetchingProfile);
        (self.callbacks.on_get_access_token)(&access_token);

        match self.client.verify_credentials(&access_token).await {
            Ok(user) => {
                self.transition(LoginState::Success);
                self.session = None;
                (self.callbacks.on_success)(&user);
                Ok(self.state)
            }
            Err(error) => Err(self.fail(FlowStage::VerifyCredentials, error)),
        }
    }

    /// Reports that the user closed the authorization surface.
    ///
    /// Before a verifier has been consumed this ends the login in
    /// `Failed(UserCancelled)` and fires `on_close`; `on_error` never fires.
    /// At any other time the call is ignored.
    ///
    /// Returns the state after handling the dismissal.
    pub fn dismiss(&mut self) -> LoginState {
        let cancellable = matches!(
            self.state,
            LoginState::AwaitingRequestToken | LoginState::AwaitingUserAuthorization
        ) && !self.session.as_ref().is_some_and(LoginSession::has_verifier);

        if !cancellable {
            tracing::debug!(state = ?self.state, "Ignoring dismissal");
            return self.state;
        }

        self.transition(LoginState::Failed(FailureKind::UserCancelled));
        self.session = None;
        (self.callbacks.on_close)();
        self.state
    }

    fn transition(&mut self, next: LoginState) {
        tracing::debug!(from = ?self.state, to = ?next, "Login state transition");
        self.state = next;
    }

    fn fail(&mut self, stage: FlowStage, error: OAuthError) -> OAuthError {
        let kind = match &error {
            OAuthError::Signing(_) => FailureKind::Signing,
            _ => FailureKind::Flow(error.stage().unwrap_or(stage)),
        };
        tracing::warn!(stage = %stage, "Login failed: {error}");
        self.transition(LoginState::Failed(kind));
        self.session = None;
        (self.callbacks.on_error)(&error);
        error
    }
}

/// Decodes the query string of a redirect URL, ignoring any fragment.
fn redirect_params(url: &str) -> form::FormParams {
    let Some((_, rest)) = url.split_once('?') else {
        return form::FormParams::new();
    };
    let query = rest.split_once('#').map_or(rest, |(query, _)| query);
    form::decode(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConsumerKey, ConsumerSecret, HostUrl};
    use std::sync::{Arc, Mutex};

    fn orchestrator() -> LoginOrchestrator {
        let config = TwitterConfig::builder()
            .consumer_key(ConsumerKey::new("ck").unwrap())
            .consumer_secret(ConsumerSecret::new("cs").unwrap())
            .api_host(HostUrl::new("http://127.0.0.1:9").unwrap())
            .build()
            .unwrap();
        LoginOrchestrator::new(config).unwrap()
    }

    fn awaiting(login: &mut LoginOrchestrator) {
        let mut session = LoginSession::new(CallbackUrl::new("https://cb").unwrap());
        session.request_token = Some(TokenCredentials::new("rt", "rs"));
        session.authorization_url =
            Some("https://api.twitter.com/oauth/authorize?oauth_token=rt".to_string());
        login.session = Some(session);
        login.state = LoginState::AwaitingUserAuthorization;
    }

    #[test]
    fn test_state_classification() {
        assert!(!LoginState::Idle.is_in_flight());
        assert!(LoginState::AwaitingUserAuthorization.is_in_flight());
        assert!(LoginState::FetchingProfile.is_in_flight());
        assert!(LoginState::Success.is_terminal());
        assert!(LoginState::Failed(FailureKind::UserCancelled).is_terminal());
        assert!(!LoginState::Failed(FailureKind::Signing).is_in_flight());
        assert_eq!(LoginState::default(), LoginState::Idle);
    }

    #[test]
    fn test_redirect_params_extracts_verifier() {
        let params = redirect_params("myapp://cb?oauth_token=rt&oauth_verifier=V%2B1#frag");
        assert_eq!(params.get("oauth_verifier").map(String::as_str), Some("V+1"));
        assert_eq!(params.get("oauth_token").map(String::as_str), Some("rt"));
        assert!(redirect_params("myapp://cb").is_empty());
    }

    #[test]
    fn test_dismiss_from_idle_is_ignored() {
        let closed = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&closed);
        let mut login = orchestrator()
            .with_callbacks(LoginCallbacks::new().on_close(move || *counter.lock().unwrap() += 1));

        assert_eq!(login.dismiss(), LoginState::Idle);
        assert_eq!(*closed.lock().unwrap(), 0);
    }

    #[test]
    fn test_dismiss_while_awaiting_authorization_cancels() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (close_events, error_events) = (Arc::clone(&events), Arc::clone(&events));
        let mut login = orchestrator().with_callbacks(
            LoginCallbacks::new()
                .on_close(move || close_events.lock().unwrap().push("close"))
                .on_error(move |_| error_events.lock().unwrap().push("error")),
        );
        awaiting(&mut login);

        assert_eq!(
            login.dismiss(),
            LoginState::Failed(FailureKind::UserCancelled)
        );
        assert!(login.session().is_none());
        assert_eq!(*events.lock().unwrap(), vec!["close"]);

        // A second dismissal after the terminal state is ignored.
        login.dismiss();
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_start_login_rejected_while_in_flight() {
        let mut login = orchestrator();
        awaiting(&mut login);

        let result = login
            .start_login(CallbackUrl::new("https://other").unwrap())
            .await;

        assert!(matches!(result, Err(OAuthError::LoginInProgress)));
        assert_eq!(login.state(), LoginState::AwaitingUserAuthorization);
        assert_eq!(
            login.session().unwrap().callback_url().as_ref(),
            "https://cb"
        );
    }

    #[tokio::test]
    async fn test_unrelated_redirect_is_ignored() {
        let mut login = orchestrator();
        awaiting(&mut login);

        let state = login
            .on_redirect("https://api.twitter.com/oauth/authorize?oauth_token=rt")
            .await
            .unwrap();

        assert_eq!(state, LoginState::AwaitingUserAuthorization);
        assert!(login.session().unwrap().request_token().is_some());
    }

    #[tokio::test]
    async fn test_redirect_without_verifier_is_ignored() {
        let mut login = orchestrator();
        awaiting(&mut login);

        let state = login.on_redirect("https://cb?oauth_token=rt").await.unwrap();

        assert_eq!(state, LoginState::AwaitingUserAuthorization);
    }

    #[tokio::test]
    async fn test_redirect_for_other_request_token_is_ignored() {
        let mut login = orchestrator();
        awaiting(&mut login);

        let state = login
            .on_redirect("https://cb?oauth_token=stale&oauth_verifier=V")
            .await
            .unwrap();

        assert_eq!(state, LoginState::AwaitingUserAuthorization);
        assert!(!login.session().unwrap().has_verifier());
    }

    #[tokio::test]
    async fn test_denied_redirect_is_a_dismissal() {
        let errors = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&errors);
        let mut login = orchestrator()
            .with_callbacks(LoginCallbacks::new().on_error(move |_| *counter.lock().unwrap() += 1));
        awaiting(&mut login);

        let state = login.on_redirect("https://cb?denied=rt").await.unwrap();

        assert_eq!(state, LoginState::Failed(FailureKind::UserCancelled));
        assert_eq!(*errors.lock().unwrap(), 0);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut login = orchestrator();
        awaiting(&mut login);

        login.reset();

        assert_eq!(login.state(), LoginState::Idle);
        assert!(login.session().is_none());
    }

    #[test]
    fn test_session_debug_masks_verifier() {
        let mut session = LoginSession::new(CallbackUrl::new("https://cb").unwrap());
        session.verifier = Some("V123".to_string());
        let debug = format!("{session:?}");
        assert!(!debug.contains("V123"));
        assert!(session.has_verifier());
    }
}
