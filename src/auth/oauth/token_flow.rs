//! The three-legged OAuth 1.0a token flow.
//!
//! [`TokenFlowClient`] drives the network side of a login:
//!
//! 1. [`fetch_request_token`](TokenFlowClient::fetch_request_token): signed
//!    `POST oauth/request_token` carrying `oauth_callback`
//! 2. [`build_authorization_url`](TokenFlowClient::build_authorization_url):
//!    the page the user signs in on
//! 3. [`exchange_verifier`](TokenFlowClient::exchange_verifier): signed
//!    `POST oauth/access_token` carrying the request token and verifier
//! 4. [`verify_credentials`](TokenFlowClient::verify_credentials): the profile
//!    of the user who just authorized the app
//!
//! Every call is attempted once. Failures come back as
//! [`OAuthError::AuthFlow`] tagged with the [`FlowStage`] they happened in.
//!
//! # Example
//!
//! ```rust,ignore
//! use twitter_login::auth::oauth::TokenFlowClient;
//! use twitter_login::CallbackUrl;
//!
//! let client = TokenFlowClient::new(config)?;
//! let callback = CallbackUrl::new("myapp://twitter-callback")?;
//!
//! let request_token = client.fetch_request_token(&callback).await?;
//! let url = client.build_authorization_url(&request_token);
//! // ...present `url`, wait for the redirect carrying `oauth_verifier`...
//! let access_token = client.exchange_verifier(&request_token, &verifier).await?;
//! let user = client.verify_credentials(&access_token).await?;
//! ```

use crate::auth::credentials::{AccessToken, ConsumerCredentials, TokenCredentials};
use crate::auth::oauth::form::{self, FormParams};
use crate::auth::oauth::signer::{sign, AuthorizationRequest};
use crate::auth::oauth::{FlowFailure, FlowStage, OAuthError, ParseError};
use crate::auth::User;
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ResponseBody};
use crate::config::{CallbackUrl, TwitterConfig};

/// Path of the profile call that completes a login, relative to the REST API.
pub const VERIFY_CREDENTIALS_PATH: &str = "account/verify_credentials.json";

/// Signs and sends the requests of the OAuth 1.0a token flow.
///
/// The client holds no per-login state; the same instance can serve any
/// number of logins.
#[derive(Debug)]
pub struct TokenFlowClient {
    config: TwitterConfig,
    consumer: ConsumerCredentials,
    http_client: HttpClient,
}

// Verify TokenFlowClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TokenFlowClient>();
};

impl TokenFlowClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Http`] if the HTTP client cannot be created.
    pub fn new(config: TwitterConfig) -> Result<Self, OAuthError> {
        let http_client = HttpClient::new(&config)?;
        let consumer = config.consumer_credentials();
        Ok(Self {
            config,
            consumer,
            http_client,
        })
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &TwitterConfig {
        &self.config
    }

    /// Obtains a temporary request token bound to `callback_url`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::AuthFlow`] with [`FlowStage::RequestToken`] if the
    /// endpoint fails, answers without `oauth_token`/`oauth_token_secret`, or
    /// reports `oauth_callback_confirmed` other than `true`.
    pub async fn fetch_request_token(
        &self,
        callback_url: &CallbackUrl,
    ) -> Result<TokenCredentials, OAuthError> {
        let stage = FlowStage::RequestToken;
        let url = self.config.request_token_url();
        let request = AuthorizationRequest::new(HttpMethod::Post, &url, &self.consumer)
            .protocol_param("oauth_callback", callback_url.as_ref());

        let response = self.send(stage, &request).await?;
        let params = form_body(stage, response)?;

        if params
            .get("oauth_callback_confirmed")
            .is_some_and(|confirmed| confirmed != "true")
        {
            return Err(OAuthError::flow(stage, ParseError::CallbackNotConfirmed));
        }

        TokenCredentials::from_form(&params).map_err(|e| OAuthError::flow(stage, e))
    }

    /// Builds the URL of the page where the user authorizes the app.
    ///
    /// With the default configuration this is
    /// `<host>/oauth/authorize?oauth_token=<token>`; `force_login` and
    /// `screen_name` are appended when configured.
    #[must_use]
    pub fn build_authorization_url(&self, request_token: &TokenCredentials) -> String {
        let mut params = FormParams::new();
        params.insert("oauth_token".to_string(), request_token.token().to_string());
        if self.config.force_login() {
            params.insert("force_login".to_string(), "true".to_string());
        }
        if let Some(screen_name) = self.config.screen_name() {
            params.insert("screen_name".to_string(), screen_name.to_string());
        }

        format!("{}?{}", self.config.authorize_url(), form::encode(&params))
    }

    /// Trades the request token and the user's verifier for an access token.
    ///
    /// The verifier travels as a signed form-body parameter.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::AuthFlow`] with [`FlowStage::AccessToken`] if the
    /// endpoint fails or the response lacks `oauth_token`/`oauth_token_secret`.
    pub async fn exchange_verifier(
        &self,
        request_token: &TokenCredentials,
        verifier: &str,
    ) -> Result<AccessToken, OAuthError> {
        let stage = FlowStage::AccessToken;
        let url = self.config.access_token_url();
        let request = AuthorizationRequest::new(HttpMethod::Post, &url, &self.consumer)
            .token(request_token)
            .param("oauth_verifier", verifier);

        let response = self.send(stage, &request).await?;
        let params = form_body(stage, response)?;

        AccessToken::from_form(&params).map_err(|e| OAuthError::flow(stage, e))
    }

    /// Fetches the profile of the user an access token belongs to.
    ///
    /// Calls `account/verify_credentials.json` with `include_entities=false`,
    /// `skip_status=true` and `include_email=true`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::AuthFlow`] with [`FlowStage::VerifyCredentials`]
    /// if the call fails or the body is not a user object.
    pub async fn verify_credentials(&self, access_token: &AccessToken) -> Result<User, OAuthError> {
        let stage = FlowStage::VerifyCredentials;
        let url = self.config.rest_url(VERIFY_CREDENTIALS_PATH);
        let token = TokenCredentials::from(access_token);
        let request = AuthorizationRequest::new(HttpMethod::Get, &url, &self.consumer)
            .token(&token)
            .param("include_entities", "false")
            .param("skip_status", "true")
            .param("include_email", "true");

        let response = self.send(stage, &request).await?;
        parse_user(&response.raw_body).map_err(|e| OAuthError::flow(stage, e))
    }

    /// Makes a signed call against the REST API on behalf of the user.
    ///
    /// `path` is relative to the REST API root, e.g. `statuses/home_timeline.json`.
    /// `params` travel in the query string for `GET`/`DELETE` and as a form
    /// body for `POST`/`PUT`; either way they are signed.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::AuthFlow`] with [`FlowStage::Api`] if the call fails.
    pub async fn api(
        &self,
        method: HttpMethod,
        path: &str,
        params: &FormParams,
        access_token: &AccessToken,
    ) -> Result<ResponseBody, OAuthError> {
        let url = self.config.rest_url(path);
        let token = TokenCredentials::from(access_token);
        let request = AuthorizationRequest::new(method, &url, &self.consumer)
            .token(&token)
            .params(params);

        let response = self.send(FlowStage::Api, &request).await?;
        Ok(response.body)
    }

    async fn send(
        &self,
        stage: FlowStage,
        request: &AuthorizationRequest<'_>,
    ) -> Result<HttpResponse, OAuthError> {
        let header = sign(request, None, None)?;
        let params = request.request_params();

        let mut builder = HttpRequest::builder(request.method(), request.url())
            .authorization(header.to_string());
        if !params.is_empty() {
            builder = if request.method().allows_body() {
                builder.body(params.clone())
            } else {
                builder.query(params.clone())
            };
        }
        let http_request = builder
            .build()
            .map_err(|e| OAuthError::flow(stage, HttpError::from(e)))?;

        tracing::debug!(stage = %stage, "{} {}", request.method(), request.url());

        self.http_client
            .request(http_request)
            .await
            .map_err(|error| {
                let cause = match error {
                    HttpError::Response(response) => FlowFailure::Status {
                        status: response.code,
                        message: response.message,
                    },
                    other => FlowFailure::Transport(other),
                };
                tracing::warn!(stage = %stage, "OAuth step failed: {cause}");
                OAuthError::AuthFlow { stage, cause }
            })
    }
}

fn form_body(stage: FlowStage, response: HttpResponse) -> Result<FormParams, OAuthError> {
    let params = match response.body {
        ResponseBody::Form(params) => params,
        ResponseBody::Json(_) => form::decode(&response.raw_body),
    };
    if params.is_empty() {
        return Err(OAuthError::flow(
            stage,
            ParseError::UnexpectedBody {
                message: "expected a form-encoded body".to_string(),
            },
        ));
    }
    Ok(params)
}

fn parse_user(body: &str) -> Result<User, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ParseError::UnexpectedBody {
            message: e.to_string(),
        })?;

    if value.get("id_str").is_none() && value.get("screen_name").is_none() {
        return Err(ParseError::UnexpectedBody {
            message: "expected a user object".to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| ParseError::UnexpectedBody {
        message: e.to_string(),
    })
}
