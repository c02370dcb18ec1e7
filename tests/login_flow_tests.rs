//! Integration tests for the login state machine.
//!
//! These tests drive [`LoginOrchestrator`] against a mock Twitter API and
//! check the order in which callbacks fire.

use std::sync::{Arc, Mutex};

use twitter_login::auth::oauth::{FlowStage, OAuthError};
use twitter_login::{
    CallbackUrl, ConsumerKey, ConsumerSecret, FailureKind, HostUrl, LoginCallbacks,
    LoginOrchestrator, LoginState, TwitterConfig,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT: &str = "https://cb?oauth_token=rt&oauth_verifier=V123";

type Events = Arc<Mutex<Vec<String>>>;

fn create_config(host: &str) -> TwitterConfig {
    TwitterConfig::builder()
        .consumer_key(ConsumerKey::new("test-consumer-key").unwrap())
        .consumer_secret(ConsumerSecret::new("test-consumer-secret").unwrap())
        .api_host(HostUrl::new(host).unwrap())
        .build()
        .unwrap()
}

fn callback_url() -> CallbackUrl {
    CallbackUrl::new("https://cb").unwrap()
}

/// Returns callbacks that record every invocation, in order.
fn recording_callbacks() -> (LoginCallbacks, Events) {
    let events: Events = Arc::new(Mutex::new(Vec::new()));
    let record = |events: &Events| {
        let events = Arc::clone(events);
        move |event: String| events.lock().unwrap().push(event)
    };

    let press = record(&events);
    let url = record(&events);
    let token = record(&events);
    let close = record(&events);
    let success = record(&events);
    let error = record(&events);

    let callbacks = LoginCallbacks::new()
        .on_press(move || press("press".to_string()))
        .on_authorization_url(move |u| url(format!("authorization_url:{u}")))
        .on_get_access_token(move |t| token(format!("access_token:{}", t.oauth_token)))
        .on_close(move || close("close".to_string()))
        .on_success(move |user| success(format!("success:{}", user.screen_name)))
        .on_error(move |e| error(format!("error:{}", e.stage().map_or("none", |s| s.as_str()))));

    (callbacks, events)
}

async fn mount_request_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=rt&oauth_token_secret=rs&oauth_callback_confirmed=true",
        ))
        .mount(server)
        .await;
}

async fn mount_access_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(body_string_contains("oauth_verifier=V123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=T&oauth_token_secret=S&user_id=12&screen_name=jack",
        ))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_verify_credentials(server: &MockServer, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 12,
            "id_str": "12",
            "name": "Jack",
            "screen_name": "jack",
            "email": "jack@example.com"
        }))
    } else {
        ResponseTemplate::new(status)
            .set_body_string(r#"{"errors":[{"code":89,"message":"Invalid or expired token."}]}"#)
    };

    Mock::given(method("GET"))
        .and(path("/1.1/account/verify_credentials.json"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_successful_login_fires_callbacks_in_order() {
    let server = MockServer::start().await;
    mount_request_token(&server).await;
    mount_access_token(&server).await;
    mount_verify_credentials(&server, 200).await;

    let (callbacks, events) = recording_callbacks();
    let mut login =
        LoginOrchestrator::new(create_config(&server.uri())).unwrap().with_callbacks(callbacks);

    let state = login.start_login(callback_url()).await.unwrap();
    assert_eq!(state, LoginState::AwaitingUserAuthorization);
    assert_eq!(
        login.session().unwrap().authorization_url(),
        Some(format!("{}/oauth/authorize?oauth_token=rt", server.uri()).as_str())
    );

    let state = login.on_redirect(REDIRECT).await.unwrap();
    assert_eq!(state, LoginState::Success);
    assert!(login.session().is_none());

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "press".to_string(),
            format!("authorization_url:{}/oauth/authorize?oauth_token=rt", server.uri()),
            "access_token:T".to_string(),
            "success:jack".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_redirect_is_consumed_at_most_once() {
    let server = MockServer::start().await;
    mount_request_token(&server).await;
    mount_access_token(&server).await;
    mount_verify_credentials(&server, 200).await;

    let (callbacks, events) = recording_callbacks();
    let mut login =
        LoginOrchestrator::new(create_config(&server.uri())).unwrap().with_callbacks(callbacks);

    login.start_login(callback_url()).await.unwrap();
    login.on_redirect(REDIRECT).await.unwrap();
    let state = login.on_redirect(REDIRECT).await.unwrap();

    assert_eq!(state, LoginState::Success);
    let access_token_events = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.starts_with("access_token:"))
        .count();
    assert_eq!(access_token_events, 1);
    // `mount_access_token` expects exactly one call; verified when `server` drops.
}

#[tokio::test]
async fn test_request_token_failure_never_presents_authorization_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid consumer key"))
        .mount(&server)
        .await;

    let (callbacks, events) = recording_callbacks();
    let mut login =
        LoginOrchestrator::new(create_config(&server.uri())).unwrap().with_callbacks(callbacks);

    let result = login.start_login(callback_url()).await;

    let error = result.unwrap_err();
    assert_eq!(error.stage(), Some(FlowStage::RequestToken));
    assert_eq!(
        login.state(),
        LoginState::Failed(FailureKind::Flow(FlowStage::RequestToken))
    );
    assert!(login.session().is_none());
    assert_eq!(
        *events.lock().unwrap(),
        vec!["press".to_string(), "error:request_token".to_string()]
    );
}

#[tokio::test]
async fn test_dismissal_fires_on_close_only() {
    let server = MockServer::start().await;
    mount_request_token(&server).await;

    let (callbacks, events) = recording_callbacks();
    let mut login =
        LoginOrchestrator::new(create_config(&server.uri())).unwrap().with_callbacks(callbacks);

    login.start_login(callback_url()).await.unwrap();
    let state = login.dismiss();

    assert_eq!(state, LoginState::Failed(FailureKind::UserCancelled));
    let events = events.lock().unwrap();
    assert_eq!(events.last().map(String::as_str), Some("close"));
    assert!(!events.iter().any(|e| e.starts_with("error:")));
}

#[tokio::test]
async fn test_access_token_failure_reports_error() {
    let server = MockServer::start().await;
    mount_request_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid verifier"))
        .mount(&server)
        .await;

    let (callbacks, events) = recording_callbacks();
    let mut login =
        LoginOrchestrator::new(create_config(&server.uri())).unwrap().with_callbacks(callbacks);

    login.start_login(callback_url()).await.unwrap();
    let result = login.on_redirect(REDIRECT).await;

    assert!(matches!(
        result,
        Err(OAuthError::AuthFlow {
            stage: FlowStage::AccessToken,
            ..
        })
    ));
    assert_eq!(
        login.state(),
        LoginState::Failed(FailureKind::Flow(FlowStage::AccessToken))
    );
    let events = events.lock().unwrap();
    assert_eq!(events.last().map(String::as_str), Some("error:access_token"));
    assert!(!events.iter().any(|e| e.starts_with("access_token:")));
}

#[tokio::test]
async fn test_profile_failure_still_delivers_access_token() {
    let server = MockServer::start().await;
    mount_request_token(&server).await;
    mount_access_token(&server).await;
    mount_verify_credentials(&server, 401).await;

    let (callbacks, events) = recording_callbacks();
    let mut login =
        LoginOrchestrator::new(create_config(&server.uri())).unwrap().with_callbacks(callbacks);

    login.start_login(callback_url()).await.unwrap();
    let result = login.on_redirect(REDIRECT).await;

    assert_eq!(
        result.unwrap_err().stage(),
        Some(FlowStage::VerifyCredentials)
    );
    assert_eq!(
        login.state(),
        LoginState::Failed(FailureKind::Flow(FlowStage::VerifyCredentials))
    );
    let events = events.lock().unwrap();
    assert_eq!(
        events[events.len() - 2..],
        ["access_token:T".to_string(), "error:verify_credentials".to_string()]
    );
}

#[tokio::test]
async fn test_login_can_restart_after_terminal_state() {
    let server = MockServer::start().await;
    mount_request_token(&server).await;

    let mut login = LoginOrchestrator::new(create_config(&server.uri())).unwrap();

    login.start_login(callback_url()).await.unwrap();
    assert!(matches!(
        login.start_login(callback_url()).await,
        Err(OAuthError::LoginInProgress)
    ));

    login.dismiss();
    let state = login.start_login(callback_url()).await.unwrap();
    assert_eq!(state, LoginState::AwaitingUserAuthorization);
}

#[tokio::test]
async fn test_custom_scheme_callback_matches_redirect() {
    let server = MockServer::start().await;
    mount_request_token(&server).await;
    mount_access_token(&server).await;
    mount_verify_credentials(&server, 200).await;

    let mut login = LoginOrchestrator::new(create_config(&server.uri())).unwrap();

    login
        .start_login(CallbackUrl::new("myapp://twitter-callback").unwrap())
        .await
        .unwrap();

    // Navigations inside the authorization page are not redirects.
    let state = login
        .on_redirect(&format!("{}/login?redirect_after_login=x", server.uri()))
        .await
        .unwrap();
    assert_eq!(state, LoginState::AwaitingUserAuthorization);

    let state = login
        .on_redirect("myapp://twitter-callback?oauth_token=rt&oauth_verifier=V123")
        .await
        .unwrap();
    assert_eq!(state, LoginState::Success);
}
