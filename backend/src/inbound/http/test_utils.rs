//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock, MockClock};
use zeroize::Zeroizing;

use crate::domain::ports::{
    MockAuthCommand, MockChatCommand, MockDirectoryCommand, MockGateQuery, MockNoteSyncCommand,
    MockPreferencesCommand,
};
use crate::domain::{AuthSession, AuthUser, Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub(crate) const SESSION_COOKIE: &str = "session";
pub(crate) const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Session middleware with a fresh key, named `session`, without `Secure`.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by `response`.
///
/// # Panics
///
/// Panics when the response did not set the cookie.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// One mock per driving port; set expectations, then call [`Self::into_state`].
#[derive(Default)]
pub(crate) struct MockPorts {
    pub auth: MockAuthCommand,
    pub gate: MockGateQuery,
    pub preferences: MockPreferencesCommand,
    pub directory: MockDirectoryCommand,
    pub chats: MockChatCommand,
    pub notes: MockNoteSyncCommand,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState {
            auth: Arc::new(self.auth),
            gate: Arc::new(self.gate),
            preferences: Arc::new(self.preferences),
            directory: Arc::new(self.directory),
            chats: Arc::new(self.chats),
            notes: Arc::new(self.notes),
            clock: Arc::new(DefaultClock),
        }
    }
}

#[derive(serde::Deserialize)]
struct TestLoginQuery {
    /// Seconds until the issued access token expires.
    expires_in: Option<i64>,
}

async fn test_login(
    path: web::Path<UserId>,
    query: web::Query<TestLoginQuery>,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> Result<HttpResponse, Error> {
    let expires_at = query
        .expires_in
        .map(|secs| state.clock.utc() + chrono::Duration::seconds(secs));
    session.sign_in(&AuthSession {
        user: AuthUser {
            id: path.into_inner(),
            email: Some("jane@example.com".to_owned()),
            email_confirmed: true,
        },
        access_token: Zeroizing::new(TEST_ACCESS_TOKEN.to_owned()),
        refresh_token: None,
        expires_at,
    })?;
    Ok(HttpResponse::NoContent().finish())
}

/// Clock that tests move forward by hand.
#[derive(Clone)]
pub(crate) struct SteppedClock(Arc<Mutex<DateTime<Utc>>>);

impl SteppedClock {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(Utc::now())))
    }

    pub(crate) fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().expect("clock lock");
        *now += by;
    }

    pub(crate) fn as_clock(&self) -> Arc<dyn Clock> {
        let now = Arc::clone(&self.0);
        let mut clock = MockClock::new();
        clock
            .expect_utc()
            .returning(move || *now.lock().expect("clock lock"));
        Arc::new(clock)
    }
}

/// App with session middleware, a `/test-login/{user_id}` route and the
/// given services under `/api/v1`.
pub(crate) fn test_app(
    state: HttpState,
    configure: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route("/test-login/{user_id}", web::post().to(test_login))
        .service(web::scope("/api/v1").configure(configure))
}

/// Sign `user_id` in and return the resulting session cookie.
pub(crate) async fn sign_in<S>(app: &S, user_id: UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    sign_in_at(app, &format!("/test-login/{user_id}")).await
}

/// Sign `user_id` in with a token lasting `expires_in` seconds.
pub(crate) async fn sign_in_expiring<S>(app: &S, user_id: UserId, expires_in: i64) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    sign_in_at(app, &format!("/test-login/{user_id}?expires_in={expires_in}")).await
}

async fn sign_in_at<S>(app: &S, uri: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, test::TestRequest::post().uri(uri).to_request()).await;
    assert!(response.status().is_success(), "test login failed");
    session_cookie(&response)
}
