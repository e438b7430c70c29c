//! Tests for the authentication service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockAuthProvider, MockUserPreferencesRepository, SignUpResult, UserPreferencesRepositoryError,
};
use crate::domain::{AuthUser, ErrorCode};
use rstest::{fixture, rstest};
use zeroize::Zeroizing;

type Service = AuthService<MockAuthProvider, MockUserPreferencesRepository>;

fn make_service(provider: MockAuthProvider, prefs: MockUserPreferencesRepository) -> Service {
    AuthService::new(Arc::new(provider), Arc::new(prefs))
}

fn user(confirmed: bool) -> AuthUser {
    AuthUser {
        id: UserId::random(),
        email: Some("jane@example.com".to_owned()),
        email_confirmed: confirmed,
    }
}

fn session(confirmed: bool) -> AuthSession {
    AuthSession {
        user: user(confirmed),
        access_token: Zeroizing::new("access".to_owned()),
        refresh_token: Some(Zeroizing::new("refresh".to_owned())),
        expires_at: None,
    }
}

#[fixture]
fn credentials() -> Credentials {
    Credentials::sign_up("jane@example.com", "secret1").expect("valid credentials")
}

#[rstest]
#[tokio::test]
async fn sign_in_ensures_preferences_row(credentials: Credentials) {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_in_with_password()
        .times(1)
        .return_once(|_| Ok(session(true)));
    let mut prefs = MockUserPreferencesRepository::new();
    prefs.expect_ensure_exists().times(1).return_once(|_| Ok(()));

    let signed_in = make_service(provider, prefs)
        .sign_in(&credentials)
        .await
        .expect("sign in succeeds");
    assert_eq!(signed_in.access_token.as_str(), "access");
}

#[rstest]
#[tokio::test]
async fn sign_in_survives_preferences_failure(credentials: Credentials) {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_in_with_password()
        .return_once(|_| Ok(session(true)));
    let mut prefs = MockUserPreferencesRepository::new();
    prefs
        .expect_ensure_exists()
        .return_once(|_| Err(UserPreferencesRepositoryError::query("boom")));

    let result = make_service(provider, prefs).sign_in(&credentials).await;
    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn invalid_credentials_get_friendly_message(credentials: Credentials) {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_in_with_password()
        .return_once(|_| Err(AuthProviderError::InvalidCredentials));
    let mut prefs = MockUserPreferencesRepository::new();
    prefs.expect_ensure_exists().never();

    let err = make_service(provider, prefs)
        .sign_in(&credentials)
        .await
        .expect_err("invalid credentials");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn unconfirmed_email_triggers_resend(credentials: Credentials) {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_in_with_password()
        .return_once(|_| Err(AuthProviderError::EmailNotConfirmed));
    provider
        .expect_resend_confirmation()
        .withf(|email| email.as_str() == "jane@example.com")
        .times(1)
        .return_once(|_| Ok(()));

    let err = make_service(provider, MockUserPreferencesRepository::new())
        .sign_in(&credentials)
        .await
        .expect_err("unconfirmed");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    let details = err.details().expect("details");
    assert_eq!(details["code"], "email_not_confirmed");
    assert_eq!(details["confirmationResent"], true);
}

#[rstest]
#[tokio::test]
async fn unconfirmed_session_is_rejected(credentials: Credentials) {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_in_with_password()
        .return_once(|_| Ok(session(false)));
    provider
        .expect_resend_confirmation()
        .return_once(|_| Err(AuthProviderError::RateLimited));

    let err = make_service(provider, MockUserPreferencesRepository::new())
        .sign_in(&credentials)
        .await
        .expect_err("unconfirmed");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn sign_up_creates_preferences_and_awaits_confirmation(credentials: Credentials) {
    let created = user(false);
    let user_id = created.id;
    let mut provider = MockAuthProvider::new();
    provider.expect_sign_up().return_once(move |_| {
        Ok(SignUpResult {
            user: created,
            session: None,
        })
    });
    let mut prefs = MockUserPreferencesRepository::new();
    prefs
        .expect_ensure_exists()
        .withf(move |id| *id == user_id)
        .times(1)
        .return_once(|_| Ok(()));

    let pending = make_service(provider, prefs)
        .sign_up(&credentials)
        .await
        .expect("sign up succeeds");
    assert_eq!(pending.user_id, user_id);
    assert_eq!(pending.email, "jane@example.com");
}

#[rstest]
#[case::confirmed(SignUpResult { user: user(true), session: None })]
#[case::with_session(SignUpResult { user: user(false), session: Some(session(false)) })]
#[tokio::test]
async fn sign_up_for_existing_account_conflicts(
    credentials: Credentials,
    #[case] outcome: SignUpResult,
) {
    let mut provider = MockAuthProvider::new();
    provider.expect_sign_up().return_once(move |_| Ok(outcome));
    let mut prefs = MockUserPreferencesRepository::new();
    prefs.expect_ensure_exists().returning(|_| Ok(()));

    let err = make_service(provider, prefs)
        .sign_up(&credentials)
        .await
        .expect_err("already registered");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(AuthProviderError::UserAlreadyRegistered, ErrorCode::Conflict)]
#[case(AuthProviderError::weak_password("too weak"), ErrorCode::InvalidRequest)]
#[case(AuthProviderError::invalid_email("bad"), ErrorCode::InvalidRequest)]
#[case(AuthProviderError::transport("timeout"), ErrorCode::ServiceUnavailable)]
#[case(AuthProviderError::decode("not json"), ErrorCode::InternalError)]
#[tokio::test]
async fn sign_up_maps_provider_errors(
    credentials: Credentials,
    #[case] error: AuthProviderError,
    #[case] expected: ErrorCode,
) {
    let mut provider = MockAuthProvider::new();
    provider.expect_sign_up().return_once(move |_| Err(error));
    let mut prefs = MockUserPreferencesRepository::new();
    prefs.expect_ensure_exists().never();

    let err = make_service(provider, prefs)
        .sign_up(&credentials)
        .await
        .expect_err("provider error");
    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn sign_out_ignores_provider_failure() {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_sign_out()
        .return_once(|_| Err(AuthProviderError::SessionMissing));
    let result = make_service(provider, MockUserPreferencesRepository::new())
        .sign_out("token")
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn expired_reset_link_is_reported() {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_update_password()
        .return_once(|_, _| Err(AuthProviderError::SessionMissing));
    let password = Password::new_secret("new-secret").expect("password");

    let err = make_service(provider, MockUserPreferencesRepository::new())
        .update_password("token", &password)
        .await
        .expect_err("expired link");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert!(err.message().contains("expired"));
}

#[tokio::test]
async fn oauth_url_comes_from_provider() {
    let mut provider = MockAuthProvider::new();
    provider
        .expect_authorize_url()
        .withf(|provider| *provider == OAuthProvider::Google)
        .return_once(|_| {
            Url::parse("https://auth.example.com/authorize?provider=google").map_err(|err| {
                AuthProviderError::decode(err.to_string())
            })
        });

    let url = make_service(provider, MockUserPreferencesRepository::new())
        .oauth_authorize_url(OAuthProvider::Google)
        .expect("authorize url");
    assert_eq!(url.host_str(), Some("auth.example.com"));
}
