//! Port for the external identity service.
//!
//! Adapters translate provider responses into [`AuthProviderError`] variants
//! so the domain can choose user-facing messages without parsing wire text.

use async_trait::async_trait;
use url::Url;

use crate::domain::{AuthSession, AuthUser, Credentials, EmailAddress, OAuthProvider, Password};

use super::define_port_error;

define_port_error! {
    /// Failures reported by the auth provider.
    pub enum AuthProviderError {
        /// Email and password did not match an account.
        InvalidCredentials => "invalid login credentials",
        /// The account exists but its email is unconfirmed.
        EmailNotConfirmed => "email not confirmed",
        /// Sign-up for an email that already has an account.
        UserAlreadyRegistered => "user already registered",
        /// The provider rejected the password.
        WeakPassword { message: String } => "weak password: {message}",
        /// The provider rejected the email address.
        InvalidEmail { message: String } => "invalid email: {message}",
        /// No account matches the email.
        UserNotFound => "user not found",
        /// The access token is missing, expired or revoked.
        SessionMissing => "auth session missing",
        /// Too many requests for this account or address.
        RateLimited => "rate limited by auth provider",
        /// Any other provider-side rejection.
        Rejected { status: u16, message: String } => "auth provider rejected request ({status}): {message}",
        /// The provider could not be reached.
        Transport { message: String } => "auth provider unreachable: {message}",
        /// The provider answered with an unexpected payload.
        Decode { message: String } => "auth provider response malformed: {message}",
    }
}

/// Sign-up response: the created user and, when confirmation is disabled, a
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResult {
    pub user: AuthUser,
    pub session: Option<AuthSession>,
}

/// Session management operations of the identity service.
///
/// Adapters own the redirect target used in confirmation, reset and OAuth
/// links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, AuthProviderError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, AuthProviderError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError>;

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), AuthProviderError>;

    async fn update_password(
        &self,
        access_token: &str,
        password: &Password,
    ) -> Result<AuthUser, AuthProviderError>;

    async fn resend_confirmation(&self, email: &EmailAddress) -> Result<(), AuthProviderError>;

    /// Browser URL that starts an OAuth sign-in.
    fn authorize_url(&self, provider: OAuthProvider) -> Result<Url, AuthProviderError>;
}
