//! Driving port for account and session flows.

use async_trait::async_trait;
use url::Url;

use crate::domain::{
    AuthSession, Credentials, EmailAddress, Error, OAuthProvider, Password, PendingConfirmation,
};

/// Authentication use cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, Error>;

    /// Register an account; the user must confirm their email before signing in.
    async fn sign_up(&self, credentials: &Credentials) -> Result<PendingConfirmation, Error>;

    /// Revoke the session. Provider failures are logged, not returned.
    async fn sign_out(&self, access_token: &str) -> Result<(), Error>;

    /// Email a password reset link.
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error>;

    /// Set a new password for the session behind `access_token`.
    async fn update_password(&self, access_token: &str, password: &Password) -> Result<(), Error>;

    /// Send the confirmation email again.
    async fn resend_confirmation(&self, email: &EmailAddress) -> Result<(), Error>;

    /// URL the browser should visit to start OAuth sign-in.
    fn oauth_authorize_url(&self, provider: OAuthProvider) -> Result<Url, Error>;
}
