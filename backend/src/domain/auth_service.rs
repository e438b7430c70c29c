//! Account flows on top of the [`AuthProvider`] port.
//!
//! Provider failures become user-facing messages here. Creating the empty
//! preferences row after sign-up or sign-in is best effort: a failure is
//! logged and never blocks authentication.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use url::Url;

use super::ports::{
    AuthCommand, AuthProvider, AuthProviderError, UserPreferencesRepository,
};
use super::{
    AuthSession, Credentials, EmailAddress, Error, OAuthProvider, Password, PendingConfirmation,
    UserId,
};

/// Message shown for a wrong email or password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password. If you signed up with \
Google, please use the \"Sign in with Google\" button.";

/// Implements [`AuthCommand`].
pub struct AuthService<A, P> {
    provider: Arc<A>,
    preferences: Arc<P>,
}

impl<A, P> AuthService<A, P> {
    pub fn new(provider: Arc<A>, preferences: Arc<P>) -> Self {
        Self {
            provider,
            preferences,
        }
    }
}

fn map_provider_error(error: AuthProviderError) -> Error {
    match error {
        AuthProviderError::InvalidCredentials => Error::unauthorized(INVALID_CREDENTIALS_MESSAGE),
        AuthProviderError::EmailNotConfirmed => {
            Error::forbidden("Please confirm your email address before signing in.")
                .with_details(json!({ "code": "email_not_confirmed" }))
        }
        AuthProviderError::UserAlreadyRegistered => Error::conflict(
            "An account with this email already exists. Please sign in instead.",
        )
        .with_details(json!({ "code": "user_already_registered" })),
        AuthProviderError::WeakPassword { message } => Error::invalid_request(message)
            .with_details(json!({ "field": "password", "code": "weak_password" })),
        AuthProviderError::InvalidEmail { .. } => {
            Error::invalid_request("Please enter a valid email address.")
                .with_details(json!({ "field": "email", "code": "invalid_email" }))
        }
        AuthProviderError::UserNotFound => {
            Error::not_found("No account found with this email address.")
        }
        AuthProviderError::SessionMissing => Error::unauthorized(
            "Your session has expired. Please sign in again.",
        ),
        AuthProviderError::RateLimited => {
            Error::service_unavailable("Too many attempts. Please wait a moment and try again.")
        }
        AuthProviderError::Rejected { status, message } => {
            warn!(status, %message, "auth provider rejected request");
            Error::invalid_request(message)
        }
        AuthProviderError::Transport { message } => {
            Error::service_unavailable(format!("auth service unavailable: {message}"))
        }
        AuthProviderError::Decode { message } => {
            Error::internal(format!("auth service response malformed: {message}"))
        }
    }
}

impl<A, P> AuthService<A, P>
where
    A: AuthProvider,
    P: UserPreferencesRepository,
{
    async fn ensure_preferences(&self, user_id: &UserId) {
        if let Err(err) = self.preferences.ensure_exists(user_id).await {
            warn!(%user_id, error = %err, "could not create preferences row");
        }
    }

    async fn unconfirmed_email(&self, email: &EmailAddress) -> Error {
        match self.provider.resend_confirmation(email).await {
            Ok(()) => Error::forbidden(
                "Your email is not confirmed. We've sent a new confirmation email; please check \
                 your inbox.",
            )
            .with_details(json!({ "code": "email_not_confirmed", "confirmationResent": true })),
            Err(err) => {
                warn!(error = %err, "confirmation resend failed");
                map_provider_error(AuthProviderError::EmailNotConfirmed)
            }
        }
    }
}

#[async_trait]
impl<A, P> AuthCommand for AuthService<A, P>
where
    A: AuthProvider,
    P: UserPreferencesRepository,
{
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, Error> {
        let session = match self.provider.sign_in_with_password(credentials).await {
            Ok(session) => session,
            Err(AuthProviderError::EmailNotConfirmed) => {
                return Err(self.unconfirmed_email(credentials.email()).await);
            }
            Err(err) => return Err(map_provider_error(err)),
        };
        if !session.user.email_confirmed {
            return Err(self.unconfirmed_email(credentials.email()).await);
        }
        self.ensure_preferences(&session.user_id()).await;
        info!(user_id = %session.user_id(), "user signed in");
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<PendingConfirmation, Error> {
        let result = self
            .provider
            .sign_up(credentials)
            .await
            .map_err(map_provider_error)?;
        self.ensure_preferences(&result.user.id).await;

        if result.user.email_confirmed || result.session.is_some() {
            return Err(map_provider_error(AuthProviderError::UserAlreadyRegistered));
        }
        info!(user_id = %result.user.id, "sign-up pending email confirmation");
        Ok(PendingConfirmation {
            user_id: result.user.id,
            email: result
                .user
                .email
                .unwrap_or_else(|| credentials.email().to_string()),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
        if let Err(err) = self.provider.sign_out(access_token).await {
            warn!(error = %err, "remote sign-out failed; clearing local session anyway");
        }
        Ok(())
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        self.provider
            .send_password_reset(email)
            .await
            .map_err(map_provider_error)
    }

    async fn update_password(&self, access_token: &str, password: &Password) -> Result<(), Error> {
        match self.provider.update_password(access_token, password).await {
            Ok(user) => {
                info!(user_id = %user.id, "password updated");
                Ok(())
            }
            Err(AuthProviderError::SessionMissing) => Err(Error::unauthorized(
                "Password reset link has expired. Please request a new one.",
            )),
            Err(err) => Err(map_provider_error(err)),
        }
    }

    async fn resend_confirmation(&self, email: &EmailAddress) -> Result<(), Error> {
        self.provider
            .resend_confirmation(email)
            .await
            .map_err(map_provider_error)
    }

    fn oauth_authorize_url(&self, provider: OAuthProvider) -> Result<Url, Error> {
        self.provider
            .authorize_url(provider)
            .map_err(map_provider_error)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
