//! Wire types for the hosted auth service (GoTrue-compatible JSON).
//!
//! Responses decode into these DTOs first and convert into domain values in
//! one pass, so the adapter never hands partially-parsed payloads upward.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{AuthSession, AuthUser, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct EmailDto<'a> {
    pub(super) email: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ResendDto<'a> {
    #[serde(rename = "type")]
    pub(super) kind: &'static str,
    pub(super) email: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordUpdateDto<'a> {
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: Uuid,
    pub(super) email: Option<String>,
    pub(super) email_confirmed_at: Option<String>,
    pub(super) confirmed_at: Option<String>,
    /// Empty when the service obfuscates an already-registered address.
    pub(super) identities: Option<Vec<serde_json::Value>>,
}

impl UserDto {
    pub(super) fn is_obfuscated_duplicate(&self) -> bool {
        self.identities.as_ref().is_some_and(Vec::is_empty)
    }

    pub(super) fn into_domain(self) -> AuthUser {
        AuthUser {
            id: UserId::from_uuid(self.id),
            email: self.email,
            email_confirmed: self.email_confirmed_at.is_some() || self.confirmed_at.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) access_token: String,
    pub(super) refresh_token: Option<String>,
    pub(super) expires_in: Option<i64>,
    pub(super) expires_at: Option<i64>,
    pub(super) user: UserDto,
}

impl SessionDto {
    pub(super) fn into_domain(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| {
                self.expires_in
                    .and_then(Duration::try_seconds)
                    .and_then(|ttl| now.checked_add_signed(ttl))
            });
        AuthSession {
            user: self.user.into_domain(),
            access_token: Zeroizing::new(self.access_token),
            refresh_token: self.refresh_token.map(Zeroizing::new),
            expires_at,
        }
    }
}

/// Sign-up answers with a session when confirmation is off, a bare user
/// otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    Session(SessionDto),
    User(UserDto),
}

/// Error body. Newer services send `error_code`/`msg`, older ones
/// `error`/`error_description`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    pub(super) error_code: Option<String>,
    pub(super) msg: Option<String>,
    pub(super) message: Option<String>,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn message(&self) -> Option<&str> {
        self.msg
            .as_deref()
            .or(self.error_description.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
    }
}
