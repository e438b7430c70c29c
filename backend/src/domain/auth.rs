//! Authentication primitives: credentials, sessions and provider identifiers.
//!
//! Constructors validate raw strings before any call reaches the auth
//! provider, so handlers can reject malformed input without a round trip.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::UserId;

/// Shortest password the auth service accepts.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validation failures for authentication inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain`.
    InvalidEmail,
    /// Password was empty.
    EmptyPassword,
    /// Password is shorter than [`MIN_PASSWORD_LENGTH`].
    PasswordTooShort { min: usize },
}

impl AuthValidationError {
    /// Request field the failure refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmptyPassword => "empty_password",
            Self::PasswordTooShort { .. } => "password_too_short",
        }
    }
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "Please enter your email address."),
            Self::InvalidEmail => write!(f, "Please enter a valid email address."),
            Self::EmptyPassword => write!(f, "Please enter your password."),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters long.")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Trimmed email address with a non-empty local part and domain.
///
/// # Examples
/// ```
/// use coffee_chat::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  jane@example.com ").expect("valid email");
/// assert_eq!(email.as_str(), "jane@example.com");
/// assert!(EmailAddress::parse("jane.example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "jane@example.com")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalize a raw email string.
    pub fn parse(raw: &str) -> Result<Self, AuthValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        let valid = trimmed
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            })
            && !trimmed.chars().any(char::is_whitespace);
        if !valid {
            return Err(AuthValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AuthValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Password held in memory that is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password, as used for sign-in.
    pub fn existing(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Accept a password chosen by the user, enforcing the minimum length.
    pub fn new_secret(raw: &str) -> Result<Self, AuthValidationError> {
        let password = Self::existing(raw)?;
        if raw.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(password)
    }

    /// Expose the secret to the provider adapter.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Email and password pair submitted to sign in or sign up.
///
/// # Examples
/// ```
/// use coffee_chat::domain::Credentials;
///
/// let creds = Credentials::sign_in("jane@example.com", "secret").expect("valid");
/// assert_eq!(creds.email().as_str(), "jane@example.com");
/// assert!(Credentials::sign_up("jane@example.com", "12345").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Password,
}

impl Credentials {
    /// Credentials for an existing account.
    pub fn sign_in(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        Ok(Self {
            email: EmailAddress::parse(email)?,
            password: Password::existing(password)?,
        })
    }

    /// Credentials for a new account; the password must meet the length rule.
    pub fn sign_up(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        Ok(Self {
            email: EmailAddress::parse(email)?,
            password: Password::new_secret(password)?,
        })
    }

    /// Account email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Account password.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Account details reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Option<String>,
    pub email_confirmed: bool,
}

/// An authenticated session issued by the auth provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: Zeroizing<String>,
    pub refresh_token: Option<Zeroizing<String>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Identifier of the signed-in user.
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// Whether the access token has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        expiry_passed(self.expires_at, now)
    }
}

/// Whether a session expiring at `expires_at` is over at `now`. Sessions
/// without an expiry never lapse.
pub fn expiry_passed(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|expiry| expiry <= now)
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("access_token", &"***")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Result of a sign-up that requires email confirmation before sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingConfirmation {
    pub user_id: UserId,
    pub email: String,
}

/// External identity providers supported for OAuth sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    /// Provider name understood by the auth service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }

    /// Extra authorize query parameters required by the provider.
    pub fn extra_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Google => &[("access_type", "offline"), ("prompt", "consent")],
        }
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            other => Err(format!("unsupported OAuth provider: {other}")),
        }
    }
}
