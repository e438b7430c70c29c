//! Reqwest-backed auth provider for a GoTrue-compatible identity service.
//!
//! This adapter owns transport details only: endpoint layout, the `apikey`
//! header, redirect targets and translating error payloads into
//! [`AuthProviderError`] variants.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{
    EmailDto, ErrorBodyDto, PasswordGrantDto, PasswordUpdateDto, ResendDto, SessionDto,
    SignUpResponseDto, UserDto,
};
use crate::domain::ports::{AuthProvider, AuthProviderError, SignUpResult};
use crate::domain::{AuthSession, AuthUser, Credentials, EmailAddress, OAuthProvider, Password};

const API_KEY_HEADER: &str = "apikey";

/// Auth provider adapter talking to `<base>/auth/v1/*`.
pub struct GoTrueAuthProvider {
    client: Client,
    base_url: Url,
    api_key: Zeroizing<String>,
    redirect_to: Url,
}

impl GoTrueAuthProvider {
    /// Build an adapter with an explicit request timeout.
    ///
    /// `redirect_to` is where confirmation, reset and OAuth links land.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        redirect_to: Url,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            api_key: Zeroizing::new(api_key.into()),
            redirect_to,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthProviderError> {
        self.base_url
            .join(path)
            .map_err(|err| AuthProviderError::transport(format!("invalid auth endpoint {path}: {err}")))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<RequestBuilder, AuthProviderError> {
        let url = self.endpoint(path)?;
        Ok(self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(bearer.unwrap_or(self.api_key.as_str())))
    }

    fn redirect_query(&self) -> [(&'static str, &str); 1] {
        [("redirect_to", self.redirect_to.as_str())]
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn execute(request: RequestBuilder) -> Result<Vec<u8>, AuthProviderError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, AuthProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        AuthProviderError::decode(format!("invalid auth service JSON payload: {error}"))
    })
}

#[async_trait]
impl AuthProvider for GoTrueAuthProvider {
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, AuthProviderError> {
        let request = self
            .request(Method::POST, "auth/v1/token", None)?
            .query(&[("grant_type", "password")])
            .json(&PasswordGrantDto {
                email: credentials.email().as_str(),
                password: credentials.password().expose(),
            });
        let body = execute(request).await?;
        let session: SessionDto = decode(&body)?;
        Ok(session.into_domain(Utc::now()))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpResult, AuthProviderError> {
        let request = self
            .request(Method::POST, "auth/v1/signup", None)?
            .query(&self.redirect_query())
            .json(&PasswordGrantDto {
                email: credentials.email().as_str(),
                password: credentials.password().expose(),
            });
        let body = execute(request).await?;
        match decode::<SignUpResponseDto>(&body)? {
            SignUpResponseDto::Session(dto) => {
                let session = dto.into_domain(Utc::now());
                Ok(SignUpResult {
                    user: session.user.clone(),
                    session: Some(session),
                })
            }
            SignUpResponseDto::User(user) if user.is_obfuscated_duplicate() => {
                debug!("sign-up returned an obfuscated existing user");
                Err(AuthProviderError::user_already_registered())
            }
            SignUpResponseDto::User(user) => Ok(SignUpResult {
                user: user.into_domain(),
                session: None,
            }),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError> {
        let request = self.request(Method::POST, "auth/v1/logout", Some(access_token))?;
        execute(request).await.map(|_| ())
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), AuthProviderError> {
        let request = self
            .request(Method::POST, "auth/v1/recover", None)?
            .query(&self.redirect_query())
            .json(&EmailDto {
                email: email.as_str(),
            });
        execute(request).await.map(|_| ())
    }

    async fn update_password(
        &self,
        access_token: &str,
        password: &Password,
    ) -> Result<AuthUser, AuthProviderError> {
        let request = self
            .request(Method::PUT, "auth/v1/user", Some(access_token))?
            .json(&PasswordUpdateDto {
                password: password.expose(),
            });
        let body = execute(request).await?;
        let user: UserDto = decode(&body)?;
        Ok(user.into_domain())
    }

    async fn resend_confirmation(&self, email: &EmailAddress) -> Result<(), AuthProviderError> {
        let request = self
            .request(Method::POST, "auth/v1/resend", None)?
            .query(&self.redirect_query())
            .json(&ResendDto {
                kind: "signup",
                email: email.as_str(),
            });
        execute(request).await.map(|_| ())
    }

    fn authorize_url(&self, provider: OAuthProvider) -> Result<Url, AuthProviderError> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("provider", provider.as_str())
                .append_pair("redirect_to", self.redirect_to.as_str());
            for (key, value) in provider.extra_params() {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

fn map_transport_error(error: reqwest::Error) -> AuthProviderError {
    if error.is_timeout() {
        AuthProviderError::transport(format!("timed out: {error}"))
    } else {
        AuthProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AuthProviderError {
    let parsed: ErrorBodyDto = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .message()
        .map_or_else(|| body_preview(body), str::to_owned);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return AuthProviderError::rate_limited();
    }
    let code = parsed
        .error_code
        .as_deref()
        .or(parsed.error.as_deref())
        .unwrap_or_default();
    if let Some(error) = classify_code(code, &message) {
        return error;
    }
    if let Some(error) = classify_message(&message) {
        return error;
    }

    match status {
        StatusCode::UNAUTHORIZED => AuthProviderError::session_missing(),
        _ if status.is_server_error() => {
            AuthProviderError::transport(format!("status {}: {message}", status.as_u16()))
        }
        _ => AuthProviderError::rejected(status.as_u16(), message),
    }
}

fn classify_code(code: &str, message: &str) -> Option<AuthProviderError> {
    let error = match code {
        "invalid_credentials" => AuthProviderError::invalid_credentials(),
        "email_not_confirmed" => AuthProviderError::email_not_confirmed(),
        "user_already_exists" | "email_exists" => AuthProviderError::user_already_registered(),
        "weak_password" => AuthProviderError::weak_password(message),
        "email_address_invalid" => AuthProviderError::invalid_email(message),
        "user_not_found" => AuthProviderError::user_not_found(),
        "session_not_found" | "session_expired" | "no_authorization" | "bad_jwt" => {
            AuthProviderError::session_missing()
        }
        _ if code.starts_with("over_") && code.ends_with("_rate_limit") => {
            AuthProviderError::rate_limited()
        }
        _ => return None,
    };
    Some(error)
}

/// Older services only describe failures in prose.
fn classify_message(message: &str) -> Option<AuthProviderError> {
    let lower = message.to_ascii_lowercase();
    let error = if lower.contains("invalid login credentials") {
        AuthProviderError::invalid_credentials()
    } else if lower.contains("email not confirmed") {
        AuthProviderError::email_not_confirmed()
    } else if lower.contains("already registered") {
        AuthProviderError::user_already_registered()
    } else if lower.contains("password should be") {
        AuthProviderError::weak_password(message)
    } else if lower.contains("invalid email") || lower.contains("unable to validate email") {
        AuthProviderError::invalid_email(message)
    } else if lower.contains("email not found") || lower.contains("user not found") {
        AuthProviderError::user_not_found()
    } else {
        return None;
    };
    Some(error)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
