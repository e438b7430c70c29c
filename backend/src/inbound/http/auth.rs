//! Account and session HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/login
//! POST /api/v1/auth/signup
//! POST /api/v1/auth/logout
//! POST /api/v1/auth/password-reset
//! PUT  /api/v1/auth/password
//! POST /api/v1/auth/resend-confirmation
//! GET  /api/v1/auth/oauth/{provider}
//! ```
//!
//! Inputs are validated before the auth service is called. A successful
//! login stores the user id and access token in the encrypted cookie.

use actix_web::{HttpResponse, get, http::header, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    AuthSession, Credentials, EmailAddress, Error, Password, PendingConfirmation, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{auth_validation_error, parse_provider};

/// Email and password submitted to log in or sign up.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub password: String,
}

/// A bare email address.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
}

/// New password, optionally with the token from a recovery link.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    pub password: String,
    /// Access token from the recovery link; the cookie session is used when
    /// absent.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Signed-in user summary. Tokens stay in the cookie.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: UserId,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&AuthSession> for SessionResponse {
    fn from(session: &AuthSession) -> Self {
        Self {
            user_id: session.user_id(),
            email: session.user.email.clone(),
            expires_at: session.expires_at,
        }
    }
}

fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::parse(raw).map_err(auth_validation_error)
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = SessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid email or password", body = Error),
        (status = 403, description = "Email not confirmed", body = Error),
        (status = 503, description = "Auth service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::sign_in(&payload.email, &payload.password).map_err(auth_validation_error)?;
    let auth_session = state.auth.sign_in(&credentials).await?;
    session.sign_in(&auth_session)?;
    Ok(HttpResponse::Ok().json(SessionResponse::from(&auth_session)))
}

/// Register an account pending email confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Confirmation email sent", body = PendingConfirmation),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Already registered", body = Error),
        (status = 503, description = "Auth service unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::sign_up(&payload.email, &payload.password).map_err(auth_validation_error)?;
    let pending = state.auth.sign_up(&credentials).await?;
    Ok(HttpResponse::Created().json(pending))
}

/// Revoke the session and clear the cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    if let Some(token) = session.access_token()? {
        state.auth.sign_out(&token).await?;
    }
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

/// Email a password reset link.
#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset",
    request_body = EmailRequest,
    responses(
        (status = 202, description = "Reset email sent"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No account for this email", body = Error)
    ),
    tags = ["auth"],
    operation_id = "requestPasswordReset",
    security([])
)]
#[post("/auth/password-reset")]
pub async fn request_password_reset(
    state: web::Data<HttpState>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email)?;
    state.auth.request_password_reset(&email).await?;
    Ok(HttpResponse::Accepted().finish())
}

/// Set a new password for the recovery or cookie session.
#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    request_body = PasswordUpdateRequest,
    responses(
        (status = 204, description = "Password updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Reset link expired", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updatePassword"
)]
#[put("/auth/password")]
pub async fn update_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordUpdateRequest>,
) -> ApiResult<HttpResponse> {
    let PasswordUpdateRequest {
        password,
        access_token,
    } = payload.into_inner();
    let password = Password::new_secret(&password).map_err(auth_validation_error)?;
    let token = match access_token.filter(|token| !token.trim().is_empty()) {
        Some(token) => Zeroizing::new(token),
        None => session.access_token()?.ok_or_else(|| {
            Error::unauthorized("Password reset link has expired. Please request a new one.")
        })?,
    };
    state.auth.update_password(&token, &password).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Send the confirmation email again.
#[utoipa::path(
    post,
    path = "/api/v1/auth/resend-confirmation",
    request_body = EmailRequest,
    responses(
        (status = 202, description = "Confirmation email sent"),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["auth"],
    operation_id = "resendConfirmation",
    security([])
)]
#[post("/auth/resend-confirmation")]
pub async fn resend_confirmation(
    state: web::Data<HttpState>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email)?;
    state.auth.resend_confirmation(&email).await?;
    Ok(HttpResponse::Accepted().finish())
}

/// Redirect the browser to the provider's consent page.
#[utoipa::path(
    get,
    path = "/api/v1/auth/oauth/{provider}",
    params(("provider" = String, Path, description = "OAuth provider, e.g. `google`")),
    responses(
        (status = 302, description = "Redirect to the provider"),
        (status = 400, description = "Unsupported provider", body = Error)
    ),
    tags = ["auth"],
    operation_id = "oauthAuthorize",
    security([])
)]
#[get("/auth/oauth/{provider}")]
pub async fn oauth_authorize(
    state: web::Data<HttpState>,
    provider: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let provider = parse_provider(&provider)?;
    let url = state.auth.oauth_authorize_url(provider)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url.as_str()))
        .finish())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
