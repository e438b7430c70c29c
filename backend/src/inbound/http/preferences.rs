//! Onboarding profile HTTP handlers.
//!
//! ```text
//! GET /api/v1/users/me/preferences
//! PUT /api/v1/users/me/preferences
//! GET /api/v1/onboarding/options
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    DEFAULT_TIMEZONE, DEFAULT_WEEKLY_TARGET, Error, INDUSTRIES, OnboardingDraft, OnboardingStep,
    ROLES, UserPreferences, WEEKLY_TARGET_RANGE,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Choices offered by the onboarding wizard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOptions {
    pub steps: Vec<OnboardingStep>,
    #[schema(value_type = Vec<String>)]
    pub roles: Vec<&'static str>,
    #[schema(value_type = Vec<String>)]
    pub industries: Vec<&'static str>,
    pub weekly_target_min: u8,
    pub weekly_target_max: u8,
    pub default_weekly_target: u8,
    #[schema(value_type = String)]
    pub default_timezone: &'static str,
}

impl OnboardingOptions {
    fn current() -> Self {
        Self {
            steps: OnboardingStep::ALL.to_vec(),
            roles: ROLES.to_vec(),
            industries: INDUSTRIES.to_vec(),
            weekly_target_min: *WEEKLY_TARGET_RANGE.start(),
            weekly_target_max: *WEEKLY_TARGET_RANGE.end(),
            default_weekly_target: DEFAULT_WEEKLY_TARGET,
            default_timezone: DEFAULT_TIMEZONE,
        }
    }
}

/// Fetch the signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/preferences",
    description = "Fetch the profile, creating an empty one if none exists.",
    responses(
        (
            status = 200,
            description = "User preferences",
            headers(("Cache-Control" = String, description = "Cache control header")),
            body = UserPreferences
        ),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUserPreferences"
)]
#[get("/users/me/preferences")]
pub async fn get_preferences(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let preferences = state.preferences.fetch(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache())
        .json(preferences))
}

/// Submit the completed onboarding wizard.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/preferences",
    request_body = OnboardingDraft,
    responses(
        (status = 200, description = "Saved preferences", body = UserPreferences),
        (status = 400, description = "A wizard step failed validation", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "completeOnboarding"
)]
#[put("/users/me/preferences")]
pub async fn complete_onboarding(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OnboardingDraft>,
) -> ApiResult<web::Json<UserPreferences>> {
    let user_id = session.require_user_id()?;
    let saved = state
        .preferences
        .complete_onboarding(&user_id, payload.into_inner())
        .await?;
    Ok(web::Json(saved))
}

/// Roles, industries and limits for the wizard.
#[utoipa::path(
    get,
    path = "/api/v1/onboarding/options",
    responses((status = 200, description = "Wizard options", body = OnboardingOptions)),
    tags = ["users"],
    operation_id = "getOnboardingOptions",
    security([])
)]
#[get("/onboarding/options")]
pub async fn onboarding_options() -> HttpResponse {
    HttpResponse::Ok().json(OnboardingOptions::current())
}
