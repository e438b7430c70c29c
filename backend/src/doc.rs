//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http` plus the request
//! and response types they reference, and adds the session cookie security
//! scheme. Swagger UI serves it in debug builds and `openapi-dump` prints it
//! for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Chat, ChatListing, ChatNotes, ChatStatus, Company, CompanyRef, Dashboard, Error, ErrorCode,
    GateView, Note, NoteContent, NoteSections, OnboardingDraft, OnboardingStep,
    PendingConfirmation, Person, PersonEntry, SectionName, UserPreferences,
};
use crate::inbound::http::auth::{
    CredentialsRequest, EmailRequest, PasswordUpdateRequest, SessionResponse,
};
use crate::inbound::http::chats::ScheduleChatRequest;
use crate::inbound::http::directory::CreatePersonRequest;
use crate::inbound::http::gate::{GateResponse, GateStateDto};
use crate::inbound::http::health::{HealthBody, HealthStatus};
use crate::inbound::http::notes::{
    InterviewRelevantRequest, SaveNoteRequest, SectionUpdateRequest, TagsUpdateRequest,
};
use crate::inbound::http::preferences::OnboardingOptions;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Coffee chat API",
        description = "Track networking chats, the people behind them and structured notes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::request_password_reset,
        crate::inbound::http::auth::update_password,
        crate::inbound::http::auth::resend_confirmation,
        crate::inbound::http::auth::oauth_authorize,
        crate::inbound::http::gate::resolve_gate,
        crate::inbound::http::preferences::get_preferences,
        crate::inbound::http::preferences::complete_onboarding,
        crate::inbound::http::preferences::onboarding_options,
        crate::inbound::http::directory::list_people,
        crate::inbound::http::directory::create_person,
        crate::inbound::http::directory::list_companies,
        crate::inbound::http::chats::dashboard,
        crate::inbound::http::chats::schedule_chat,
        crate::inbound::http::notes::get_note,
        crate::inbound::http::notes::save_note,
        crate::inbound::http::notes::update_section,
        crate::inbound::http::notes::set_interview_relevant,
        crate::inbound::http::notes::update_tags,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        EmailRequest,
        PasswordUpdateRequest,
        SessionResponse,
        PendingConfirmation,
        GateResponse,
        GateStateDto,
        GateView,
        UserPreferences,
        OnboardingDraft,
        OnboardingStep,
        OnboardingOptions,
        Person,
        PersonEntry,
        CreatePersonRequest,
        Company,
        CompanyRef,
        Chat,
        ChatStatus,
        ChatListing,
        Dashboard,
        ScheduleChatRequest,
        ChatNotes,
        Note,
        NoteContent,
        NoteSections,
        SectionName,
        SaveNoteRequest,
        SectionUpdateRequest,
        InterviewRelevantRequest,
        TagsUpdateRequest,
        HealthBody,
        HealthStatus,
    )),
    tags(
        (name = "auth", description = "Sign-up, sign-in and password recovery"),
        (name = "gate", description = "Which top-level view to show"),
        (name = "users", description = "Onboarding profile"),
        (name = "directory", description = "People and companies"),
        (name = "chats", description = "Dashboard and scheduling"),
        (name = "notes", description = "Structured chat notes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
