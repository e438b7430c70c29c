//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for people, chats and notes, the
//! services that implement the driving ports, and the ports that outbound
//! adapters implement. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - AccessGate / GateState: session and profile routing.
//! - NoteSyncService / NoteEditor: per-chat note loading and saving.

pub mod access_gate;
pub mod auth;
pub mod auth_service;
pub mod chat;
pub mod chat_service;
pub mod company;
pub mod directory_service;
pub mod error;
pub mod ids;
pub mod note;
pub mod note_editor;
pub mod note_sync;
pub mod onboarding;
pub mod person;
pub mod ports;
pub mod preferences;
pub mod preferences_service;
pub mod trace_id;

pub use self::access_gate::{AccessGate, AccessGateHandle, GateState, GateView, ProfileStatus};
pub use self::auth::{
    AuthSession, AuthUser, AuthValidationError, Credentials, EmailAddress, MIN_PASSWORD_LENGTH,
    OAuthProvider, Password, PendingConfirmation, expiry_passed,
};
pub use self::auth_service::{AuthService, INVALID_CREDENTIALS_MESSAGE};
pub use self::chat::{
    Chat, ChatDraft, ChatListing, ChatStatus, ChatValidationError, DEFAULT_LOCATION_LABEL,
    Dashboard, NewChat, ParseChatStatusError, location_label, parse_scheduled_at,
};
pub use self::chat_service::ChatService;
pub use self::company::{Company, CompanyRef, company_label};
pub use self::directory_service::DirectoryService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{ChatId, CompanyId, NoteId, PersonId, UserId};
pub use self::note::{
    NewNote, Note, NoteContent, NoteSections, ParseSectionNameError, SectionName, normalize_tags,
};
pub use self::note_editor::{NoteEditor, SaveStatus};
pub use self::note_sync::{ChatNotes, NoteSyncService};
pub use self::onboarding::{
    OnboardingDraft, OnboardingError, OnboardingStep, OnboardingWizard, WEEKLY_TARGET_RANGE,
};
pub use self::person::{
    NewPerson, Person, PersonDraft, PersonEntry, PersonValidationError, ProfileUrl, filter_people,
};
pub use self::preferences::{
    DEFAULT_TIMEZONE, DEFAULT_WEEKLY_TARGET, INDUSTRIES, ROLES, UserPreferences,
    UserPreferencesBuilder,
};
pub use self::preferences_service::PreferencesService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use coffee_chat::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
