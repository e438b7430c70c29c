//! Scheduled chats and the home dashboard listing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ChatId, NoteId, PersonId, UserId};

/// Label shown when a chat has no location.
pub const DEFAULT_LOCATION_LABEL: &str = "Virtual";

/// Lifecycle of a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl ChatStatus {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chat status: {input}")]
pub struct ParseChatStatusError {
    pub input: String,
}

impl FromStr for ChatStatus {
    type Err = ParseChatStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseChatStatusError {
                input: other.to_owned(),
            }),
        }
    }
}

/// Stored chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    pub user_id: UserId,
    pub person_id: PersonId,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
    pub status: ChatStatus,
    pub prep_notes: Option<String>,
    pub note_id: Option<NoteId>,
}

impl Chat {
    pub fn location_label(&self) -> &str {
        location_label(self.location.as_deref())
    }
}

/// Location text for display, defaulting to [`DEFAULT_LOCATION_LABEL`].
pub fn location_label(location: Option<&str>) -> &str {
    match location.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_LOCATION_LABEL,
    }
}

/// Validation failures for scheduling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatValidationError {
    PersonRequired,
    DateTimeRequired,
    InvalidDateTime,
}

impl ChatValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::PersonRequired => "personId",
            Self::DateTimeRequired | Self::InvalidDateTime => "scheduledAt",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::PersonRequired | Self::DateTimeRequired => "required",
            Self::InvalidDateTime => "invalid_datetime",
        }
    }
}

impl fmt::Display for ChatValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonRequired => write!(f, "Please select a person."),
            Self::DateTimeRequired => write!(f, "Please choose a date and time."),
            Self::InvalidDateTime => write!(
                f,
                "Date and time must be RFC 3339 or YYYY-MM-DDTHH:MM."
            ),
        }
    }
}

impl std::error::Error for ChatValidationError {}

/// Parse RFC 3339, or a `datetime-local` value taken as UTC.
///
/// # Examples
/// ```
/// use coffee_chat::domain::parse_scheduled_at;
///
/// let at = parse_scheduled_at("2030-05-01T09:30").expect("valid datetime");
/// assert_eq!(at.to_rfc3339(), "2030-05-01T09:30:00+00:00");
/// ```
pub fn parse_scheduled_at(raw: &str) -> Result<DateTime<Utc>, ChatValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ChatValidationError::DateTimeRequired);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or(ChatValidationError::InvalidDateTime)
}

/// Raw scheduling form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatDraft {
    pub person_id: Option<PersonId>,
    pub scheduled_at: Option<String>,
    pub location: Option<String>,
    pub prep_notes: Option<String>,
}

/// Validated chat ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChat {
    pub user_id: UserId,
    pub person_id: PersonId,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
    pub prep_notes: Option<String>,
}

impl NewChat {
    pub fn try_from_draft(user_id: UserId, draft: ChatDraft) -> Result<Self, ChatValidationError> {
        let person_id = draft.person_id.ok_or(ChatValidationError::PersonRequired)?;
        let raw = draft
            .scheduled_at
            .ok_or(ChatValidationError::DateTimeRequired)?;
        let scheduled_at = parse_scheduled_at(&raw)?;
        let trim = |value: Option<String>| {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        Ok(Self {
            user_id,
            person_id,
            scheduled_at,
            location: trim(draft.location),
            prep_notes: trim(draft.prep_notes),
        })
    }
}

/// One row on the home dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatListing {
    pub chat_id: ChatId,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub status: ChatStatus,
    pub person_name: String,
    pub person_role: Option<String>,
    /// Company name, else custom company name; `None` renders as "Unknown".
    pub company_name: Option<String>,
}

/// Home page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub first_name: Option<String>,
    pub upcoming_count: usize,
    pub chats: Vec<ChatListing>,
}
