//! Chat note HTTP handlers.
//!
//! ```text
//! GET /api/v1/chats/{chat_id}/note
//! PUT /api/v1/chats/{chat_id}/note
//! PUT /api/v1/chats/{chat_id}/note/sections/{section}
//! PUT /api/v1/chats/{chat_id}/note/interview-relevant
//! PUT /api/v1/chats/{chat_id}/note/tags
//! ```
//!
//! The first `GET` creates the note. Every write returns the stored note with
//! its new `revision`; sending `expectedRevision` turns a stale write into a
//! `409 Conflict` instead of overwriting.

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ChatId, ChatNotes, Error, Note, NoteContent, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_section};

const CHAT_ID: FieldName = FieldName::new("chatId");

/// Full note content.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteRequest {
    #[serde(flatten)]
    pub content: NoteContent,
    #[serde(default)]
    pub expected_revision: Option<u32>,
}

/// Replacement text for one section.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdateRequest {
    pub text: String,
    #[serde(default)]
    pub expected_revision: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRelevantRequest {
    pub is_interview_relevant: bool,
    #[serde(default)]
    pub expected_revision: Option<u32>,
}

/// Replacement tag set; tags are trimmed and de-duplicated.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagsUpdateRequest {
    pub tags: Vec<String>,
    #[serde(default)]
    pub expected_revision: Option<u32>,
}

fn caller_and_chat(session: &SessionContext, raw_chat_id: &str) -> Result<(UserId, ChatId), Error> {
    let user_id = session.require_user_id()?;
    let chat_id = parse_id(raw_chat_id, CHAT_ID)?;
    Ok((user_id, chat_id))
}

/// Load a chat's note, creating it on first access.
#[utoipa::path(
    get,
    path = "/api/v1/chats/{chat_id}/note",
    params(("chat_id" = String, Path, description = "Chat identifier")),
    responses(
        (status = 200, description = "Chat with its note", body = ChatNotes),
        (status = 400, description = "Invalid chat id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Chat not found", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["notes"],
    operation_id = "getChatNote"
)]
#[get("/chats/{chat_id}/note")]
pub async fn get_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let (user_id, chat_id) = caller_and_chat(&session, &path)?;
    let notes = state.notes.load_or_create(&user_id, &chat_id).await?;
    Ok(HttpResponse::Ok().insert_header(private_no_cache()).json(notes))
}

/// Overwrite sections, tags and the interview flag.
#[utoipa::path(
    put,
    path = "/api/v1/chats/{chat_id}/note",
    params(("chat_id" = String, Path, description = "Chat identifier")),
    request_body = SaveNoteRequest,
    responses(
        (status = 200, description = "Saved note", body = Note),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Chat not found", body = Error),
        (status = 409, description = "Revision mismatch", body = Error)
    ),
    tags = ["notes"],
    operation_id = "saveChatNote"
)]
#[put("/chats/{chat_id}/note")]
pub async fn save_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SaveNoteRequest>,
) -> ApiResult<web::Json<Note>> {
    let (user_id, chat_id) = caller_and_chat(&session, &path)?;
    let SaveNoteRequest {
        content,
        expected_revision,
    } = payload.into_inner();
    let note = state
        .notes
        .save_content(&user_id, &chat_id, content, expected_revision)
        .await?;
    Ok(web::Json(note))
}

/// Replace one section's text.
#[utoipa::path(
    put,
    path = "/api/v1/chats/{chat_id}/note/sections/{section}",
    params(
        ("chat_id" = String, Path, description = "Chat identifier"),
        ("section" = String, Path, description = "Section key, e.g. `dayToDay`")
    ),
    request_body = SectionUpdateRequest,
    responses(
        (status = 200, description = "Saved note", body = Note),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Chat not found", body = Error),
        (status = 409, description = "Revision mismatch", body = Error)
    ),
    tags = ["notes"],
    operation_id = "updateNoteSection"
)]
#[put("/chats/{chat_id}/note/sections/{section}")]
pub async fn update_section(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<SectionUpdateRequest>,
) -> ApiResult<web::Json<Note>> {
    let (raw_chat_id, raw_section) = path.into_inner();
    let (user_id, chat_id) = caller_and_chat(&session, &raw_chat_id)?;
    let section = parse_section(&raw_section)?;
    let SectionUpdateRequest {
        text,
        expected_revision,
    } = payload.into_inner();
    let note = state
        .notes
        .update_section(&user_id, &chat_id, section, text, expected_revision)
        .await?;
    Ok(web::Json(note))
}

/// Flag or unflag the note as interview relevant.
#[utoipa::path(
    put,
    path = "/api/v1/chats/{chat_id}/note/interview-relevant",
    params(("chat_id" = String, Path, description = "Chat identifier")),
    request_body = InterviewRelevantRequest,
    responses(
        (status = 200, description = "Saved note", body = Note),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Chat not found", body = Error),
        (status = 409, description = "Revision mismatch", body = Error)
    ),
    tags = ["notes"],
    operation_id = "setNoteInterviewRelevant"
)]
#[put("/chats/{chat_id}/note/interview-relevant")]
pub async fn set_interview_relevant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<InterviewRelevantRequest>,
) -> ApiResult<web::Json<Note>> {
    let (user_id, chat_id) = caller_and_chat(&session, &path)?;
    let note = state
        .notes
        .set_interview_relevant(
            &user_id,
            &chat_id,
            payload.is_interview_relevant,
            payload.expected_revision,
        )
        .await?;
    Ok(web::Json(note))
}

/// Replace the tag set.
#[utoipa::path(
    put,
    path = "/api/v1/chats/{chat_id}/note/tags",
    params(("chat_id" = String, Path, description = "Chat identifier")),
    request_body = TagsUpdateRequest,
    responses(
        (status = 200, description = "Saved note", body = Note),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Chat not found", body = Error),
        (status = 409, description = "Revision mismatch", body = Error)
    ),
    tags = ["notes"],
    operation_id = "updateNoteTags"
)]
#[put("/chats/{chat_id}/note/tags")]
pub async fn update_tags(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<TagsUpdateRequest>,
) -> ApiResult<web::Json<Note>> {
    let (user_id, chat_id) = caller_and_chat(&session, &path)?;
    let TagsUpdateRequest {
        tags,
        expected_revision,
    } = payload.into_inner();
    let note = state
        .notes
        .update_tags(&user_id, &chat_id, tags, expected_revision)
        .await?;
    Ok(web::Json(note))
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod tests;
