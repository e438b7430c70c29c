//! Note synchronization: one note per chat, persisted on every edit.
//!
//! The first read of a chat's note creates it through
//! [`NoteRepository::ensure_for_chat`], a single guarded upsert, so repeated
//! or concurrent first reads converge on the same note. Writes check the
//! revision the caller last saw, when given, and always write against the
//! revision just read.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use utoipa::ToSchema;

use super::chat_service::map_chat_error;
use super::ports::{ChatContext, ChatRepository, NoteRepository, NoteRepositoryError, NoteSyncCommand};
use super::{
    Chat, ChatId, Error, ErrorCode, NewNote, Note, NoteContent, Person, SectionName, UserId, company_label,
};

/// A chat with its person, company label and note, as shown by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatNotes {
    pub chat: Chat,
    pub person: Person,
    pub company_name: Option<String>,
    pub note: Note,
}

pub(crate) fn revision_conflict(expected: u32, actual: u32) -> Error {
    Error::conflict("note was changed by another session").with_details(json!({
        "expectedRevision": expected,
        "actualRevision": actual,
        "code": "revision_mismatch",
    }))
}

/// Stored revision carried by a `revision_mismatch` conflict.
pub(crate) fn conflicting_revision(error: &Error) -> Option<u32> {
    if error.code() != ErrorCode::Conflict {
        return None;
    }
    let details = error.details()?;
    if details.get("code")?.as_str()? != "revision_mismatch" {
        return None;
    }
    details
        .get("actualRevision")?
        .as_u64()
        .and_then(|revision| u32::try_from(revision).ok())
}

pub(crate) fn map_note_error(error: NoteRepositoryError) -> Error {
    match error {
        NoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("note repository unavailable: {message}"))
        }
        NoteRepositoryError::Query { message } => {
            Error::internal(format!("note repository error: {message}"))
        }
        NoteRepositoryError::Missing { chat_id } => {
            Error::not_found(format!("no note for chat {chat_id}"))
        }
        NoteRepositoryError::RevisionMismatch { expected, actual } => {
            revision_conflict(expected, actual)
        }
    }
}

fn check_revision(expected: Option<u32>, note: &Note) -> Result<(), Error> {
    match expected {
        Some(expected) if expected != note.revision => {
            Err(revision_conflict(expected, note.revision))
        }
        _ => Ok(()),
    }
}

/// Implements [`NoteSyncCommand`].
pub struct NoteSyncService<C, N> {
    chats: Arc<C>,
    notes: Arc<N>,
}

impl<C, N> NoteSyncService<C, N> {
    pub fn new(chats: Arc<C>, notes: Arc<N>) -> Self {
        Self { chats, notes }
    }
}

impl<C, N> NoteSyncService<C, N>
where
    C: ChatRepository,
    N: NoteRepository,
{
    async fn context(&self, user_id: &UserId, chat_id: &ChatId) -> Result<ChatContext, Error> {
        self.chats
            .find_context(user_id, chat_id)
            .await
            .map_err(map_chat_error)?
            .ok_or_else(|| Error::not_found(format!("chat {chat_id} not found")))
    }

    async fn ensure_note(&self, context: &ChatContext) -> Result<Note, Error> {
        let chat_id = context.chat.id;
        if let Some(note) = self
            .notes
            .find_by_chat(&chat_id)
            .await
            .map_err(map_note_error)?
        {
            debug!(%chat_id, note_id = %note.id, "note hydrated");
            return Ok(note);
        }
        let blank = NewNote::blank(
            chat_id,
            context.person.id,
            context.person.company.company_id(),
        );
        let note = self
            .notes
            .ensure_for_chat(&blank)
            .await
            .map_err(map_note_error)?;
        info!(%chat_id, note_id = %note.id, "note created on first access");
        Ok(note)
    }

    /// Resolve ownership and the current note for a write.
    async fn current_note(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error> {
        let context = self.context(user_id, chat_id).await?;
        let note = self.ensure_note(&context).await?;
        check_revision(expected_revision, &note)?;
        Ok(note)
    }

    async fn write_content(&self, note: &Note, content: &NoteContent) -> Result<Note, Error> {
        self.notes
            .save_content(&note.chat_id, content, note.revision)
            .await
            .map_err(map_note_error)
    }
}

#[async_trait]
impl<C, N> NoteSyncCommand for NoteSyncService<C, N>
where
    C: ChatRepository,
    N: NoteRepository,
{
    async fn load_or_create(&self, user_id: &UserId, chat_id: &ChatId) -> Result<ChatNotes, Error> {
        let context = self.context(user_id, chat_id).await?;
        let note = self.ensure_note(&context).await?;
        let ChatContext {
            chat,
            person,
            company,
        } = context;
        let company_name = company_label(company.as_ref(), &person.company);
        Ok(ChatNotes {
            chat,
            person,
            company_name,
            note,
        })
    }

    async fn save_content(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        content: NoteContent,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error> {
        let note = self.current_note(user_id, chat_id, expected_revision).await?;
        let content = NoteContent {
            tags: super::normalize_tags(content.tags),
            ..content
        };
        self.write_content(&note, &content).await
    }

    async fn update_section(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        section: SectionName,
        text: String,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error> {
        let note = self.current_note(user_id, chat_id, expected_revision).await?;
        let content = note.content.with_section(section, text);
        self.write_content(&note, &content).await
    }

    async fn set_interview_relevant(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        is_interview_relevant: bool,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error> {
        let note = self.current_note(user_id, chat_id, expected_revision).await?;
        self.notes
            .save_interview_relevant(&note.chat_id, is_interview_relevant, note.revision)
            .await
            .map_err(map_note_error)
    }

    async fn update_tags(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        tags: Vec<String>,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error> {
        let note = self.current_note(user_id, chat_id, expected_revision).await?;
        let content = note.content.with_tags(tags);
        self.write_content(&note, &content).await
    }
}

#[cfg(test)]
#[path = "note_sync_tests.rs"]
mod tests;
