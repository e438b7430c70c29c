//! Driving port for loading and editing chat notes.
//!
//! Every write accepts an optional expected revision. When present and stale
//! the write fails with a conflict instead of overwriting.

use async_trait::async_trait;

use crate::domain::{ChatId, ChatNotes, Error, Note, NoteContent, SectionName, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteSyncCommand: Send + Sync {
    /// Load the chat and its note, creating a blank note on first access.
    async fn load_or_create(&self, user_id: &UserId, chat_id: &ChatId) -> Result<ChatNotes, Error>;

    /// Overwrite sections, tags and the interview flag in one write.
    async fn save_content(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        content: NoteContent,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error>;

    /// Replace one section's text, keeping the other stored sections.
    async fn update_section(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        section: SectionName,
        text: String,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error>;

    /// Set the interview relevance flag.
    async fn set_interview_relevant(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        is_interview_relevant: bool,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error>;

    /// Replace the tag set.
    async fn update_tags(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
        tags: Vec<String>,
        expected_revision: Option<u32>,
    ) -> Result<Note, Error>;
}
