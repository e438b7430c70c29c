//! Port for chat notes.
//!
//! Writes are keyed by chat and guarded by the note revision: each write
//! names the revision it read and bumps it by one.

use async_trait::async_trait;

use crate::domain::{ChatId, NewNote, Note, NoteContent};

use super::define_port_error;

define_port_error! {
    /// Errors raised by note repository adapters.
    pub enum NoteRepositoryError {
        Connection { message: String } => "note repository connection failed: {message}",
        Query { message: String } => "note repository query failed: {message}",
        /// No note exists for the chat.
        Missing { chat_id: String } => "no note for chat {chat_id}",
        /// The stored revision moved on since it was read.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
    }
}

/// Storage for notes, one per chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// The note for `chat_id`, if created.
    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Option<Note>, NoteRepositoryError>;

    /// Insert `note` unless the chat already has one, link the chat to the
    /// stored note, and return it. Concurrent callers converge on one note.
    async fn ensure_for_chat(&self, note: &NewNote) -> Result<Note, NoteRepositoryError>;

    /// Overwrite sections, tags and the interview flag.
    async fn save_content(
        &self,
        chat_id: &ChatId,
        content: &NoteContent,
        expected_revision: u32,
    ) -> Result<Note, NoteRepositoryError>;

    /// Overwrite only the interview flag.
    async fn save_interview_relevant(
        &self,
        chat_id: &ChatId,
        is_interview_relevant: bool,
        expected_revision: u32,
    ) -> Result<Note, NoteRepositoryError>;
}
