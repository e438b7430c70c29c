//! Local editing state for one chat's note.
//!
//! Every edit is applied to the local copy first and then persisted through
//! [`NoteSyncCommand`]. A failed save never rolls the local copy back; it is
//! reported through [`SaveStatus`] and the next successful save carries the
//! local content forward.
//!
//! A revision conflict adopts the stored revision and retries once with the
//! whole local content, so edits made elsewhere are overwritten by this
//! editor's copy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::note_sync::conflicting_revision;
use super::ports::NoteSyncCommand;
use super::{ChatId, ChatNotes, Error, Note, NoteContent, SectionName, UserId};

/// Outcome of the most recent save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SaveStatus {
    Idle,
    Saved {
        at: DateTime<Utc>,
        revision: u32,
    },
    Failed {
        at: DateTime<Utc>,
        message: String,
    },
}

impl SaveStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Editor bound to a single chat.
pub struct NoteEditor<S: ?Sized> {
    sync: Arc<S>,
    clock: Arc<dyn Clock>,
    user_id: UserId,
    chat_id: ChatId,
    content: NoteContent,
    revision: u32,
    status: SaveStatus,
}

impl<S> NoteEditor<S>
where
    S: NoteSyncCommand + ?Sized,
{
    /// Load the note for `chat_id`, creating it on first access.
    pub async fn open(
        sync: Arc<S>,
        clock: Arc<dyn Clock>,
        user_id: UserId,
        chat_id: ChatId,
    ) -> Result<(Self, ChatNotes), Error> {
        let loaded = sync.load_or_create(&user_id, &chat_id).await?;
        let editor = Self {
            sync,
            clock,
            user_id,
            chat_id,
            content: loaded.note.content.clone(),
            revision: loaded.note.revision,
            status: SaveStatus::Idle,
        };
        Ok((editor, loaded))
    }

    pub fn content(&self) -> &NoteContent {
        &self.content
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Replace one section locally, then save the whole local content.
    pub async fn update_section(&mut self, section: SectionName, text: impl Into<String>) {
        self.content = self.content.with_section(section, text);
        let result = self.save_local(self.revision).await;
        self.settle(result).await;
    }

    /// Toggle interview relevance. Only the flag is written unless earlier
    /// local edits are still unsaved.
    pub async fn set_interview_relevant(&mut self, flag: bool) {
        self.content = self.content.with_interview_relevant(flag);
        let result = if self.has_unsaved_edits() {
            self.save_local(self.revision).await
        } else {
            self.sync
                .set_interview_relevant(&self.user_id, &self.chat_id, flag, Some(self.revision))
                .await
        };
        self.settle(result).await;
    }

    pub async fn update_tags(&mut self, tags: Vec<String>) {
        self.content = self.content.with_tags(tags);
        let result = if self.has_unsaved_edits() {
            self.save_local(self.revision).await
        } else {
            self.sync
                .update_tags(
                    &self.user_id,
                    &self.chat_id,
                    self.content.tags.clone(),
                    Some(self.revision),
                )
                .await
        };
        self.settle(result).await;
    }

    /// Discard local content and reload the stored note.
    pub async fn reload(&mut self) -> Result<(), Error> {
        let loaded = self.sync.load_or_create(&self.user_id, &self.chat_id).await?;
        self.content = loaded.note.content;
        self.revision = loaded.note.revision;
        self.status = SaveStatus::Idle;
        Ok(())
    }

    fn has_unsaved_edits(&self) -> bool {
        self.status.is_failed()
    }

    async fn save_local(&self, expected_revision: u32) -> Result<Note, Error> {
        self.sync
            .save_content(
                &self.user_id,
                &self.chat_id,
                self.content.clone(),
                Some(expected_revision),
            )
            .await
    }

    /// Record `result`, first retrying a revision conflict once against the
    /// stored revision with the local content.
    async fn settle(&mut self, result: Result<Note, Error>) {
        let result = match result {
            Err(err) => match conflicting_revision(&err) {
                Some(stored) => {
                    debug!(
                        chat_id = %self.chat_id,
                        stored,
                        "note changed elsewhere; keeping local copy"
                    );
                    self.save_local(stored).await
                }
                None => Err(err),
            },
            saved => saved,
        };
        self.record(result);
    }

    fn record(&mut self, result: Result<Note, Error>) {
        let at = self.clock.utc();
        match result {
            Ok(note) => {
                debug!(chat_id = %self.chat_id, revision = note.revision, "note saved");
                self.revision = note.revision;
                self.status = SaveStatus::Saved {
                    at,
                    revision: note.revision,
                };
            }
            Err(err) => {
                warn!(chat_id = %self.chat_id, error = %err, "note save failed");
                self.status = SaveStatus::Failed {
                    at,
                    message: err.message().to_owned(),
                };
            }
        }
    }
}
