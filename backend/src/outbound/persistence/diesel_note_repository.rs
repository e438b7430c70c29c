//! PostgreSQL-backed note storage with revision-guarded writes.
//!
//! `ensure_for_chat` runs insert-if-absent, re-select and chat linking in one
//! transaction; the unique constraint on `notes.chat_id` makes concurrent
//! first accesses converge on one row. Writes compare-and-swap on
//! `revision`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NoteRepository, NoteRepositoryError};
use crate::domain::{ChatId, NewNote, Note, NoteContent};

use super::diesel_helpers::{
    cast_revision, cast_revision_for_db, map_basic_diesel_error, map_basic_pool_error,
};
use super::json_serializers::sections_to_json;
use super::models::{NewNoteRow, NoteContentUpdate, NoteFlagUpdate, NoteRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::note_from_row;
use super::schema::{chats, notes};

/// Diesel-backed implementation of the `NoteRepository` port.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NoteRepositoryError {
    map_basic_pool_error(error, NoteRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> NoteRepositoryError {
    map_basic_diesel_error(
        error,
        NoteRepositoryError::query,
        NoteRepositoryError::connection,
    )
}

fn decode(row: NoteRow) -> Result<Note, NoteRepositoryError> {
    note_from_row(row).map_err(NoteRepositoryError::query)
}

async fn select_by_chat(
    conn: &mut AsyncPgConnection,
    chat_id: Uuid,
) -> Result<Option<NoteRow>, diesel::result::Error> {
    notes::table
        .filter(notes::chat_id.eq(chat_id))
        .select(NoteRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// Explain why a guarded update touched no rows.
async fn update_failure(
    conn: &mut AsyncPgConnection,
    chat_id: &ChatId,
    expected_revision: u32,
) -> NoteRepositoryError {
    match select_by_chat(conn, *chat_id.as_uuid()).await {
        Ok(Some(row)) => {
            NoteRepositoryError::revision_mismatch(expected_revision, cast_revision(row.revision))
        }
        Ok(None) => NoteRepositoryError::missing(chat_id.to_string()),
        Err(err) => map_diesel_error(err),
    }
}

fn db_revision(revision: Option<u32>) -> Result<i32, NoteRepositoryError> {
    revision
        .and_then(cast_revision_for_db)
        .ok_or_else(|| NoteRepositoryError::query("note revision overflow"))
}

fn next_revision(expected_revision: u32) -> Result<i32, NoteRepositoryError> {
    db_revision(expected_revision.checked_add(1))
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        select_by_chat(&mut conn, *chat_id.as_uuid())
            .await
            .map_err(map_diesel_error)?
            .map(decode)
            .transpose()
    }

    async fn ensure_for_chat(&self, note: &NewNote) -> Result<Note, NoteRepositoryError> {
        let sections =
            sections_to_json(&note.content.sections).map_err(NoteRepositoryError::query)?;
        let new_row = NewNoteRow {
            note_id: *note.id.as_uuid(),
            chat_id: *note.chat_id.as_uuid(),
            person_id: *note.person_id.as_uuid(),
            company_id: note.company_id.map(|id| *id.as_uuid()),
            sections: &sections,
            tags: &note.content.tags,
            is_interview_relevant: note.content.is_interview_relevant,
        };
        let chat_id = new_row.chat_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction(|conn| {
                async move {
                    let inserted = diesel::insert_into(notes::table)
                        .values(&new_row)
                        .on_conflict(notes::chat_id)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                    debug!(%chat_id, inserted, "note ensure");

                    let stored: NoteRow = notes::table
                        .filter(notes::chat_id.eq(chat_id))
                        .select(NoteRow::as_select())
                        .first(conn)
                        .await?;

                    diesel::update(chats::table.filter(chats::chat_id.eq(chat_id)))
                        .set(chats::note_id.eq(stored.note_id))
                        .execute(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        decode(row)
    }

    async fn save_content(
        &self,
        chat_id: &ChatId,
        content: &NoteContent,
        expected_revision: u32,
    ) -> Result<Note, NoteRepositoryError> {
        let sections = sections_to_json(&content.sections).map_err(NoteRepositoryError::query)?;
        let update = NoteContentUpdate {
            sections: &sections,
            tags: &content.tags,
            is_interview_relevant: content.is_interview_relevant,
            revision: next_revision(expected_revision)?,
            updated_at: Utc::now(),
        };
        let expected = db_revision(Some(expected_revision))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: Option<NoteRow> = diesel::update(notes::table)
            .filter(
                notes::chat_id
                    .eq(chat_id.as_uuid())
                    .and(notes::revision.eq(expected)),
            )
            .set(&update)
            .returning(NoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match updated {
            Some(row) => decode(row),
            None => Err(update_failure(&mut conn, chat_id, expected_revision).await),
        }
    }

    async fn save_interview_relevant(
        &self,
        chat_id: &ChatId,
        is_interview_relevant: bool,
        expected_revision: u32,
    ) -> Result<Note, NoteRepositoryError> {
        let update = NoteFlagUpdate {
            is_interview_relevant,
            revision: next_revision(expected_revision)?,
            updated_at: Utc::now(),
        };
        let expected = db_revision(Some(expected_revision))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: Option<NoteRow> = diesel::update(notes::table)
            .filter(
                notes::chat_id
                    .eq(chat_id.as_uuid())
                    .and(notes::revision.eq(expected)),
            )
            .set(&update)
            .returning(NoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match updated {
            Some(row) => decode(row),
            None => Err(update_failure(&mut conn, chat_id, expected_revision).await),
        }
    }
}
