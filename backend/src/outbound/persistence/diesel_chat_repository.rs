//! PostgreSQL-backed chat storage.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ChatContext, ChatRepository, ChatRepositoryError};
use crate::domain::{
    Chat, ChatId, ChatListing, ChatStatus, NewChat, UserId, company_label, location_label,
};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ChatRow, CompanyRow, NewChatRow, PersonRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{chat_from_row, company_from_row, person_from_row};
use super::schema::{chats, companies, people};

type ChatJoinRow = (ChatRow, PersonRow, Option<CompanyRow>);

/// Diesel-backed implementation of the `ChatRepository` port.
#[derive(Clone)]
pub struct DieselChatRepository {
    pool: DbPool,
}

impl DieselChatRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChatRepositoryError {
    map_basic_pool_error(error, ChatRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ChatRepositoryError {
    map_basic_diesel_error(
        error,
        ChatRepositoryError::query,
        ChatRepositoryError::connection,
    )
}

fn context_from_rows((chat, person, company): ChatJoinRow) -> ChatContext {
    ChatContext {
        chat: chat_from_row(chat),
        person: person_from_row(person),
        company: company.map(company_from_row),
    }
}

fn listing_from_rows(rows: ChatJoinRow) -> ChatListing {
    let ChatContext {
        chat,
        person,
        company,
    } = context_from_rows(rows);
    ChatListing {
        chat_id: chat.id,
        scheduled_at: chat.scheduled_at,
        location: location_label(chat.location.as_deref()).to_owned(),
        status: chat.status,
        company_name: company_label(company.as_ref(), &person.company),
        person_name: person.name,
        person_role: person.role,
    }
}

#[async_trait]
impl ChatRepository for DieselChatRepository {
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ChatListing>, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ChatJoinRow> = chats::table
            .inner_join(people::table.left_join(companies::table))
            .filter(chats::user_id.eq(user_id.as_uuid()))
            .order_by(chats::scheduled_at.asc())
            .select((
                ChatRow::as_select(),
                PersonRow::as_select(),
                Option::<CompanyRow>::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(listing_from_rows).collect())
    }

    async fn find_context(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
    ) -> Result<Option<ChatContext>, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ChatJoinRow> = chats::table
            .inner_join(people::table.left_join(companies::table))
            .filter(
                chats::chat_id
                    .eq(chat_id.as_uuid())
                    .and(chats::user_id.eq(user_id.as_uuid())),
            )
            .select((
                ChatRow::as_select(),
                PersonRow::as_select(),
                Option::<CompanyRow>::as_select(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(context_from_rows))
    }

    async fn create(&self, chat: &NewChat) -> Result<Chat, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewChatRow {
            chat_id: *ChatId::random().as_uuid(),
            user_id: *chat.user_id.as_uuid(),
            person_id: *chat.person_id.as_uuid(),
            scheduled_at: chat.scheduled_at,
            location: chat.location.as_deref(),
            status: ChatStatus::Scheduled.as_str(),
            prep_notes: chat.prep_notes.as_deref(),
        };

        diesel::insert_into(chats::table)
            .values(&new_row)
            .returning(ChatRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(chat_from_row)
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn join_row(location: Option<&str>, custom_company: Option<&str>) -> ChatJoinRow {
        let person_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        (
            ChatRow {
                chat_id: Uuid::new_v4(),
                user_id,
                person_id,
                scheduled_at: Utc::now(),
                location: location.map(str::to_owned),
                status: "completed".into(),
                prep_notes: None,
                note_id: None,
            },
            PersonRow {
                person_id,
                user_id,
                name: "Jane Doe".into(),
                role: Some("Designer".into()),
                company_id: None,
                custom_company_name: custom_company.map(str::to_owned),
                linkedin_url: None,
                created_at: Utc::now(),
            },
            None,
        )
    }

    #[rstest]
    fn listing_defaults_blank_location_to_virtual() {
        let listing = listing_from_rows(join_row(Some("  "), Some("Acme")));
        assert_eq!(listing.location, "Virtual");
        assert_eq!(listing.company_name.as_deref(), Some("Acme"));
        assert_eq!(listing.status, ChatStatus::Completed);
    }

    #[rstest]
    fn listing_without_company_has_no_label() {
        let listing = listing_from_rows(join_row(Some("Blue Bottle"), None));
        assert_eq!(listing.location, "Blue Bottle");
        assert_eq!(listing.company_name, None);
        assert_eq!(listing.person_name, "Jane Doe");
    }
}
