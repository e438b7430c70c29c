//! Home dashboard and chat scheduling.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::directory_service::map_person_error;
use super::ports::{
    ChatCommand, ChatRepository, ChatRepositoryError, PersonRepository,
    UserPreferencesRepository,
};
use super::{Chat, ChatDraft, Dashboard, Error, NewChat, UserId};

pub(crate) fn map_chat_error(error: ChatRepositoryError) -> Error {
    match error {
        ChatRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("chat repository unavailable: {message}"))
        }
        ChatRepositoryError::Query { message } => {
            Error::internal(format!("chat repository error: {message}"))
        }
    }
}

/// Implements [`ChatCommand`].
pub struct ChatService<C, R, P> {
    chats: Arc<C>,
    people: Arc<R>,
    preferences: Arc<P>,
}

impl<C, R, P> ChatService<C, R, P> {
    pub fn new(chats: Arc<C>, people: Arc<R>, preferences: Arc<P>) -> Self {
        Self {
            chats,
            people,
            preferences,
        }
    }
}

#[async_trait]
impl<C, R, P> ChatCommand for ChatService<C, R, P>
where
    C: ChatRepository,
    R: PersonRepository,
    P: UserPreferencesRepository,
{
    async fn dashboard(&self, user_id: &UserId) -> Result<Dashboard, Error> {
        // The greeting is cosmetic; a failed lookup still shows the chats.
        let first_name = match self.preferences.find_by_user_id(user_id).await {
            Ok(prefs) => prefs
                .map(|p| p.first_name)
                .filter(|name| !name.trim().is_empty()),
            Err(err) => {
                warn!(%user_id, error = %err, "greeting lookup failed");
                None
            }
        };
        let chats = self
            .chats
            .list_for_user(user_id)
            .await
            .map_err(map_chat_error)?;
        Ok(Dashboard {
            first_name,
            upcoming_count: chats.len(),
            chats,
        })
    }

    async fn schedule(&self, user_id: &UserId, draft: ChatDraft) -> Result<Chat, Error> {
        let chat = NewChat::try_from_draft(*user_id, draft).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": err.field(), "code": err.code() }))
        })?;
        let person = self
            .people
            .find_for_user(user_id, &chat.person_id)
            .await
            .map_err(map_person_error)?;
        if person.is_none() {
            return Err(Error::invalid_request("Please select one of your contacts.")
                .with_details(json!({ "field": "personId", "code": "unknown_person" })));
        }
        let created = self.chats.create(&chat).await.map_err(map_chat_error)?;
        info!(%user_id, chat_id = %created.id, "chat scheduled");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockChatRepository, MockPersonRepository, MockUserPreferencesRepository,
        UserPreferencesRepositoryError,
    };
    use crate::domain::{
        ChatId, ChatListing, ChatStatus, CompanyRef, ErrorCode, Person, PersonId,
        UserPreferences,
    };
    use chrono::{Duration, Utc};

    type Service = ChatService<MockChatRepository, MockPersonRepository, MockUserPreferencesRepository>;

    fn listing(name: &str, hours: i64) -> ChatListing {
        ChatListing {
            chat_id: ChatId::random(),
            scheduled_at: Utc::now() + Duration::hours(hours),
            location: "Virtual".into(),
            status: ChatStatus::Scheduled,
            person_name: name.into(),
            person_role: None,
            company_name: None,
        }
    }

    #[tokio::test]
    async fn dashboard_includes_greeting_and_count() {
        let user_id = UserId::random();
        let mut chats = MockChatRepository::new();
        chats
            .expect_list_for_user()
            .return_once(|_| Ok(vec![listing("Jane", 1), listing("Bob", 2)]));
        let mut prefs = MockUserPreferencesRepository::new();
        prefs.expect_find_by_user_id().return_once(move |_| {
            Ok(Some(UserPreferences::builder(user_id).first_name("Sam").build()))
        });
        let service: Service =
            ChatService::new(Arc::new(chats), Arc::new(MockPersonRepository::new()), Arc::new(prefs));

        let dashboard = service.dashboard(&user_id).await.expect("dashboard");
        assert_eq!(dashboard.first_name.as_deref(), Some("Sam"));
        assert_eq!(dashboard.upcoming_count, 2);
        assert_eq!(dashboard.chats[0].person_name, "Jane");
    }

    #[tokio::test]
    async fn dashboard_tolerates_greeting_failure() {
        let mut chats = MockChatRepository::new();
        chats.expect_list_for_user().return_once(|_| Ok(Vec::new()));
        let mut prefs = MockUserPreferencesRepository::new();
        prefs
            .expect_find_by_user_id()
            .return_once(|_| Err(UserPreferencesRepositoryError::query("boom")));
        let service: Service =
            ChatService::new(Arc::new(chats), Arc::new(MockPersonRepository::new()), Arc::new(prefs));

        let dashboard = service.dashboard(&UserId::random()).await.expect("dashboard");
        assert_eq!(dashboard.first_name, None);
    }

    #[tokio::test]
    async fn schedule_rejects_someone_elses_person() {
        let mut people = MockPersonRepository::new();
        people.expect_find_for_user().return_once(|_, _| Ok(None));
        let mut chats = MockChatRepository::new();
        chats.expect_create().never();
        let service: Service = ChatService::new(
            Arc::new(chats),
            Arc::new(people),
            Arc::new(MockUserPreferencesRepository::new()),
        );
        let draft = ChatDraft {
            person_id: Some(PersonId::random()),
            scheduled_at: Some("2030-01-01T10:00".into()),
            ..ChatDraft::default()
        };

        let err = service
            .schedule(&UserId::random(), draft)
            .await
            .expect_err("foreign person");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn schedule_creates_chat_for_owned_person() {
        let user_id = UserId::random();
        let person_id = PersonId::random();
        let mut people = MockPersonRepository::new();
        people.expect_find_for_user().return_once(move |_, _| {
            Ok(Some(Person {
                id: person_id,
                user_id,
                name: "Jane Doe".into(),
                role: None,
                company: CompanyRef::ByName { name: "Acme".into() },
                linkedin_url: None,
                created_at: Utc::now(),
            }))
        });
        let mut chats = MockChatRepository::new();
        chats.expect_create().times(1).returning(|chat| {
            Ok(Chat {
                id: ChatId::random(),
                user_id: chat.user_id,
                person_id: chat.person_id,
                scheduled_at: chat.scheduled_at,
                location: chat.location.clone(),
                status: ChatStatus::Scheduled,
                prep_notes: chat.prep_notes.clone(),
                note_id: None,
            })
        });
        let service: Service = ChatService::new(
            Arc::new(chats),
            Arc::new(people),
            Arc::new(MockUserPreferencesRepository::new()),
        );
        let draft = ChatDraft {
            person_id: Some(person_id),
            scheduled_at: Some("2030-01-01T10:00".into()),
            location: Some("Blue Bottle".into()),
            prep_notes: None,
        };

        let chat = service.schedule(&user_id, draft).await.expect("scheduled");
        assert_eq!(chat.person_id, person_id);
        assert_eq!(chat.location_label(), "Blue Bottle");
        assert_eq!(chat.note_id, None);
    }
}
