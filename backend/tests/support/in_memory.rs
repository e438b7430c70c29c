//! In-memory adapters for every driven port, sharing one store.
//!
//! Chats join people and companies the way the Diesel adapters do, and note
//! writes are guarded by revision.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use coffee_chat::domain::ports::{
    ChatContext, ChatRepository, ChatRepositoryError, CompanyRepository, CompanyRepositoryError,
    NoteRepository, NoteRepositoryError, PersonRepository, PersonRepositoryError,
    UserPreferencesRepository, UserPreferencesRepositoryError,
};
use coffee_chat::domain::{
    Chat, ChatId, ChatListing, ChatStatus, Company, CompanyId, NewChat, NewNote, NewPerson, Note,
    NoteContent, Person, PersonEntry, PersonId, UserId, UserPreferences, company_label,
    location_label,
};

#[derive(Default)]
struct State {
    preferences: HashMap<UserId, UserPreferences>,
    companies: Vec<Company>,
    people: Vec<Person>,
    chats: Vec<Chat>,
    notes: HashMap<ChatId, Note>,
    preferences_offline: bool,
    note_writes_offline: bool,
}

/// Shared store backing every repository port.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store lock")
    }

    pub fn add_company(&self, name: &str) -> Company {
        let company = Company {
            id: CompanyId::random(),
            name: name.to_owned(),
            logo_url: None,
            industry: None,
        };
        let mut state = self.lock();
        state.companies.push(company.clone());
        state.companies.sort_by(|a, b| a.name.cmp(&b.name));
        company
    }

    pub fn put_preferences(&self, prefs: UserPreferences) {
        self.lock().preferences.insert(prefs.user_id, prefs);
    }

    /// Make preferences lookups fail with a connection error.
    pub fn set_preferences_offline(&self, offline: bool) {
        self.lock().preferences_offline = offline;
    }

    /// Make note writes fail with a connection error.
    pub fn set_note_writes_offline(&self, offline: bool) {
        self.lock().note_writes_offline = offline;
    }

    pub fn note_count(&self) -> usize {
        self.lock().notes.len()
    }

    pub fn stored_note(&self, chat_id: &ChatId) -> Option<Note> {
        self.lock().notes.get(chat_id).cloned()
    }

    pub fn chat(&self, chat_id: &ChatId) -> Option<Chat> {
        self.lock().chats.iter().find(|c| c.id == *chat_id).cloned()
    }
}

impl State {
    fn company(&self, id: Option<CompanyId>) -> Option<&Company> {
        id.and_then(|id| self.companies.iter().find(|c| c.id == id))
    }

    fn context(&self, chat: &Chat) -> Option<ChatContext> {
        let person = self.people.iter().find(|p| p.id == chat.person_id)?.clone();
        let company = self.company(person.company.company_id()).cloned();
        Some(ChatContext {
            chat: chat.clone(),
            person,
            company,
        })
    }

    fn guarded_write(
        &mut self,
        chat_id: &ChatId,
        expected_revision: u32,
        apply: impl FnOnce(&mut NoteContent),
    ) -> Result<Note, NoteRepositoryError> {
        if self.note_writes_offline {
            return Err(NoteRepositoryError::connection("store offline"));
        }
        let note = self
            .notes
            .get_mut(chat_id)
            .ok_or_else(|| NoteRepositoryError::missing(chat_id.to_string()))?;
        if note.revision != expected_revision {
            return Err(NoteRepositoryError::revision_mismatch(
                expected_revision,
                note.revision,
            ));
        }
        apply(&mut note.content);
        note.revision += 1;
        note.updated_at = Utc::now();
        Ok(note.clone())
    }
}

#[async_trait]
impl UserPreferencesRepository for InMemoryStore {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserPreferences>, UserPreferencesRepositoryError> {
        let state = self.lock();
        if state.preferences_offline {
            return Err(UserPreferencesRepositoryError::connection("store offline"));
        }
        Ok(state.preferences.get(user_id).cloned())
    }

    async fn ensure_exists(&self, user_id: &UserId) -> Result<(), UserPreferencesRepositoryError> {
        self.lock()
            .preferences
            .entry(*user_id)
            .or_insert_with(|| UserPreferences::empty(*user_id));
        Ok(())
    }

    async fn upsert(
        &self,
        preferences: &UserPreferences,
    ) -> Result<(), UserPreferencesRepositoryError> {
        self.put_preferences(preferences.clone());
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Company>, CompanyRepositoryError> {
        Ok(self.lock().companies.clone())
    }
}

#[async_trait]
impl PersonRepository for InMemoryStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PersonEntry>, PersonRepositoryError> {
        let state = self.lock();
        let mut entries: Vec<PersonEntry> = state
            .people
            .iter()
            .filter(|p| p.user_id == *user_id)
            .map(|p| PersonEntry::new(p.clone(), state.company(p.company.company_id())))
            .collect();
        entries.sort_by(|a, b| a.person.name.cmp(&b.person.name));
        Ok(entries)
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        person_id: &PersonId,
    ) -> Result<Option<Person>, PersonRepositoryError> {
        Ok(self
            .lock()
            .people
            .iter()
            .find(|p| p.id == *person_id && p.user_id == *user_id)
            .cloned())
    }

    async fn create(&self, person: &NewPerson) -> Result<PersonEntry, PersonRepositoryError> {
        let mut state = self.lock();
        let company_id = person.company.company_id();
        if company_id.is_some() && state.company(company_id).is_none() {
            return Err(PersonRepositoryError::unknown_company(
                company_id.map(|id| id.to_string()).unwrap_or_default(),
            ));
        }
        let stored = Person {
            id: PersonId::random(),
            user_id: person.user_id,
            name: person.name.clone(),
            role: person.role.clone(),
            company: person.company.clone(),
            linkedin_url: person.linkedin_url.clone(),
            created_at: Utc::now(),
        };
        let entry = PersonEntry::new(stored.clone(), state.company(company_id));
        state.people.push(stored);
        Ok(entry)
    }
}

#[async_trait]
impl ChatRepository for InMemoryStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ChatListing>, ChatRepositoryError> {
        let state = self.lock();
        let mut listings: Vec<ChatListing> = state
            .chats
            .iter()
            .filter(|c| c.user_id == *user_id)
            .filter_map(|c| state.context(c))
            .map(|ctx| ChatListing {
                chat_id: ctx.chat.id,
                scheduled_at: ctx.chat.scheduled_at,
                location: location_label(ctx.chat.location.as_deref()).to_owned(),
                status: ctx.chat.status,
                company_name: company_label(ctx.company.as_ref(), &ctx.person.company),
                person_name: ctx.person.name,
                person_role: ctx.person.role,
            })
            .collect();
        listings.sort_by_key(|l| l.scheduled_at);
        Ok(listings)
    }

    async fn find_context(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
    ) -> Result<Option<ChatContext>, ChatRepositoryError> {
        let state = self.lock();
        Ok(state
            .chats
            .iter()
            .find(|c| c.id == *chat_id && c.user_id == *user_id)
            .and_then(|c| state.context(c)))
    }

    async fn create(&self, chat: &NewChat) -> Result<Chat, ChatRepositoryError> {
        let stored = Chat {
            id: ChatId::random(),
            user_id: chat.user_id,
            person_id: chat.person_id,
            scheduled_at: chat.scheduled_at,
            location: chat.location.clone(),
            status: ChatStatus::Scheduled,
            prep_notes: chat.prep_notes.clone(),
            note_id: None,
        };
        self.lock().chats.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl NoteRepository for InMemoryStore {
    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Option<Note>, NoteRepositoryError> {
        Ok(self.lock().notes.get(chat_id).cloned())
    }

    async fn ensure_for_chat(&self, note: &NewNote) -> Result<Note, NoteRepositoryError> {
        let mut state = self.lock();
        let stored = state
            .notes
            .entry(note.chat_id)
            .or_insert_with(|| Note {
                id: note.id,
                chat_id: note.chat_id,
                person_id: note.person_id,
                company_id: note.company_id,
                content: note.content.clone(),
                summary: None,
                revision: 0,
                updated_at: Utc::now(),
            })
            .clone();
        if let Some(chat) = state.chats.iter_mut().find(|c| c.id == note.chat_id) {
            chat.note_id = Some(stored.id);
        }
        Ok(stored)
    }

    async fn save_content(
        &self,
        chat_id: &ChatId,
        content: &NoteContent,
        expected_revision: u32,
    ) -> Result<Note, NoteRepositoryError> {
        self.lock()
            .guarded_write(chat_id, expected_revision, |stored| *stored = content.clone())
    }

    async fn save_interview_relevant(
        &self,
        chat_id: &ChatId,
        is_interview_relevant: bool,
        expected_revision: u32,
    ) -> Result<Note, NoteRepositoryError> {
        self.lock().guarded_write(chat_id, expected_revision, |stored| {
            stored.is_interview_relevant = is_interview_relevant;
        })
    }
}
