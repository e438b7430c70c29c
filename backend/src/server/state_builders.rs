//! Wire Diesel repositories and the auth adapter into domain services.

use std::sync::Arc;

use mockable::DefaultClock;

use coffee_chat::domain::{
    AccessGate, AuthService, ChatService, DirectoryService, NoteSyncService, PreferencesService,
};
use coffee_chat::inbound::http::state::HttpState;
use coffee_chat::outbound::auth::GoTrueAuthProvider;
use coffee_chat::outbound::persistence::{
    DbPool, DieselChatRepository, DieselCompanyRepository, DieselNoteRepository,
    DieselPersonRepository, DieselUserPreferencesRepository,
};

/// Repositories sharing one pool.
struct Repositories {
    preferences: Arc<DieselUserPreferencesRepository>,
    people: Arc<DieselPersonRepository>,
    companies: Arc<DieselCompanyRepository>,
    chats: Arc<DieselChatRepository>,
    notes: Arc<DieselNoteRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            preferences: Arc::new(DieselUserPreferencesRepository::new(pool.clone())),
            people: Arc::new(DieselPersonRepository::new(pool.clone())),
            companies: Arc::new(DieselCompanyRepository::new(pool.clone())),
            chats: Arc::new(DieselChatRepository::new(pool.clone())),
            notes: Arc::new(DieselNoteRepository::new(pool.clone())),
        }
    }
}

/// Build the driving ports used by every handler.
pub(super) fn build_http_state(pool: &DbPool, auth_provider: GoTrueAuthProvider) -> HttpState {
    let repos = Repositories::new(pool);
    HttpState {
        auth: Arc::new(AuthService::new(
            Arc::new(auth_provider),
            repos.preferences.clone(),
        )),
        gate: Arc::new(AccessGate::new(repos.preferences.clone())),
        preferences: Arc::new(PreferencesService::new(
            repos.preferences.clone(),
            Arc::new(DefaultClock),
        )),
        directory: Arc::new(DirectoryService::new(
            repos.people.clone(),
            repos.companies,
        )),
        chats: Arc::new(ChatService::new(
            repos.chats.clone(),
            repos.people,
            repos.preferences,
        )),
        notes: Arc::new(NoteSyncService::new(repos.chats, repos.notes)),
        clock: Arc::new(DefaultClock),
    }
}
