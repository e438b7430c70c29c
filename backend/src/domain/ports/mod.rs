//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AuthProvider`], [`SessionSource`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, [`GateQuery`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_command;
mod auth_provider;
mod chat_command;
mod chat_repository;
mod company_repository;
mod directory_command;
mod gate_query;
mod note_repository;
mod note_sync_command;
mod person_repository;
mod preferences_command;
mod session_source;
mod user_preferences_repository;

#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use auth_command::AuthCommand;
#[cfg(test)]
pub use auth_provider::MockAuthProvider;
pub use auth_provider::{AuthProvider, AuthProviderError, SignUpResult};
#[cfg(test)]
pub use chat_command::MockChatCommand;
pub use chat_command::ChatCommand;
#[cfg(test)]
pub use chat_repository::MockChatRepository;
pub use chat_repository::{ChatContext, ChatRepository, ChatRepositoryError};
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
pub use company_repository::{CompanyRepository, CompanyRepositoryError};
#[cfg(test)]
pub use directory_command::MockDirectoryCommand;
pub use directory_command::DirectoryCommand;
#[cfg(test)]
pub use gate_query::MockGateQuery;
pub use gate_query::GateQuery;
#[cfg(test)]
pub use note_repository::MockNoteRepository;
pub use note_repository::{NoteRepository, NoteRepositoryError};
#[cfg(test)]
pub use note_sync_command::MockNoteSyncCommand;
pub use note_sync_command::NoteSyncCommand;
#[cfg(test)]
pub use person_repository::MockPersonRepository;
pub use person_repository::{PersonRepository, PersonRepositoryError};
#[cfg(test)]
pub use preferences_command::MockPreferencesCommand;
pub use preferences_command::PreferencesCommand;
#[cfg(test)]
pub use session_source::MockSessionSource;
pub use session_source::SessionSource;
#[cfg(test)]
pub use user_preferences_repository::MockUserPreferencesRepository;
pub use user_preferences_repository::{
    FixtureUserPreferencesRepository, UserPreferencesRepository, UserPreferencesRepositoryError,
};
