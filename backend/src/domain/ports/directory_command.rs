//! Driving port for the people picker and company dropdown.

use async_trait::async_trait;

use crate::domain::{Company, Error, PersonDraft, PersonEntry, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryCommand: Send + Sync {
    /// The user's people, optionally filtered by a substring query.
    async fn list_people(
        &self,
        user_id: &UserId,
        query: Option<String>,
    ) -> Result<Vec<PersonEntry>, Error>;

    /// Validate and insert a person.
    async fn create_person(&self, user_id: &UserId, draft: PersonDraft)
    -> Result<PersonEntry, Error>;

    /// Companies, optionally filtered by name.
    async fn list_companies(&self, query: Option<String>) -> Result<Vec<Company>, Error>;
}
