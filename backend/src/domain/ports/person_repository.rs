//! Port for people owned by a user.

use async_trait::async_trait;

use crate::domain::{NewPerson, Person, PersonEntry, PersonId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by person repository adapters.
    pub enum PersonRepositoryError {
        Connection { message: String } => "person repository connection failed: {message}",
        Query { message: String } => "person repository query failed: {message}",
        /// The referenced company does not exist.
        UnknownCompany { company_id: String } => "unknown company: {company_id}",
    }
}

/// Storage for people, always scoped by owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Every person owned by `user_id`, with resolved company names, ordered
    /// by name.
    async fn list_for_user(&self, user_id: &UserId)
    -> Result<Vec<PersonEntry>, PersonRepositoryError>;

    /// A person owned by `user_id`.
    async fn find_for_user(
        &self,
        user_id: &UserId,
        person_id: &PersonId,
    ) -> Result<Option<Person>, PersonRepositoryError>;

    /// Insert a person.
    async fn create(&self, person: &NewPerson) -> Result<PersonEntry, PersonRepositoryError>;
}
