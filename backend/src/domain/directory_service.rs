//! People picker and company dropdown service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::ports::{
    CompanyRepository, CompanyRepositoryError, DirectoryCommand, PersonRepository,
    PersonRepositoryError,
};
use super::{Company, Error, NewPerson, PersonDraft, PersonEntry, UserId, filter_people};

pub(crate) fn map_person_error(error: PersonRepositoryError) -> Error {
    match error {
        PersonRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("person repository unavailable: {message}"))
        }
        PersonRepositoryError::Query { message } => {
            Error::internal(format!("person repository error: {message}"))
        }
        PersonRepositoryError::UnknownCompany { company_id } => {
            Error::invalid_request(format!("unknown company: {company_id}"))
                .with_details(json!({ "field": "companyId", "code": "unknown_company" }))
        }
    }
}

fn map_company_error(error: CompanyRepositoryError) -> Error {
    match error {
        CompanyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("company repository unavailable: {message}"))
        }
        CompanyRepositoryError::Query { message } => {
            Error::internal(format!("company repository error: {message}"))
        }
    }
}

/// Implements [`DirectoryCommand`].
pub struct DirectoryService<R, C> {
    people: Arc<R>,
    companies: Arc<C>,
}

impl<R, C> DirectoryService<R, C> {
    pub fn new(people: Arc<R>, companies: Arc<C>) -> Self {
        Self { people, companies }
    }
}

#[async_trait]
impl<R, C> DirectoryCommand for DirectoryService<R, C>
where
    R: PersonRepository,
    C: CompanyRepository,
{
    async fn list_people(
        &self,
        user_id: &UserId,
        query: Option<String>,
    ) -> Result<Vec<PersonEntry>, Error> {
        let entries = self
            .people
            .list_for_user(user_id)
            .await
            .map_err(map_person_error)?;
        match query.as_deref() {
            Some(q) => Ok(filter_people(&entries, q).into_iter().cloned().collect()),
            None => Ok(entries),
        }
    }

    async fn create_person(
        &self,
        user_id: &UserId,
        draft: PersonDraft,
    ) -> Result<PersonEntry, Error> {
        let person = NewPerson::try_from_draft(*user_id, draft).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": err.field(), "code": err.code() }))
        })?;
        let created = self
            .people
            .create(&person)
            .await
            .map_err(map_person_error)?;
        info!(%user_id, person_id = %created.person.id, "person created");
        Ok(created)
    }

    async fn list_companies(&self, query: Option<String>) -> Result<Vec<Company>, Error> {
        let companies = self
            .companies
            .list_all()
            .await
            .map_err(map_company_error)?;
        let needle = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        Ok(match needle {
            Some(needle) => companies
                .into_iter()
                .filter(|company| company.name.to_lowercase().contains(&needle))
                .collect(),
            None => companies,
        })
    }
}
