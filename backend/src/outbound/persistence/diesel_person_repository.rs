//! PostgreSQL-backed person storage.
//!
//! People are always read with their company left-joined so listings carry
//! the resolved company name.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PersonRepository, PersonRepositoryError};
use crate::domain::{NewPerson, Person, PersonEntry, PersonId, UserId};

use super::diesel_helpers::{foreign_key_constraint, map_basic_diesel_error, map_basic_pool_error};
use super::models::{CompanyRow, NewPersonRow, PersonRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{company_from_row, person_from_row};
use super::schema::{companies, people};

/// Diesel-backed implementation of the `PersonRepository` port.
#[derive(Clone)]
pub struct DieselPersonRepository {
    pool: DbPool,
}

impl DieselPersonRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PersonRepositoryError {
    map_basic_pool_error(error, PersonRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PersonRepositoryError {
    map_basic_diesel_error(
        error,
        PersonRepositoryError::query,
        PersonRepositoryError::connection,
    )
}

fn entry_from_rows((person, company): (PersonRow, Option<CompanyRow>)) -> PersonEntry {
    let company = company.map(company_from_row);
    PersonEntry::new(person_from_row(person), company.as_ref())
}

/// Translate an insert failure, naming the company for an unknown reference.
fn map_insert_error(error: diesel::result::Error, person: &NewPerson) -> PersonRepositoryError {
    match (foreign_key_constraint(&error), person.company.company_id()) {
        (Some(constraint), Some(company_id)) => {
            debug!(%constraint, %company_id, "person references unknown company");
            PersonRepositoryError::unknown_company(company_id.to_string())
        }
        _ => map_diesel_error(error),
    }
}

#[async_trait]
impl PersonRepository for DieselPersonRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PersonEntry>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(PersonRow, Option<CompanyRow>)> = people::table
            .left_join(companies::table)
            .filter(people::user_id.eq(user_id.as_uuid()))
            .order_by((people::name.asc(), people::created_at.asc()))
            .select((PersonRow::as_select(), Option::<CompanyRow>::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(entry_from_rows).collect())
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        person_id: &PersonId,
    ) -> Result<Option<Person>, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PersonRow> = people::table
            .filter(
                people::person_id
                    .eq(person_id.as_uuid())
                    .and(people::user_id.eq(user_id.as_uuid())),
            )
            .select(PersonRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(person_from_row))
    }

    async fn create(&self, person: &NewPerson) -> Result<PersonEntry, PersonRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (company_id, custom_company_name) = person.company.to_columns();
        let new_row = NewPersonRow {
            person_id: *PersonId::random().as_uuid(),
            user_id: *person.user_id.as_uuid(),
            name: &person.name,
            role: person.role.as_deref(),
            company_id: company_id.map(|id| *id.as_uuid()),
            custom_company_name: custom_company_name.as_deref(),
            linkedin_url: person.linkedin_url.as_ref().map(|url| url.as_str()),
        };

        let inserted: PersonRow = diesel::insert_into(people::table)
            .values(&new_row)
            .returning(PersonRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, person))?;

        let company: Option<CompanyRow> = match inserted.company_id {
            Some(id) => companies::table
                .filter(companies::company_id.eq(id))
                .select(CompanyRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?,
            None => None,
        };

        Ok(entry_from_rows((inserted, company)))
    }
}
