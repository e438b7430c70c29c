//! PostgreSQL-backed company catalogue reads.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Company;
use crate::domain::ports::{CompanyRepository, CompanyRepositoryError};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CompanyRow;
use super::pool::DbPool;
use super::row_mapping::company_from_row;
use super::schema::companies;

/// Diesel-backed implementation of the `CompanyRepository` port.
#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> CompanyRepositoryError {
    map_basic_diesel_error(
        error,
        CompanyRepositoryError::query,
        CompanyRepositoryError::connection,
    )
}

#[async_trait]
impl CompanyRepository for DieselCompanyRepository {
    async fn list_all(&self) -> Result<Vec<Company>, CompanyRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, CompanyRepositoryError::connection))?;

        let rows: Vec<CompanyRow> = companies::table
            .select(CompanyRow::as_select())
            .order_by(companies::name.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(company_from_row).collect())
    }
}
