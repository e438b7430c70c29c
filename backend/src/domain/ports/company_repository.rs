//! Port for the shared company catalogue.

use async_trait::async_trait;

use crate::domain::Company;

use super::define_port_error;

define_port_error! {
    /// Errors raised by company repository adapters.
    pub enum CompanyRepositoryError {
        Connection { message: String } => "company repository connection failed: {message}",
        Query { message: String } => "company repository query failed: {message}",
    }
}

/// Read access to companies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Every company, ordered by name.
    async fn list_all(&self) -> Result<Vec<Company>, CompanyRepositoryError>;
}
