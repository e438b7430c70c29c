//! Shared helpers for Diesel repository implementations.
//!
//! Every repository port has its own error enum with `connection` and
//! `query` constructors; the helpers here take those constructors so each
//! adapter maps failures the same way.

use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Map a pool error through a repository's connection constructor.
pub(crate) fn map_basic_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(pool_error_message(error))
}

/// Map common Diesel failures into query or connection errors.
///
/// Database messages are logged at debug level and replaced by fixed text so
/// SQL details never reach the domain.
pub(crate) fn map_basic_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("foreign key violation")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("check constraint violation")
        }
        _ => query("database error"),
    }
}

/// Name of the violated foreign key constraint, if `error` is one.
pub(crate) fn foreign_key_constraint(error: &diesel::result::Error) -> Option<String> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => Some(
            info.constraint_name()
                .map_or_else(|| info.message().to_owned(), str::to_owned),
        ),
        _ => None,
    }
}

/// Cast database revision (i32) to domain revision (u32).
#[expect(
    clippy::cast_sign_loss,
    reason = "revision is non-negative by check constraint"
)]
pub(crate) fn cast_revision(revision: i32) -> u32 {
    revision as u32
}

/// Convert domain revision (u32) to database revision (i32).
///
/// Returns `None` above `i32::MAX`, which the column cannot hold.
pub(crate) fn cast_revision_for_db(revision: u32) -> Option<i32> {
    i32::try_from(revision).ok()
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
