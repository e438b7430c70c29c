//! PostgreSQL-backed `UserPreferencesRepository` implementation using Diesel ORM.
//!
//! Rows are created empty at sign-up (`ensure_exists`, a no-op when present)
//! and replaced wholesale when onboarding completes (`upsert`).

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPreferencesRepository, UserPreferencesRepositoryError};
use crate::domain::{DEFAULT_WEEKLY_TARGET, UserId, UserPreferences};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{UserPreferencesRow, UserPreferencesUpsert};
use super::pool::{DbPool, PoolError};
use super::schema::user_preferences;

/// Diesel-backed implementation of the `UserPreferencesRepository` port.
#[derive(Clone)]
pub struct DieselUserPreferencesRepository {
    pool: DbPool,
}

impl DieselUserPreferencesRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPreferencesRepositoryError {
    map_basic_pool_error(error, UserPreferencesRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPreferencesRepositoryError {
    map_basic_diesel_error(
        error,
        UserPreferencesRepositoryError::query,
        UserPreferencesRepositoryError::connection,
    )
}

/// Convert a database row to domain preferences.
fn row_to_preferences(row: UserPreferencesRow) -> UserPreferences {
    let weekly_target = u8::try_from(row.weekly_target).unwrap_or_else(|_| {
        warn!(
            value = row.weekly_target,
            user_id = %row.user_id,
            "weekly_target out of range, using default"
        );
        DEFAULT_WEEKLY_TARGET
    });

    UserPreferences {
        user_id: UserId::from_uuid(row.user_id),
        first_name: row.first_name,
        last_name: row.last_name,
        interests: row.interests,
        goals: row.goals,
        timezone: row.timezone,
        preferred_roles: row.preferred_roles,
        preferred_industries: row.preferred_industries,
        weekly_target,
        updated_at: row.updated_at,
    }
}

fn upsert_row(preferences: &UserPreferences) -> UserPreferencesUpsert<'_> {
    UserPreferencesUpsert {
        user_id: *preferences.user_id.as_uuid(),
        first_name: &preferences.first_name,
        last_name: &preferences.last_name,
        interests: &preferences.interests,
        goals: &preferences.goals,
        timezone: &preferences.timezone,
        preferred_roles: &preferences.preferred_roles,
        preferred_industries: &preferences.preferred_industries,
        weekly_target: i16::from(preferences.weekly_target),
        updated_at: preferences.updated_at,
    }
}

#[async_trait]
impl UserPreferencesRepository for DieselUserPreferencesRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserPreferences>, UserPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result: Option<UserPreferencesRow> = user_preferences::table
            .filter(user_preferences::user_id.eq(user_id.as_uuid()))
            .select(UserPreferencesRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(result.map(row_to_preferences))
    }

    async fn ensure_exists(&self, user_id: &UserId) -> Result<(), UserPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let empty = UserPreferences::builder(*user_id)
            .updated_at(Utc::now())
            .build();

        diesel::insert_into(user_preferences::table)
            .values(&upsert_row(&empty))
            .on_conflict(user_preferences::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn upsert(
        &self,
        preferences: &UserPreferences,
    ) -> Result<(), UserPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = upsert_row(preferences);

        diesel::insert_into(user_preferences::table)
            .values(&row)
            .on_conflict(user_preferences::user_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
