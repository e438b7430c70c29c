//! Port for onboarding profile persistence.

use async_trait::async_trait;

use crate::domain::{UserId, UserPreferences};

use super::define_port_error;

define_port_error! {
    /// Errors raised by preferences repository adapters.
    pub enum UserPreferencesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "preferences repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "preferences repository query failed: {message}",
    }
}

/// Storage for [`UserPreferences`], one row per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserPreferencesRepository: Send + Sync {
    /// Fetch the row for `user_id`, if one exists.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserPreferences>, UserPreferencesRepositoryError>;

    /// Insert an empty row unless one already exists.
    async fn ensure_exists(&self, user_id: &UserId) -> Result<(), UserPreferencesRepositoryError>;

    /// Insert or replace the row for `preferences.user_id`.
    async fn upsert(
        &self,
        preferences: &UserPreferences,
    ) -> Result<(), UserPreferencesRepositoryError>;
}

/// Fixture repository that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserPreferencesRepository;

#[async_trait]
impl UserPreferencesRepository for FixtureUserPreferencesRepository {
    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<UserPreferences>, UserPreferencesRepositoryError> {
        Ok(None)
    }

    async fn ensure_exists(&self, _user_id: &UserId) -> Result<(), UserPreferencesRepositoryError> {
        Ok(())
    }

    async fn upsert(
        &self,
        _preferences: &UserPreferences,
    ) -> Result<(), UserPreferencesRepositoryError> {
        Ok(())
    }
}
