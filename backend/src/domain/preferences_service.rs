//! Onboarding profile service.
//!
//! Implements [`PreferencesCommand`] over the preferences repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::ports::{PreferencesCommand, UserPreferencesRepository, UserPreferencesRepositoryError};
use super::{Error, OnboardingDraft, OnboardingError, UserId, UserPreferences};

pub(crate) fn map_preferences_error(error: UserPreferencesRepositoryError) -> Error {
    match error {
        UserPreferencesRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("preferences repository unavailable: {message}"))
        }
        UserPreferencesRepositoryError::Query { message } => {
            Error::internal(format!("preferences repository error: {message}"))
        }
    }
}

pub(crate) fn onboarding_error(error: &OnboardingError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
        "step": error.step(),
        "stepNumber": error.step().number(),
    }))
}

/// Preferences service backed by a repository and a clock.
#[derive(Clone)]
pub struct PreferencesService<P> {
    repo: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> PreferencesService<P> {
    pub fn new(repo: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<P> PreferencesService<P>
where
    P: UserPreferencesRepository,
{
    async fn find(&self, user_id: &UserId) -> Result<Option<UserPreferences>, Error> {
        self.repo
            .find_by_user_id(user_id)
            .await
            .map_err(map_preferences_error)
    }
}

#[async_trait]
impl<P> PreferencesCommand for PreferencesService<P>
where
    P: UserPreferencesRepository,
{
    async fn fetch(&self, user_id: &UserId) -> Result<UserPreferences, Error> {
        if let Some(prefs) = self.find(user_id).await? {
            return Ok(prefs);
        }
        self.repo
            .ensure_exists(user_id)
            .await
            .map_err(map_preferences_error)?;
        Ok(self
            .find(user_id)
            .await?
            .unwrap_or_else(|| UserPreferences::empty(*user_id)))
    }

    async fn complete_onboarding(
        &self,
        user_id: &UserId,
        draft: OnboardingDraft,
    ) -> Result<UserPreferences, Error> {
        let prefs = draft
            .into_preferences(*user_id, self.clock.utc())
            .map_err(|err| onboarding_error(&err))?;
        self.repo
            .upsert(&prefs)
            .await
            .map_err(map_preferences_error)?;
        info!(%user_id, "onboarding completed");
        Ok(prefs)
    }
}
