//! Driving port for the onboarding profile.

use async_trait::async_trait;

use crate::domain::{Error, OnboardingDraft, UserId, UserPreferences};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferencesCommand: Send + Sync {
    /// Stored profile, creating an empty row when none exists.
    async fn fetch(&self, user_id: &UserId) -> Result<UserPreferences, Error>;

    /// Validate every wizard step and upsert the profile.
    async fn complete_onboarding(
        &self,
        user_id: &UserId,
        draft: OnboardingDraft,
    ) -> Result<UserPreferences, Error>;
}
