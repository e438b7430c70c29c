//! Per-user onboarding profile.
//!
//! One row exists per user. A non-empty `first_name` marks onboarding as
//! complete and is what the access gate checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Timezone stored when the user has not chosen one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Default number of chats the user aims to hold each week.
pub const DEFAULT_WEEKLY_TARGET: u8 = 1;

/// Roles a user can target during onboarding.
pub const ROLES: [&str; 15] = [
    "Software Engineer",
    "Product Manager",
    "Data Scientist",
    "Designer",
    "Marketing",
    "Sales",
    "Operations",
    "Finance",
    "Human Resources",
    "Business Development",
    "Consulting",
    "Research",
    "Engineering Manager",
    "Executive",
    "Other",
];

/// Industries a user can target during onboarding.
pub const INDUSTRIES: [&str; 15] = [
    "Technology",
    "Finance",
    "Healthcare",
    "Education",
    "Consulting",
    "Manufacturing",
    "Retail",
    "Media",
    "Non-profit",
    "Real Estate",
    "Energy",
    "Transportation",
    "Entertainment",
    "Agriculture",
    "Other",
];

/// Stored onboarding profile for one user.
///
/// # Examples
/// ```
/// use coffee_chat::domain::{UserId, UserPreferences};
///
/// let empty = UserPreferences::empty(UserId::random());
/// assert!(!empty.has_profile());
///
/// let named = UserPreferences::builder(empty.user_id).first_name("Jane").build();
/// assert!(named.has_profile());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub interests: Vec<String>,
    pub goals: String,
    pub timezone: String,
    pub preferred_roles: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub weekly_target: u8,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    /// Row created at sign-up, before onboarding.
    pub fn empty(user_id: UserId) -> Self {
        UserPreferencesBuilder::new(user_id).build()
    }

    /// Start building preferences for `user_id`.
    pub fn builder(user_id: UserId) -> UserPreferencesBuilder {
        UserPreferencesBuilder::new(user_id)
    }

    /// Whether onboarding has been completed.
    pub fn has_profile(&self) -> bool {
        !self.first_name.trim().is_empty()
    }
}

/// Builder for [`UserPreferences`].
#[derive(Debug, Clone)]
pub struct UserPreferencesBuilder {
    inner: UserPreferences,
}

impl UserPreferencesBuilder {
    /// Empty profile for `user_id`.
    pub fn new(user_id: UserId) -> Self {
        Self {
            inner: UserPreferences {
                user_id,
                first_name: String::new(),
                last_name: String::new(),
                interests: Vec::new(),
                goals: String::new(),
                timezone: DEFAULT_TIMEZONE.to_owned(),
                preferred_roles: Vec::new(),
                preferred_industries: Vec::new(),
                weekly_target: DEFAULT_WEEKLY_TARGET,
                updated_at: Utc::now(),
            },
        }
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.inner.first_name = value.into();
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.inner.last_name = value.into();
        self
    }

    pub fn interests(mut self, value: Vec<String>) -> Self {
        self.inner.interests = value;
        self
    }

    pub fn goals(mut self, value: impl Into<String>) -> Self {
        self.inner.goals = value.into();
        self
    }

    pub fn timezone(mut self, value: impl Into<String>) -> Self {
        self.inner.timezone = value.into();
        self
    }

    pub fn preferred_roles(mut self, value: Vec<String>) -> Self {
        self.inner.preferred_roles = value;
        self
    }

    pub fn preferred_industries(mut self, value: Vec<String>) -> Self {
        self.inner.preferred_industries = value;
        self
    }

    pub fn weekly_target(mut self, value: u8) -> Self {
        self.inner.weekly_target = value;
        self
    }

    pub fn updated_at(mut self, value: DateTime<Utc>) -> Self {
        self.inner.updated_at = value;
        self
    }

    pub fn build(self) -> UserPreferences {
        self.inner
    }
}
