//! Multi-step onboarding wizard state and validation.
//!
//! The wizard walks through five steps. Each step validates only its own
//! fields; submitting the whole draft validates every step in order and
//! reports the first failure.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::preferences::{DEFAULT_TIMEZONE, DEFAULT_WEEKLY_TARGET, INDUSTRIES, ROLES};
use super::{UserId, UserPreferences};

/// Bounds for the weekly chat target.
pub const WEEKLY_TARGET_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Onboarding wizard steps in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum OnboardingStep {
    Name,
    Interests,
    Roles,
    Industries,
    Networking,
}

impl OnboardingStep {
    /// Every step, first to last.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Interests,
        Self::Roles,
        Self::Industries,
        Self::Networking,
    ];

    /// One-based position shown as "step N of 5".
    pub fn number(self) -> u8 {
        match self {
            Self::Name => 1,
            Self::Interests => 2,
            Self::Roles => 3,
            Self::Industries => 4,
            Self::Networking => 5,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Name => Some(Self::Interests),
            Self::Interests => Some(Self::Roles),
            Self::Roles => Some(Self::Industries),
            Self::Industries => Some(Self::Networking),
            Self::Networking => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Name => None,
            Self::Interests => Some(Self::Name),
            Self::Roles => Some(Self::Interests),
            Self::Industries => Some(Self::Roles),
            Self::Networking => Some(Self::Industries),
        }
    }
}

/// Validation failures raised by the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    FirstNameRequired,
    LastNameRequired,
    GoalsRequired,
    InterestRequired,
    RoleRequired,
    UnknownRole(String),
    IndustryRequired,
    UnknownIndustry(String),
    WeeklyTargetOutOfRange { min: u8, max: u8 },
    TimezoneRequired,
}

impl OnboardingError {
    /// Step that owns the failing field.
    pub fn step(&self) -> OnboardingStep {
        match self {
            Self::FirstNameRequired | Self::LastNameRequired => OnboardingStep::Name,
            Self::GoalsRequired | Self::InterestRequired => OnboardingStep::Interests,
            Self::RoleRequired | Self::UnknownRole(_) => OnboardingStep::Roles,
            Self::IndustryRequired | Self::UnknownIndustry(_) => OnboardingStep::Industries,
            Self::WeeklyTargetOutOfRange { .. } | Self::TimezoneRequired => {
                OnboardingStep::Networking
            }
        }
    }

    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::FirstNameRequired => "firstName",
            Self::LastNameRequired => "lastName",
            Self::GoalsRequired => "goals",
            Self::InterestRequired => "interests",
            Self::RoleRequired | Self::UnknownRole(_) => "preferredRoles",
            Self::IndustryRequired | Self::UnknownIndustry(_) => "preferredIndustries",
            Self::WeeklyTargetOutOfRange { .. } => "weeklyTarget",
            Self::TimezoneRequired => "timezone",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FirstNameRequired
            | Self::LastNameRequired
            | Self::GoalsRequired
            | Self::TimezoneRequired => "required",
            Self::InterestRequired | Self::RoleRequired | Self::IndustryRequired => {
                "at_least_one"
            }
            Self::UnknownRole(_) | Self::UnknownIndustry(_) => "unknown_option",
            Self::WeeklyTargetOutOfRange { .. } => "out_of_range",
        }
    }
}

impl fmt::Display for OnboardingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstNameRequired => write!(f, "First name is required."),
            Self::LastNameRequired => write!(f, "Last name is required."),
            Self::GoalsRequired => write!(f, "Please describe your networking goals."),
            Self::InterestRequired => write!(f, "Please add at least one interest."),
            Self::RoleRequired => write!(f, "Please select at least one role."),
            Self::UnknownRole(role) => write!(f, "Unknown role: {role}"),
            Self::IndustryRequired => write!(f, "Please select at least one industry."),
            Self::UnknownIndustry(industry) => write!(f, "Unknown industry: {industry}"),
            Self::WeeklyTargetOutOfRange { min, max } => {
                write!(f, "Weekly target must be between {min} and {max}.")
            }
            Self::TimezoneRequired => write!(f, "Timezone is required."),
        }
    }
}

impl std::error::Error for OnboardingError {}

/// Answers collected by the wizard.
///
/// # Examples
/// ```
/// use coffee_chat::domain::{OnboardingDraft, OnboardingStep};
///
/// let mut draft = OnboardingDraft::default();
/// draft.first_name = "Jane".into();
/// draft.last_name = "Doe".into();
/// assert!(draft.validate_step(OnboardingStep::Name).is_ok());
/// assert!(draft.validate_step(OnboardingStep::Interests).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingDraft {
    pub first_name: String,
    pub last_name: String,
    pub interests: Vec<String>,
    pub goals: String,
    pub timezone: String,
    pub preferred_roles: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub weekly_target: u8,
}

impl Default for OnboardingDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            interests: Vec::new(),
            goals: String::new(),
            timezone: DEFAULT_TIMEZONE.to_owned(),
            preferred_roles: Vec::new(),
            preferred_industries: Vec::new(),
            weekly_target: DEFAULT_WEEKLY_TARGET,
        }
    }
}

fn toggle(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|item| item == value) {
        list.remove(pos);
    } else {
        list.push(value.to_owned());
    }
}

impl OnboardingDraft {
    /// Seed a draft from stored preferences.
    pub fn from_preferences(prefs: &UserPreferences) -> Self {
        Self {
            first_name: prefs.first_name.clone(),
            last_name: prefs.last_name.clone(),
            interests: prefs.interests.clone(),
            goals: prefs.goals.clone(),
            timezone: prefs.timezone.clone(),
            preferred_roles: prefs.preferred_roles.clone(),
            preferred_industries: prefs.preferred_industries.clone(),
            weekly_target: prefs.weekly_target,
        }
    }

    /// Add a trimmed interest. Blank and duplicate values are ignored.
    pub fn add_interest(&mut self, interest: &str) -> bool {
        let trimmed = interest.trim();
        if trimmed.is_empty() || self.interests.iter().any(|i| i == trimmed) {
            return false;
        }
        self.interests.push(trimmed.to_owned());
        true
    }

    pub fn remove_interest(&mut self, interest: &str) {
        self.interests.retain(|i| i != interest);
    }

    pub fn toggle_role(&mut self, role: &str) {
        toggle(&mut self.preferred_roles, role);
    }

    pub fn toggle_industry(&mut self, industry: &str) {
        toggle(&mut self.preferred_industries, industry);
    }

    /// Validate the fields owned by `step`.
    pub fn validate_step(&self, step: OnboardingStep) -> Result<(), OnboardingError> {
        match step {
            OnboardingStep::Name => {
                if self.first_name.trim().is_empty() {
                    return Err(OnboardingError::FirstNameRequired);
                }
                if self.last_name.trim().is_empty() {
                    return Err(OnboardingError::LastNameRequired);
                }
            }
            OnboardingStep::Interests => {
                if self.goals.trim().is_empty() {
                    return Err(OnboardingError::GoalsRequired);
                }
                if !self.interests.iter().any(|i| !i.trim().is_empty()) {
                    return Err(OnboardingError::InterestRequired);
                }
            }
            OnboardingStep::Roles => {
                if self.preferred_roles.is_empty() {
                    return Err(OnboardingError::RoleRequired);
                }
                if let Some(unknown) = self
                    .preferred_roles
                    .iter()
                    .find(|role| !ROLES.contains(&role.as_str()))
                {
                    return Err(OnboardingError::UnknownRole(unknown.clone()));
                }
            }
            OnboardingStep::Industries => {
                if self.preferred_industries.is_empty() {
                    return Err(OnboardingError::IndustryRequired);
                }
                if let Some(unknown) = self
                    .preferred_industries
                    .iter()
                    .find(|industry| !INDUSTRIES.contains(&industry.as_str()))
                {
                    return Err(OnboardingError::UnknownIndustry(unknown.clone()));
                }
            }
            OnboardingStep::Networking => {
                if !WEEKLY_TARGET_RANGE.contains(&self.weekly_target) {
                    return Err(OnboardingError::WeeklyTargetOutOfRange {
                        min: *WEEKLY_TARGET_RANGE.start(),
                        max: *WEEKLY_TARGET_RANGE.end(),
                    });
                }
                if self.timezone.trim().is_empty() {
                    return Err(OnboardingError::TimezoneRequired);
                }
            }
        }
        Ok(())
    }

    /// Validate every step in order.
    pub fn validate(&self) -> Result<(), OnboardingError> {
        OnboardingStep::ALL
            .iter()
            .try_for_each(|step| self.validate_step(*step))
    }

    /// Validate and convert into the stored profile.
    pub fn into_preferences(
        self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<UserPreferences, OnboardingError> {
        self.validate()?;
        let mut interests: Vec<String> = Vec::with_capacity(self.interests.len());
        for interest in self.interests.iter().map(|i| i.trim()) {
            if !interest.is_empty() && !interests.iter().any(|i| i == interest) {
                interests.push(interest.to_owned());
            }
        }
        Ok(UserPreferences::builder(user_id)
            .first_name(self.first_name.trim())
            .last_name(self.last_name.trim())
            .interests(interests)
            .goals(self.goals.trim())
            .timezone(self.timezone.trim())
            .preferred_roles(self.preferred_roles)
            .preferred_industries(self.preferred_industries)
            .weekly_target(self.weekly_target)
            .updated_at(now)
            .build())
    }
}

/// Wizard position plus collected answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingWizard {
    step: OnboardingStep,
    draft: OnboardingDraft,
}

impl OnboardingWizard {
    pub fn new(draft: OnboardingDraft) -> Self {
        Self {
            step: OnboardingStep::Name,
            draft,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn draft(&self) -> &OnboardingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut OnboardingDraft {
        &mut self.draft
    }

    /// Move forward once the current step validates.
    ///
    /// Returns `Ok(None)` on the last step, meaning the draft is ready to
    /// submit.
    pub fn advance(&mut self) -> Result<Option<OnboardingStep>, OnboardingError> {
        self.draft.validate_step(self.step)?;
        let next = self.step.next();
        if let Some(step) = next {
            self.step = step;
        }
        Ok(next)
    }

    /// Move back without validating.
    pub fn back(&mut self) -> OnboardingStep {
        if let Some(step) = self.step.previous() {
            self.step = step;
        }
        self.step
    }

    /// Progress through the wizard as a percentage.
    pub fn progress_percent(&self) -> u8 {
        self.step.number() * 20
    }
}
