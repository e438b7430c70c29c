//! People the user meets, with inline-creation validation and search.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Company, CompanyRef, PersonId, UserId, company_label};

const PROFILE_URL_PATTERN: &str = r"^https?://(www\.)?linkedin\.com/in/[\w-]+/?$";

fn profile_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(PROFILE_URL_PATTERN) {
        Ok(re) => re,
        Err(err) => panic!("profile URL regex failed to compile: {err}"),
    })
}

/// Validation failures for a new person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    InvalidProfileUrl,
    ConflictingCompany,
}

impl PersonValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::InvalidProfileUrl => "linkedinUrl",
            Self::ConflictingCompany => "company",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "required",
            Self::InvalidProfileUrl => "invalid_profile_url",
            Self::ConflictingCompany => "conflicting_company",
        }
    }
}

impl fmt::Display for PersonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required."),
            Self::InvalidProfileUrl => write!(
                f,
                "Please enter a valid LinkedIn profile URL (e.g. https://linkedin.com/in/username)."
            ),
            Self::ConflictingCompany => {
                write!(f, "Choose either a listed company or a custom company name, not both.")
            }
        }
    }
}

impl std::error::Error for PersonValidationError {}

/// LinkedIn profile link.
///
/// # Examples
/// ```
/// use coffee_chat::domain::ProfileUrl;
///
/// assert!(ProfileUrl::parse("https://linkedin.com/in/jdoe").is_ok());
/// assert!(ProfileUrl::parse("https://linkedin.com/jdoe").is_err());
/// assert_eq!(ProfileUrl::parse_optional("").expect("empty is fine"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "https://linkedin.com/in/jdoe")]
pub struct ProfileUrl(String);

impl ProfileUrl {
    /// Validate a non-empty profile URL.
    pub fn parse(raw: &str) -> Result<Self, PersonValidationError> {
        let trimmed = raw.trim();
        if profile_url_regex().is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(PersonValidationError::InvalidProfileUrl)
        }
    }

    /// Treat blank input as "no link".
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, PersonValidationError> {
        if raw.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(raw).map(Some)
        }
    }

    /// Wrap a value read back from storage without re-validating it.
    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub user_id: UserId,
    pub name: String,
    pub role: Option<String>,
    pub company: CompanyRef,
    pub linkedin_url: Option<ProfileUrl>,
    pub created_at: DateTime<Utc>,
}

/// Person plus the resolved company record, as listed in the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonEntry {
    #[serde(flatten)]
    pub person: Person,
    pub company_name: Option<String>,
}

impl PersonEntry {
    pub fn new(person: Person, company: Option<&Company>) -> Self {
        let company_name = company_label(company, &person.company);
        Self {
            person,
            company_name,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        let contains = |value: &str| value.to_lowercase().contains(needle);
        contains(&self.person.name)
            || self.person.role.as_deref().is_some_and(contains)
            || self.company_name.as_deref().is_some_and(contains)
    }
}

/// Case-insensitive substring search over name, role and company.
///
/// A blank query returns every entry.
pub fn filter_people<'a>(entries: &'a [PersonEntry], query: &str) -> Vec<&'a PersonEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }
    entries.iter().filter(|entry| entry.matches(&needle)).collect()
}

/// Raw inline-creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub role: Option<String>,
    pub company_id: Option<super::CompanyId>,
    pub custom_company_name: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Validated person ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub user_id: UserId,
    pub name: String,
    pub role: Option<String>,
    pub company: CompanyRef,
    pub linkedin_url: Option<ProfileUrl>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl NewPerson {
    /// Validate a draft for `user_id`.
    pub fn try_from_draft(
        user_id: UserId,
        draft: PersonDraft,
    ) -> Result<Self, PersonValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        let custom = non_blank(draft.custom_company_name);
        if draft.company_id.is_some() && custom.is_some() {
            return Err(PersonValidationError::ConflictingCompany);
        }
        let linkedin_url = match draft.linkedin_url {
            Some(raw) => ProfileUrl::parse_optional(&raw)?,
            None => None,
        };
        Ok(Self {
            user_id,
            name: name.to_owned(),
            role: non_blank(draft.role),
            company: CompanyRef::from_columns(draft.company_id, custom),
            linkedin_url,
        })
    }
}
