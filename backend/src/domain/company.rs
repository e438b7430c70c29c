//! Companies and the tagged company reference carried by people.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CompanyId;

/// Shared company lookup record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

/// Where a person works: a known company, a free-text name, or nothing.
///
/// Storage keeps two nullable columns; [`CompanyRef::from_columns`] and
/// [`CompanyRef::to_columns`] convert at the persistence boundary.
///
/// # Examples
/// ```
/// use coffee_chat::domain::CompanyRef;
///
/// let by_name = CompanyRef::from_columns(None, Some("  Acme ".into()));
/// assert_eq!(by_name, CompanyRef::ByName { name: "Acme".into() });
/// assert_eq!(by_name.to_columns(), (None, Some("Acme".to_owned())));
/// assert_eq!(CompanyRef::from_columns(None, Some("   ".into())), CompanyRef::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompanyRef {
    ById { id: CompanyId },
    ByName { name: String },
    #[default]
    Unknown,
}

impl CompanyRef {
    /// Build from the stored columns. The id wins if both are populated.
    pub fn from_columns(company_id: Option<CompanyId>, custom_name: Option<String>) -> Self {
        match (company_id, custom_name) {
            (Some(id), _) => Self::ById { id },
            (None, Some(name)) if !name.trim().is_empty() => Self::ByName {
                name: name.trim().to_owned(),
            },
            _ => Self::Unknown,
        }
    }

    /// Split into `(company_id, custom_company_name)` columns.
    pub fn to_columns(&self) -> (Option<CompanyId>, Option<String>) {
        match self {
            Self::ById { id } => (Some(*id), None),
            Self::ByName { name } => (None, Some(name.clone())),
            Self::Unknown => (None, None),
        }
    }

    pub fn company_id(&self) -> Option<CompanyId> {
        match self {
            Self::ById { id } => Some(*id),
            _ => None,
        }
    }
}

/// Text shown for a person's company: the company name, else the custom
/// name, else `None` (rendered as "Unknown").
pub fn company_label(company: Option<&Company>, company_ref: &CompanyRef) -> Option<String> {
    match (company, company_ref) {
        (Some(company), _) => Some(company.name.clone()),
        (None, CompanyRef::ByName { name }) => Some(name.clone()),
        _ => None,
    }
}
