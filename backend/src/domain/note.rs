//! Structured notes attached one-to-one to chats.
//!
//! Section edits are immutable replacements: [`NoteContent::with_section`]
//! returns a new value and leaves the other sections untouched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ChatId, CompanyId, NoteId, PersonId};

/// The six fixed note sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SectionName {
    Background,
    DayToDay,
    Advice,
    Culture,
    KeyQuotes,
    PersonalTakeaways,
}

impl SectionName {
    pub const ALL: [Self; 6] = [
        Self::Background,
        Self::DayToDay,
        Self::Advice,
        Self::Culture,
        Self::KeyQuotes,
        Self::PersonalTakeaways,
    ];

    /// Key used in the stored JSON object and in URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::DayToDay => "dayToDay",
            Self::Advice => "advice",
            Self::Culture => "culture",
            Self::KeyQuotes => "keyQuotes",
            Self::PersonalTakeaways => "personalTakeaways",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown section name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown note section: {input}")]
pub struct ParseSectionNameError {
    pub input: String,
}

impl FromStr for SectionName {
    type Err = ParseSectionNameError;

    /// Accepts the camelCase keys and their snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "background" => Ok(Self::Background),
            "dayToDay" | "day_to_day" => Ok(Self::DayToDay),
            "advice" => Ok(Self::Advice),
            "culture" => Ok(Self::Culture),
            "keyQuotes" | "key_quotes" => Ok(Self::KeyQuotes),
            "personalTakeaways" | "personal_takeaways" => Ok(Self::PersonalTakeaways),
            other => Err(ParseSectionNameError {
                input: other.to_owned(),
            }),
        }
    }
}

/// Free text for each section. Missing keys in stored JSON read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteSections {
    pub background: String,
    pub day_to_day: String,
    pub advice: String,
    pub culture: String,
    pub key_quotes: String,
    pub personal_takeaways: String,
}

impl NoteSections {
    pub fn get(&self, section: SectionName) -> &str {
        match section {
            SectionName::Background => &self.background,
            SectionName::DayToDay => &self.day_to_day,
            SectionName::Advice => &self.advice,
            SectionName::Culture => &self.culture,
            SectionName::KeyQuotes => &self.key_quotes,
            SectionName::PersonalTakeaways => &self.personal_takeaways,
        }
    }

    /// Copy with one section replaced.
    ///
    /// # Examples
    /// ```
    /// use coffee_chat::domain::{NoteSections, SectionName};
    ///
    /// let sections = NoteSections::default().with_section(SectionName::Advice, "ship it");
    /// assert_eq!(sections.get(SectionName::Advice), "ship it");
    /// assert_eq!(sections.get(SectionName::Culture), "");
    /// ```
    #[must_use]
    pub fn with_section(&self, section: SectionName, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match section {
            SectionName::Background => &mut next.background,
            SectionName::DayToDay => &mut next.day_to_day,
            SectionName::Advice => &mut next.advice,
            SectionName::Culture => &mut next.culture,
            SectionName::KeyQuotes => &mut next.key_quotes,
            SectionName::PersonalTakeaways => &mut next.personal_takeaways,
        };
        *slot = text.into();
        next
    }

    pub fn is_empty(&self) -> bool {
        SectionName::ALL.iter().all(|s| self.get(*s).is_empty())
    }
}

/// The user-editable part of a note, written as one row update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteContent {
    pub sections: NoteSections,
    pub tags: Vec<String>,
    pub is_interview_relevant: bool,
}

impl NoteContent {
    #[must_use]
    pub fn with_section(&self, section: SectionName, text: impl Into<String>) -> Self {
        Self {
            sections: self.sections.with_section(section, text),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_interview_relevant(&self, flag: bool) -> Self {
        Self {
            is_interview_relevant: flag,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_tags(&self, tags: Vec<String>) -> Self {
        Self {
            tags: normalize_tags(tags),
            ..self.clone()
        }
    }
}

/// Trim tags, drop blanks, and keep the first of any duplicates.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if !trimmed.is_empty() && !out.iter().any(|t| t == trimmed) {
            out.push(trimmed.to_owned());
        }
    }
    out
}

/// Stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub chat_id: ChatId,
    pub person_id: PersonId,
    pub company_id: Option<CompanyId>,
    #[serde(flatten)]
    pub content: NoteContent,
    /// Written by an external summarizer, never by this service.
    pub summary: Option<String>,
    /// Optimistic concurrency counter, bumped on every write.
    pub revision: u32,
    pub updated_at: DateTime<Utc>,
}

/// Blank note inserted on first access to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub id: NoteId,
    pub chat_id: ChatId,
    pub person_id: PersonId,
    pub company_id: Option<CompanyId>,
    pub content: NoteContent,
}

impl NewNote {
    /// Empty sections and tags, not interview relevant.
    pub fn blank(chat_id: ChatId, person_id: PersonId, company_id: Option<CompanyId>) -> Self {
        Self {
            id: NoteId::random(),
            chat_id,
            person_id,
            company_id,
            content: NoteContent::default(),
        }
    }
}
