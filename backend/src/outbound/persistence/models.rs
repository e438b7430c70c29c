//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{chats, companies, notes, people, user_preferences};

// ---------------------------------------------------------------------------
// User preferences models
// ---------------------------------------------------------------------------

/// Row struct for reading from the user_preferences table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserPreferencesRow {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub interests: Vec<String>,
    pub goals: String,
    pub timezone: String,
    pub preferred_roles: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub weekly_target: i16,
    pub updated_at: DateTime<Utc>,
}

/// Insertable and changeset struct for a full preferences row.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = user_preferences)]
pub(crate) struct UserPreferencesUpsert<'a> {
    pub user_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub interests: &'a [String],
    pub goals: &'a str,
    pub timezone: &'a str,
    pub preferred_roles: &'a [String],
    pub preferred_industries: &'a [String],
    pub weekly_target: i16,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Directory models
// ---------------------------------------------------------------------------

/// Row struct for reading from the companies table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub company_id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub industry: Option<String>,
}

/// Row struct for reading from the people table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = people)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PersonRow {
    pub person_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub role: Option<String>,
    pub company_id: Option<Uuid>,
    pub custom_company_name: Option<String>,
    pub linkedin_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating people.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = people)]
pub(crate) struct NewPersonRow<'a> {
    pub person_id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub role: Option<&'a str>,
    pub company_id: Option<Uuid>,
    pub custom_company_name: Option<&'a str>,
    pub linkedin_url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Chat models
// ---------------------------------------------------------------------------

/// Row struct for reading from the chats table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = chats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChatRow {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub person_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<String>,
    pub status: String,
    pub prep_notes: Option<String>,
    pub note_id: Option<Uuid>,
}

/// Insertable struct for scheduling chats.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = chats)]
pub(crate) struct NewChatRow<'a> {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub person_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<&'a str>,
    pub status: &'a str,
    pub prep_notes: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Note models
// ---------------------------------------------------------------------------

/// Row struct for reading from the notes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NoteRow {
    pub note_id: Uuid,
    pub chat_id: Uuid,
    pub person_id: Uuid,
    pub company_id: Option<Uuid>,
    pub sections: serde_json::Value,
    pub tags: Vec<String>,
    pub is_interview_relevant: bool,
    pub summary: Option<String>,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for the blank note created on first access.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notes)]
pub(crate) struct NewNoteRow<'a> {
    pub note_id: Uuid,
    pub chat_id: Uuid,
    pub person_id: Uuid,
    pub company_id: Option<Uuid>,
    pub sections: &'a serde_json::Value,
    pub tags: &'a [String],
    pub is_interview_relevant: bool,
}

/// Changeset for a full content write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = notes)]
pub(crate) struct NoteContentUpdate<'a> {
    pub sections: &'a serde_json::Value,
    pub tags: &'a [String],
    pub is_interview_relevant: bool,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for an interview flag write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = notes)]
pub(crate) struct NoteFlagUpdate {
    pub is_interview_relevant: bool,
    pub revision: i32,
    pub updated_at: DateTime<Utc>,
}
