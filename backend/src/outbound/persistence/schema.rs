//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Onboarding profile, one row per user.
    user_preferences (user_id) {
        /// Primary key: auth service user id.
        user_id -> Uuid,
        /// Empty until onboarding completes.
        first_name -> Text,
        last_name -> Text,
        interests -> Array<Text>,
        goals -> Text,
        timezone -> Text,
        preferred_roles -> Array<Text>,
        preferred_industries -> Array<Text>,
        /// Chats per week, 1 to 10.
        weekly_target -> Int2,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shared company catalogue. Read only to this service.
    companies (company_id) {
        company_id -> Uuid,
        name -> Text,
        logo_url -> Nullable<Text>,
        industry -> Nullable<Text>,
    }
}

diesel::table! {
    /// People a user has met or plans to meet.
    ///
    /// At most one of `company_id` and `custom_company_name` is set.
    people (person_id) {
        person_id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        role -> Nullable<Text>,
        company_id -> Nullable<Uuid>,
        custom_company_name -> Nullable<Text>,
        linkedin_url -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Scheduled chats.
    chats (chat_id) {
        chat_id -> Uuid,
        user_id -> Uuid,
        person_id -> Uuid,
        scheduled_at -> Timestamptz,
        location -> Nullable<Text>,
        /// `scheduled`, `completed` or `cancelled`.
        status -> Text,
        prep_notes -> Nullable<Text>,
        /// Set when the chat's note is first created.
        note_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Notes, unique per chat.
    notes (note_id) {
        note_id -> Uuid,
        /// Unique: one note per chat.
        chat_id -> Uuid,
        person_id -> Uuid,
        company_id -> Nullable<Uuid>,
        /// JSON object keyed by section name.
        sections -> Jsonb,
        tags -> Array<Text>,
        is_interview_relevant -> Bool,
        summary -> Nullable<Text>,
        /// Optimistic concurrency counter.
        revision -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(chats -> people (person_id));
diesel::joinable!(people -> companies (company_id));

diesel::allow_tables_to_appear_in_same_query!(chats, companies, notes, people, user_preferences);
