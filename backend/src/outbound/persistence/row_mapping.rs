//! Conversions from Diesel rows to domain types shared by several adapters.

use tracing::warn;

use crate::domain::{
    Chat, ChatId, ChatStatus, Company, CompanyId, CompanyRef, Note, NoteContent, NoteId, Person,
    PersonId, ProfileUrl, UserId,
};

use super::diesel_helpers::cast_revision;
use super::json_serializers::json_to_sections;
use super::models::{ChatRow, CompanyRow, NoteRow, PersonRow};

pub(super) fn company_from_row(row: CompanyRow) -> Company {
    Company {
        id: CompanyId::from_uuid(row.company_id),
        name: row.name,
        logo_url: row.logo_url,
        industry: row.industry,
    }
}

pub(super) fn person_from_row(row: PersonRow) -> Person {
    Person {
        id: PersonId::from_uuid(row.person_id),
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
        role: row.role,
        company: CompanyRef::from_columns(
            row.company_id.map(CompanyId::from_uuid),
            row.custom_company_name,
        ),
        linkedin_url: row
            .linkedin_url
            .filter(|url| !url.trim().is_empty())
            .map(ProfileUrl::from_stored),
        created_at: row.created_at,
    }
}

pub(super) fn chat_from_row(row: ChatRow) -> Chat {
    let status = row.status.parse().unwrap_or_else(|_| {
        warn!(
            value = %row.status,
            chat_id = %row.chat_id,
            "unrecognised chat status, defaulting to scheduled"
        );
        ChatStatus::Scheduled
    });
    Chat {
        id: ChatId::from_uuid(row.chat_id),
        user_id: UserId::from_uuid(row.user_id),
        person_id: PersonId::from_uuid(row.person_id),
        scheduled_at: row.scheduled_at,
        location: row.location,
        status,
        prep_notes: row.prep_notes,
        note_id: row.note_id.map(NoteId::from_uuid),
    }
}

pub(super) fn note_from_row(row: NoteRow) -> Result<Note, String> {
    let sections = json_to_sections(row.sections)?;
    Ok(Note {
        id: NoteId::from_uuid(row.note_id),
        chat_id: ChatId::from_uuid(row.chat_id),
        person_id: PersonId::from_uuid(row.person_id),
        company_id: row.company_id.map(CompanyId::from_uuid),
        content: NoteContent {
            sections,
            tags: row.tags,
            is_interview_relevant: row.is_interview_relevant,
        },
        summary: row.summary,
        revision: cast_revision(row.revision),
        updated_at: row.updated_at,
    })
}
