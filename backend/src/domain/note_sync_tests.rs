//! Tests for the note synchronization service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockChatRepository, MockNoteRepository};
use crate::domain::{ChatStatus, CompanyId, CompanyRef, ErrorCode, NoteId, PersonId};
use chrono::Utc;
use rstest::{fixture, rstest};

type Service = NoteSyncService<MockChatRepository, MockNoteRepository>;

#[fixture]
fn context() -> ChatContext {
    let user_id = UserId::random();
    let person = Person {
        id: PersonId::random(),
        user_id,
        name: "Jane Doe".into(),
        role: Some("Designer".into()),
        company: CompanyRef::ById {
            id: CompanyId::random(),
        },
        linkedin_url: None,
        created_at: Utc::now(),
    };
    let chat = Chat {
        id: ChatId::random(),
        user_id,
        person_id: person.id,
        scheduled_at: Utc::now(),
        location: None,
        status: ChatStatus::Scheduled,
        prep_notes: None,
        note_id: None,
    };
    ChatContext {
        chat,
        person,
        company: None,
    }
}

fn stored_note(context: &ChatContext, content: NoteContent, revision: u32) -> Note {
    Note {
        id: NoteId::random(),
        chat_id: context.chat.id,
        person_id: context.person.id,
        company_id: context.person.company.company_id(),
        content,
        summary: None,
        revision,
        updated_at: Utc::now(),
    }
}

fn chats_returning(context: &ChatContext) -> MockChatRepository {
    let found = context.clone();
    let mut chats = MockChatRepository::new();
    chats
        .expect_find_context()
        .returning(move |_, _| Ok(Some(found.clone())));
    chats
}

fn service(chats: MockChatRepository, notes: MockNoteRepository) -> Service {
    NoteSyncService::new(Arc::new(chats), Arc::new(notes))
}

#[rstest]
#[tokio::test]
async fn load_creates_blank_note_when_absent(context: ChatContext) {
    let mut notes = MockNoteRepository::new();
    notes.expect_find_by_chat().times(1).return_once(|_| Ok(None));
    let expected_person = context.person.id;
    let expected_company = context.person.company.company_id();
    let ctx = context.clone();
    notes
        .expect_ensure_for_chat()
        .withf(move |new| {
            new.person_id == expected_person
                && new.company_id == expected_company
                && new.content == NoteContent::default()
        })
        .times(1)
        .return_once(move |new| {
            Ok(Note {
                id: new.id,
                ..stored_note(&ctx, NoteContent::default(), 0)
            })
        });

    let loaded = service(chats_returning(&context), notes)
        .load_or_create(&context.chat.user_id, &context.chat.id)
        .await
        .expect("load note");
    assert!(!loaded.note.content.is_interview_relevant);
    assert!(loaded.note.content.sections.is_empty());
    assert_eq!(loaded.person.name, "Jane Doe");
}

#[rstest]
#[tokio::test]
async fn load_hydrates_existing_note_without_writing(context: ChatContext) {
    let existing = stored_note(
        &context,
        NoteContent::default().with_section(SectionName::Advice, "ask"),
        4,
    );
    let returned = existing.clone();
    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_by_chat()
        .return_once(move |_| Ok(Some(returned)));
    notes.expect_ensure_for_chat().never();

    let loaded = service(chats_returning(&context), notes)
        .load_or_create(&context.chat.user_id, &context.chat.id)
        .await
        .expect("load note");
    assert_eq!(loaded.note, existing);
}

#[tokio::test]
async fn load_unknown_chat_is_not_found() {
    let mut chats = MockChatRepository::new();
    chats.expect_find_context().return_once(|_, _| Ok(None));
    let mut notes = MockNoteRepository::new();
    notes.expect_find_by_chat().never();

    let err = service(chats, notes)
        .load_or_create(&UserId::random(), &ChatId::random())
        .await
        .expect_err("missing chat");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_section_writes_full_content_at_read_revision(context: ChatContext) {
    let existing = stored_note(
        &context,
        NoteContent::default()
            .with_section(SectionName::Culture, "remote")
            .with_tags(vec!["ai".into()]),
        2,
    );
    let ctx = context.clone();
    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_by_chat()
        .return_once(move |_| Ok(Some(existing)));
    notes
        .expect_save_content()
        .withf(|_, content, revision| {
            *revision == 2
                && content.sections.advice == "y"
                && content.sections.culture == "remote"
                && content.tags == vec!["ai".to_owned()]
        })
        .times(1)
        .return_once(move |_, content, _| Ok(stored_note(&ctx, content.clone(), 3)));

    let note = service(chats_returning(&context), notes)
        .update_section(
            &context.chat.user_id,
            &context.chat.id,
            SectionName::Advice,
            "y".into(),
            None,
        )
        .await
        .expect("update section");
    assert_eq!(note.revision, 3);
}

#[rstest]
#[tokio::test]
async fn stale_expected_revision_conflicts_before_writing(context: ChatContext) {
    let existing = stored_note(&context, NoteContent::default(), 5);
    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_by_chat()
        .return_once(move |_| Ok(Some(existing)));
    notes.expect_save_content().never();

    let err = service(chats_returning(&context), notes)
        .update_section(
            &context.chat.user_id,
            &context.chat.id,
            SectionName::Advice,
            "late".into(),
            Some(4),
        )
        .await
        .expect_err("stale revision");
    assert_eq!(err.code(), ErrorCode::Conflict);
    let details = err.details().expect("details");
    assert_eq!(details["expectedRevision"], 4);
    assert_eq!(details["actualRevision"], 5);
}

#[rstest]
#[tokio::test]
async fn concurrent_write_surfaces_as_conflict(context: ChatContext) {
    let existing = stored_note(&context, NoteContent::default(), 1);
    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_by_chat()
        .return_once(move |_| Ok(Some(existing)));
    notes
        .expect_save_content()
        .return_once(|_, _, _| Err(NoteRepositoryError::revision_mismatch(1_u32, 2_u32)));

    let err = service(chats_returning(&context), notes)
        .update_section(
            &context.chat.user_id,
            &context.chat.id,
            SectionName::Background,
            "text".into(),
            None,
        )
        .await
        .expect_err("raced write");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn interview_flag_only_touches_flag(context: ChatContext) {
    let existing = stored_note(&context, NoteContent::default(), 0);
    let ctx = context.clone();
    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_by_chat()
        .return_once(move |_| Ok(Some(existing)));
    notes.expect_save_content().never();
    notes
        .expect_save_interview_relevant()
        .withf(|_, flag, revision| *flag && *revision == 0)
        .times(1)
        .return_once(move |_, flag, _| {
            Ok(stored_note(
                &ctx,
                NoteContent::default().with_interview_relevant(flag),
                1,
            ))
        });

    let note = service(chats_returning(&context), notes)
        .set_interview_relevant(&context.chat.user_id, &context.chat.id, true, Some(0))
        .await
        .expect("flag saved");
    assert!(note.content.is_interview_relevant);
}

#[rstest]
#[tokio::test]
async fn update_tags_normalizes(context: ChatContext) {
    let existing = stored_note(&context, NoteContent::default(), 0);
    let ctx = context.clone();
    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_by_chat()
        .return_once(move |_| Ok(Some(existing)));
    notes
        .expect_save_content()
        .withf(|_, content, _| content.tags == vec!["ml".to_owned()])
        .return_once(move |_, content, _| Ok(stored_note(&ctx, content.clone(), 1)));

    let note = service(chats_returning(&context), notes)
        .update_tags(
            &context.chat.user_id,
            &context.chat.id,
            vec![" ml ".into(), "ml".into()],
            None,
        )
        .await
        .expect("tags saved");
    assert_eq!(note.content.tags, vec!["ml".to_owned()]);
}
