//! Dashboard and chat scheduling HTTP handlers.
//!
//! ```text
//! GET  /api/v1/chats
//! POST /api/v1/chats
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Chat, ChatDraft, Dashboard, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_id};

/// Scheduling form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleChatRequest {
    pub person_id: Option<String>,
    /// RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` read as UTC.
    #[schema(example = "2026-03-14T15:30")]
    pub scheduled_at: Option<String>,
    /// Blank means virtual.
    pub location: Option<String>,
    pub prep_notes: Option<String>,
}

impl TryFrom<ScheduleChatRequest> for ChatDraft {
    type Error = Error;

    fn try_from(value: ScheduleChatRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            person_id: parse_optional_id(value.person_id.as_deref(), FieldName::new("personId"))?,
            scheduled_at: value.scheduled_at,
            location: value.location,
            prep_notes: value.prep_notes,
        })
    }
}

/// Home dashboard: greeting, upcoming count and every chat.
#[utoipa::path(
    get,
    path = "/api/v1/chats",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["chats"],
    operation_id = "getDashboard"
)]
#[get("/chats")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let dashboard = state.chats.dashboard(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache())
        .json(dashboard))
}

/// Schedule a chat with one of the user's people.
#[utoipa::path(
    post,
    path = "/api/v1/chats",
    request_body = ScheduleChatRequest,
    responses(
        (status = 201, description = "Chat scheduled", body = Chat),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["chats"],
    operation_id = "scheduleChat"
)]
#[post("/chats")]
pub async fn schedule_chat(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ScheduleChatRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = ChatDraft::try_from(payload.into_inner())?;
    let chat = state.chats.schedule(&user_id, draft).await?;
    Ok(HttpResponse::Created().json(chat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatId, ChatListing, ChatStatus, PersonId, UserId};
    use crate::inbound::http::test_utils::{MockPorts, sign_in, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};

    fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(dashboard).service(schedule_chat);
    }

    #[actix_web::test]
    async fn dashboard_serializes_listing() {
        let mut ports = MockPorts::default();
        ports.chats.expect_dashboard().times(1).returning(|_| {
            Ok(Dashboard {
                first_name: Some("Jane".to_owned()),
                upcoming_count: 1,
                chats: vec![ChatListing {
                    chat_id: ChatId::random(),
                    scheduled_at: Utc::now() + Duration::hours(2),
                    location: "Virtual".to_owned(),
                    status: ChatStatus::Scheduled,
                    person_name: "John Smith".to_owned(),
                    person_role: None,
                    company_name: None,
                }],
            })
        });
        let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
        let cookie = sign_in(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/chats")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["firstName"], "Jane");
        assert_eq!(body["upcomingCount"], 1);
        assert_eq!(body["chats"][0]["location"], "Virtual");
        assert_eq!(body["chats"][0]["status"], "scheduled");
    }

    #[actix_web::test]
    async fn schedule_passes_parsed_person() {
        let person = PersonId::random();
        let mut ports = MockPorts::default();
        ports
            .chats
            .expect_schedule()
            .withf(move |_, draft| {
                draft.person_id == Some(person)
                    && draft.scheduled_at.as_deref() == Some("2026-03-14T15:30")
            })
            .times(1)
            .returning(move |user_id, draft| {
                Ok(Chat {
                    id: ChatId::random(),
                    user_id: *user_id,
                    person_id: person,
                    scheduled_at: Utc::now(),
                    location: draft.location,
                    status: ChatStatus::Scheduled,
                    prep_notes: None,
                    note_id: None,
                })
            });
        let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
        let cookie = sign_in(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/chats")
                .cookie(cookie)
                .set_json(json!({
                    "personId": person.to_string(),
                    "scheduledAt": "2026-03-14T15:30",
                    "location": "Blue Bottle"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["location"], "Blue Bottle");
    }

    #[actix_web::test]
    async fn schedule_rejects_malformed_person_id() {
        let mut ports = MockPorts::default();
        ports.chats.expect_schedule().never();
        let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
        let cookie = sign_in(&app, UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/chats")
                .cookie(cookie)
                .set_json(json!({ "personId": "jane", "scheduledAt": "2026-03-14T15:30" }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
