//! Access gate HTTP handler.
//!
//! ```text
//! GET /api/v1/gate
//! ```
//!
//! Tells the client which top-level view to render for the current cookie.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{GateState, GateView, ProfileStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolved gate state as exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum GateStateDto {
    Unresolved,
    LoggedOut,
    NoProfile,
    HasProfile,
}

impl From<GateState> for GateStateDto {
    fn from(state: GateState) -> Self {
        match state {
            GateState::Unresolved => Self::Unresolved,
            GateState::LoggedOut => Self::LoggedOut,
            GateState::LoggedIn(ProfileStatus::NoProfile) => Self::NoProfile,
            GateState::LoggedIn(ProfileStatus::HasProfile) => Self::HasProfile,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GateResponse {
    pub state: GateStateDto,
    pub view: GateView,
}

impl From<GateState> for GateResponse {
    fn from(state: GateState) -> Self {
        Self {
            state: state.into(),
            view: state.view(),
        }
    }
}

/// Resolve the gate for the session cookie.
#[utoipa::path(
    get,
    path = "/api/v1/gate",
    responses((status = 200, description = "Gate state", body = GateResponse)),
    tags = ["gate"],
    operation_id = "resolveGate",
    security([])
)]
#[get("/gate")]
pub async fn resolve_gate(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.user_id()?;
    let gate = state.gate.resolve(user_id).await;
    Ok(HttpResponse::Ok()
        .insert_header(no_store())
        .json(GateResponse::from(gate)))
}
