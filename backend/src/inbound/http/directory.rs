//! People and company HTTP handlers.
//!
//! ```text
//! GET  /api/v1/people?q=
//! POST /api/v1/people
//! GET  /api/v1/companies?q=
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Company, Error, PersonDraft, PersonEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_id};

/// Substring filter for list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring; blank returns everything.
    pub q: Option<String>,
}

/// Inline person creation form.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Known company; mutually exclusive with `customCompanyName`.
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub custom_company_name: Option<String>,
    #[serde(default)]
    #[schema(example = "https://www.linkedin.com/in/janedoe")]
    pub linkedin_url: Option<String>,
}

impl TryFrom<CreatePersonRequest> for PersonDraft {
    type Error = Error;

    fn try_from(value: CreatePersonRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            role: value.role,
            company_id: parse_optional_id(
                value.company_id.as_deref(),
                FieldName::new("companyId"),
            )?,
            custom_company_name: value.custom_company_name,
            linkedin_url: value.linkedin_url,
        })
    }
}

/// List the signed-in user's people.
#[utoipa::path(
    get,
    path = "/api/v1/people",
    params(SearchQuery),
    responses(
        (status = 200, description = "People, newest first", body = [PersonEntry]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["directory"],
    operation_id = "listPeople"
)]
#[get("/people")]
pub async fn list_people(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let people = state
        .directory
        .list_people(&user_id, query.into_inner().q)
        .await?;
    Ok(HttpResponse::Ok().insert_header(private_no_cache()).json(people))
}

/// Add a person from the inline form.
#[utoipa::path(
    post,
    path = "/api/v1/people",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Person created", body = PersonEntry),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["directory"],
    operation_id = "createPerson"
)]
#[post("/people")]
pub async fn create_person(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePersonRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = PersonDraft::try_from(payload.into_inner())?;
    let entry = state.directory.create_person(&user_id, draft).await?;
    Ok(HttpResponse::Created().json(entry))
}

/// List companies for the dropdown.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    params(SearchQuery),
    responses(
        (status = 200, description = "Companies by name", body = [Company]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["directory"],
    operation_id = "listCompanies"
)]
#[get("/companies")]
pub async fn list_companies(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<Company>>> {
    session.require_user_id()?;
    let companies = state.directory.list_companies(query.into_inner().q).await?;
    Ok(web::Json(companies))
}
