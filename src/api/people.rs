use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::AppState;
use crate::error::PrmError;
use crate::model::{Id, Interaction, Organization, OrganizationLink, Person, PersonDraft, User};
use crate::ops::person_ops;
use crate::queries::interaction_queries;
use crate::queries::person_queries::{
    self, PeopleQuery, PersonSummary, SortDirection, SortField, SortState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PeopleParams {
    search: Option<String>,
    /// Comma separated.
    organization_ids: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    sort: Option<String>,
    direction: Option<String>,
}

impl PeopleParams {
    fn into_query(self) -> ApiResult<PeopleQuery> {
        let organization_ids = self
            .organization_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Id::<Organization>::parse(s)
                    .map_err(|_| ApiError::bad_request(format!("Invalid organization id: {}", s)))
            })
            .collect::<ApiResult<Vec<_>>>()?;

        let field = match self.sort.as_deref() {
            Some(s) => SortField::parse(s)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown sort field: {}", s)))?,
            None => SortField::default(),
        };
        let direction = match self.direction.as_deref() {
            Some(s) => SortDirection::parse(s)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown sort direction: {}", s)))?,
            None => SortDirection::default(),
        };

        Ok(PeopleQuery {
            search: self.search.unwrap_or_default(),
            organization_ids,
            last_interaction_from: self.from,
            last_interaction_to: self.to,
            sort: SortState::new(field, direction),
        })
    }
}

/// Person body. `organization_ids` is shorthand for links without a role.
#[derive(Debug, Deserialize)]
pub struct PersonInput {
    #[serde(flatten)]
    draft: PersonDraft,
    #[serde(default)]
    organization_ids: Option<Vec<Id<Organization>>>,
}

impl PersonInput {
    fn into_draft(self) -> PersonDraft {
        let mut draft = self.draft;
        if draft.organizations.is_none() {
            draft.organizations = self
                .organization_ids
                .map(|ids| ids.into_iter().map(OrganizationLink::new).collect());
        }
        draft
    }
}

#[derive(Debug, Serialize)]
pub struct PersonDetail {
    person: Person,
    interactions: Vec<Interaction>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiQuery(params): ApiQuery<PeopleParams>,
) -> ApiResult<Json<Vec<PersonSummary>>> {
    let query = params.into_query()?;
    let people = state
        .with_conn(move |conn| person_queries::people_view(conn, user.id, &query))
        .await?;
    Ok(Json(people))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(input): ApiJson<PersonInput>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let draft = input.into_draft();
    let person = state
        .with_conn(move |conn| person_ops::add_person(conn, user.id, &draft))
        .await?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Person>>,
) -> ApiResult<Json<PersonDetail>> {
    let detail = state
        .with_conn(move |conn| {
            let person = person_queries::get_person(conn, user.id, id)?
                .ok_or_else(|| PrmError::not_found("Person", id))?;
            let interactions = interaction_queries::history(conn, user.id, id)?;
            Ok(PersonDetail {
                person,
                interactions,
            })
        })
        .await?;
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Person>>,
    ApiJson(input): ApiJson<PersonInput>,
) -> ApiResult<Json<Person>> {
    let draft = input.into_draft();
    let person = state
        .with_conn(move |conn| person_ops::update_person(conn, user.id, id, &draft))
        .await?;
    Ok(Json(person))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Person>>,
) -> ApiResult<Json<Value>> {
    state
        .with_conn(move |conn| person_ops::delete_person(conn, user.id, id))
        .await?;
    Ok(Json(json!({ "success": true })))
}
