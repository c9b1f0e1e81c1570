use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath};
use super::AppState;
use crate::db::organization_repo;
use crate::model::{Id, Organization, OrganizationDraft, User};
use crate::ops::organization_ops;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<Organization>>> {
    let orgs = state
        .with_conn(move |conn| organization_repo::find_by_owner(conn, user.id))
        .await?;
    Ok(Json(orgs))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(draft): ApiJson<OrganizationDraft>,
) -> ApiResult<(StatusCode, Json<Organization>)> {
    let org = state
        .with_conn(move |conn| organization_ops::add_organization(conn, user.id, &draft))
        .await?;
    Ok((StatusCode::CREATED, Json(org)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Organization>>,
    ApiJson(draft): ApiJson<OrganizationDraft>,
) -> ApiResult<Json<Organization>> {
    let org = state
        .with_conn(move |conn| organization_ops::update_organization(conn, user.id, id, &draft))
        .await?;
    Ok(Json(org))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Organization>>,
) -> ApiResult<Json<Value>> {
    state
        .with_conn(move |conn| organization_ops::delete_organization(conn, user.id, id))
        .await?;
    Ok(Json(json!({ "success": true })))
}
