use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiResult;
use super::extract::{ApiJson, ApiPath};
use super::AppState;
use crate::model::{Id, Interaction, InteractionDraft, User};
use crate::ops::interaction_ops;
use crate::queries::interaction_queries::{self, InteractionDetail};

/// A single interaction or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InteractionBody {
    Many(Vec<InteractionDraft>),
    One(InteractionDraft),
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<InteractionDetail>>> {
    let rows = state
        .with_conn(move |conn| interaction_queries::with_details(conn, user.id))
        .await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(body): ApiJson<InteractionBody>,
) -> ApiResult<Response> {
    let response = match body {
        InteractionBody::One(draft) => {
            let logged = state
                .with_conn(move |conn| interaction_ops::log_interaction(conn, user.id, &draft))
                .await?;
            (StatusCode::CREATED, Json(logged)).into_response()
        }
        InteractionBody::Many(drafts) => {
            let logged = state
                .with_conn(move |conn| interaction_ops::log_batch(conn, user.id, &drafts))
                .await?;
            (StatusCode::CREATED, Json(logged)).into_response()
        }
    };
    Ok(response)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Interaction>>,
    ApiJson(draft): ApiJson<InteractionDraft>,
) -> ApiResult<Json<Interaction>> {
    let interaction = state
        .with_conn(move |conn| interaction_ops::update_interaction(conn, user.id, id, &draft))
        .await?;
    Ok(Json(interaction))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Interaction>>,
) -> ApiResult<Json<Value>> {
    state
        .with_conn(move |conn| interaction_ops::delete_interaction(conn, user.id, id))
        .await?;
    Ok(Json(json!({ "success": true })))
}
