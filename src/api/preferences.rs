use axum::{extract::State, Extension, Json};

use super::error::ApiResult;
use super::extract::ApiJson;
use super::AppState;
use crate::model::{Preference, Preferences, User};
use crate::ops::preference_ops;
use crate::queries::preference_queries;

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Vec<Preference>>> {
    let prefs = state
        .with_conn(move |conn| preference_queries::stored(conn, user.id))
        .await?;
    Ok(Json(prefs))
}

pub async fn resolved(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<Preferences>> {
    let prefs = state
        .with_conn(move |conn| preference_queries::resolved(conn, user.id))
        .await?;
    Ok(Json(prefs))
}

pub async fn upsert(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(pref): ApiJson<Preference>,
) -> ApiResult<Json<Preference>> {
    let saved = state
        .with_conn(move |conn| preference_ops::set_preference(conn, user.id, &pref.key, &pref.value))
        .await?;
    Ok(Json(saved))
}
