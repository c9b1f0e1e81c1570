use axum::{extract::State, Extension, Json};
use chrono::Utc;

use super::error::ApiResult;
use super::AppState;
use crate::model::User;
use crate::queries::stats_queries::{self, NetworkStats};

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<NetworkStats>> {
    let stats = state
        .with_conn(move |conn| stats_queries::stats(conn, user.id, Utc::now()))
        .await?;
    Ok(Json(stats))
}
