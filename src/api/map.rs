use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use super::extract::ApiQuery;
use super::AppState;
use crate::model::{GeoPoint, User};
use crate::queries::map_queries::{self, MapItem};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MapParams {
    zoom: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct ClusteredMap {
    center: GeoPoint,
    zoom: u8,
    items: Vec<MapItem>,
}

/// Without `zoom`, a GeoJSON FeatureCollection; with it, clustered items.
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiQuery(params): ApiQuery<MapParams>,
) -> ApiResult<Response> {
    match params.zoom {
        None => {
            let collection = state
                .with_conn(move |conn| map_queries::people_map(conn, user.id))
                .await?;
            Ok(Json(collection).into_response())
        }
        Some(zoom) => {
            let options = state.config.cluster_options();
            let items = state
                .with_conn(move |conn| map_queries::clustered_map(conn, user.id, zoom, &options))
                .await?;
            Ok(Json(ClusteredMap {
                center: state.config.map.default_center,
                zoom,
                items,
            })
            .into_response())
        }
    }
}
