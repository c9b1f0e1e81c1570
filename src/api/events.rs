use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::{ApiError, ApiResult};
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::AppState;
use crate::error::PrmError;
use crate::model::{Event, EventAttendance, EventDraft, Id, Interaction, User};
use crate::ops::{event_ops, interaction_ops};
use crate::queries::event_queries::{self, EventQuery, EventSummary, TimeFilter};
use crate::queries::interaction_queries;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventParams {
    search: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventDetail {
    event: Event,
    interactions: Vec<Interaction>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiQuery(params): ApiQuery<EventParams>,
) -> ApiResult<Json<Vec<EventSummary>>> {
    let time = match params.time.as_deref() {
        Some(t) => TimeFilter::parse(t)
            .ok_or_else(|| ApiError::bad_request(format!("Unknown time filter: {}", t)))?,
        None => TimeFilter::All,
    };
    let query = EventQuery {
        search: params.search.unwrap_or_default(),
        event_type: params.event_type,
        time,
    };
    let events = state
        .with_conn(move |conn| event_queries::events_view(conn, user.id, &query, Utc::now()))
        .await?;
    Ok(Json(events))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(draft): ApiJson<EventDraft>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let event = state
        .with_conn(move |conn| event_ops::add_event(conn, user.id, &draft))
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Event>>,
) -> ApiResult<Json<EventDetail>> {
    let detail = state
        .with_conn(move |conn| {
            let event = event_queries::get_event(conn, user.id, id)?
                .ok_or_else(|| PrmError::not_found("Event", id))?;
            let interactions = interaction_queries::for_event(conn, user.id, id)?;
            Ok(EventDetail {
                event,
                interactions,
            })
        })
        .await?;
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Event>>,
    ApiJson(draft): ApiJson<EventDraft>,
) -> ApiResult<Json<Event>> {
    let event = state
        .with_conn(move |conn| event_ops::update_event(conn, user.id, id, &draft))
        .await?;
    Ok(Json(event))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Event>>,
) -> ApiResult<Json<Value>> {
    state
        .with_conn(move |conn| event_ops::delete_event(conn, user.id, id))
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// Body is a list of attendees; date and place come from the event.
pub async fn log_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiPath(id): ApiPath<Id<Event>>,
    ApiJson(rows): ApiJson<Vec<EventAttendance>>,
) -> ApiResult<(StatusCode, Json<Vec<Interaction>>)> {
    let logged = state
        .with_conn(move |conn| interaction_ops::log_batch_for_event(conn, user.id, id, &rows))
        .await?;
    Ok((StatusCode::CREATED, Json(logged)))
}
