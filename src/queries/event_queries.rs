use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{event_repo, interaction_repo};
use crate::error::PrmResult;
use crate::model::{Event, Id, Interaction, User};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    All,
    Upcoming,
    Past,
}

impl TimeFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Some(TimeFilter::All),
            "upcoming" => Some(TimeFilter::Upcoming),
            "past" => Some(TimeFilter::Past),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub search: String,
    pub event_type: Option<String>,
    pub time: TimeFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub interaction_count: usize,
    pub upcoming: bool,
}

pub fn matches_search(event: &Event, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        Some(event.name.as_str()),
        Some(event.location_name.as_str()),
        event.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Applies the query and orders the result: upcoming events soonest first,
/// then past events most recent first.
pub fn filter_events(events: Vec<Event>, query: &EventQuery, now: DateTime<Utc>) -> Vec<Event> {
    let wanted_type = query
        .event_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"));

    let (mut upcoming, mut past): (Vec<Event>, Vec<Event>) = events
        .into_iter()
        .filter(|event| matches_search(event, &query.search))
        .filter(|event| match wanted_type {
            Some(t) => event
                .event_type
                .as_deref()
                .is_some_and(|et| et.eq_ignore_ascii_case(t)),
            None => true,
        })
        .filter(|event| match query.time {
            TimeFilter::All => true,
            TimeFilter::Upcoming => event.is_upcoming(now),
            TimeFilter::Past => !event.is_upcoming(now),
        })
        .partition(|event| event.is_upcoming(now));

    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    past.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    upcoming.extend(past);
    upcoming
}

/// Distinct non-empty types in first-seen order.
pub fn event_types(events: &[Event]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for t in events.iter().filter_map(|e| e.event_type.as_deref()) {
        let t = t.trim();
        if !t.is_empty() && !types.iter().any(|seen| seen == t) {
            types.push(t.to_string());
        }
    }
    types
}

pub fn interaction_counts(interactions: &[Interaction]) -> HashMap<Id<Event>, usize> {
    let mut counts = HashMap::new();
    for event_id in interactions.iter().filter_map(|i| i.event_id) {
        *counts.entry(event_id).or_insert(0) += 1;
    }
    counts
}

pub fn events_view(
    conn: &Connection,
    owner_id: Id<User>,
    query: &EventQuery,
    now: DateTime<Utc>,
) -> PrmResult<Vec<EventSummary>> {
    let events = event_repo::find_by_owner(conn, owner_id)?;
    let interactions = interaction_repo::find_by_owner(conn, owner_id)?;
    let counts = interaction_counts(&interactions);

    Ok(filter_events(events, query, now)
        .into_iter()
        .map(|event| EventSummary {
            interaction_count: counts.get(&event.id).copied().unwrap_or(0),
            upcoming: event.is_upcoming(now),
            event,
        })
        .collect())
}

pub fn get_event(
    conn: &Connection,
    owner_id: Id<User>,
    event_id: Id<Event>,
) -> PrmResult<Option<Event>> {
    event_repo::find_by_id(conn, owner_id, event_id)
}

pub fn all_events(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Event>> {
    event_repo::find_by_owner(conn, owner_id)
}
