use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{event_repo, interaction_repo, person_repo};
use crate::error::{PrmError, PrmResult};
use crate::model::{Event, Id, Interaction, Person, User};

/// Just enough of a joined row to label it.
#[derive(Debug, Clone, Serialize)]
pub struct NamedRef<T> {
    pub id: Id<T>,
    pub name: String,
}

/// An interaction with its person and event resolved.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionDetail {
    #[serde(flatten)]
    pub interaction: Interaction,
    pub person: Option<NamedRef<Person>>,
    pub event: Option<NamedRef<Event>>,
}

/// Newest first.
pub fn history(
    conn: &Connection,
    owner_id: Id<User>,
    person_id: Id<Person>,
) -> PrmResult<Vec<Interaction>> {
    person_repo::find_by_id(conn, owner_id, person_id)?
        .ok_or_else(|| PrmError::not_found("Person", person_id))?;
    interaction_repo::find_by_person(conn, person_id)
}

pub fn for_event(
    conn: &Connection,
    owner_id: Id<User>,
    event_id: Id<Event>,
) -> PrmResult<Vec<Interaction>> {
    event_repo::find_by_id(conn, owner_id, event_id)?
        .ok_or_else(|| PrmError::not_found("Event", event_id))?;
    interaction_repo::find_by_event(conn, event_id)
}

pub fn last_interaction(
    conn: &Connection,
    owner_id: Id<User>,
    person_id: Id<Person>,
) -> PrmResult<Option<Interaction>> {
    Ok(history(conn, owner_id, person_id)?.into_iter().next())
}

/// Whole days between `since` and `now`, never negative.
pub fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - since.date_naive()).num_days().max(0)
}

pub fn days_since_last(
    conn: &Connection,
    owner_id: Id<User>,
    person_id: Id<Person>,
    now: DateTime<Utc>,
) -> PrmResult<Option<i64>> {
    Ok(last_interaction(conn, owner_id, person_id)?.map(|i| days_since(i.date, now)))
}

/// Interactions on any day from `from` through `to`, oldest first.
pub fn in_range(
    conn: &Connection,
    owner_id: Id<User>,
    from: NaiveDate,
    to: NaiveDate,
) -> PrmResult<Vec<Interaction>> {
    if to < from {
        return Err(PrmError::InvalidDateRange {
            field: "to".into(),
        });
    }
    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = to
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .map(|dt| dt.and_utc())
        .unwrap_or(start);
    interaction_repo::find_in_range(conn, owner_id, start, end)
}

/// Every interaction the owner has, newest first, person and event joined.
pub fn with_details(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<InteractionDetail>> {
    let interactions = interaction_repo::find_by_owner(conn, owner_id)?;
    let people: HashMap<Id<Person>, String> = person_repo::find_by_owner(conn, owner_id)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let events: HashMap<Id<Event>, String> = event_repo::find_by_owner(conn, owner_id)?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    Ok(interactions
        .into_iter()
        .map(|interaction| {
            let person = people.get(&interaction.person_id).map(|name| NamedRef {
                id: interaction.person_id,
                name: name.clone(),
            });
            let event = interaction.event_id.and_then(|id| {
                events.get(&id).map(|name| NamedRef {
                    id,
                    name: name.clone(),
                })
            });
            InteractionDetail {
                interaction,
                person,
                event,
            }
        })
        .collect())
}
