use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{event_repo, interaction_repo, organization_repo, person_repo};
use crate::error::PrmResult;
use crate::model::{Id, Person, User};
use crate::queries::interaction_queries::days_since;
use crate::queries::person_queries::last_interactions;

#[derive(Debug, Clone, Serialize)]
pub struct ContactGap {
    pub person_id: Id<Person>,
    pub name: String,
    pub days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkStats {
    pub total_people: usize,
    pub total_organizations: usize,
    pub total_events: usize,
    pub upcoming_events: usize,
    pub past_events: usize,
    pub total_interactions: i64,
    /// People with no recorded interactions.
    pub never_contacted: usize,
    /// People the map cannot place.
    pub without_location: usize,
    /// The person with the longest gap since last contact.
    pub longest_gap: Option<ContactGap>,
}

pub fn stats(conn: &Connection, owner_id: Id<User>, now: DateTime<Utc>) -> PrmResult<NetworkStats> {
    let people = person_repo::find_by_owner(conn, owner_id)?;
    let organizations = organization_repo::find_by_owner(conn, owner_id)?;
    let events = event_repo::find_by_owner(conn, owner_id)?;
    let interactions = interaction_repo::find_by_owner(conn, owner_id)?;
    let upcoming_events = events.iter().filter(|e| e.is_upcoming(now)).count();

    let latest = last_interactions(&interactions);
    let mut never_contacted = 0usize;
    let mut longest_gap: Option<ContactGap> = None;

    for person in &people {
        match latest.get(&person.id) {
            None => never_contacted += 1,
            Some(last) => {
                let days = days_since(last.date, now);
                if longest_gap.as_ref().map_or(true, |g| days > g.days) {
                    longest_gap = Some(ContactGap {
                        person_id: person.id,
                        name: person.name.clone(),
                        days,
                    });
                }
            }
        }
    }

    Ok(NetworkStats {
        total_people: people.len(),
        total_organizations: organizations.len(),
        total_events: events.len(),
        upcoming_events,
        past_events: events.len() - upcoming_events,
        total_interactions: interaction_repo::count_by_owner(conn, owner_id)?,
        never_contacted,
        without_location: people.iter().filter(|p| p.coordinates.is_none()).count(),
        longest_gap,
    })
}
