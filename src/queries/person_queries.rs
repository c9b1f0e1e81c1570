use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{interaction_repo, person_repo};
use crate::error::PrmResult;
use crate::model::{Id, Interaction, Organization, Person, User};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    CreatedAt,
    LastInteraction,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "name" => Some(SortField::Name),
            "created_at" | "created" => Some(SortField::CreatedAt),
            "last_interaction" | "last" => Some(SortField::LastInteraction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Clicking the active column flips its direction; any other column
    /// starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }
}

/// Filters and ordering for the people table and map.
#[derive(Debug, Clone, Default)]
pub struct PeopleQuery {
    pub search: String,
    pub organization_ids: Vec<Id<Organization>>,
    pub last_interaction_from: Option<NaiveDate>,
    pub last_interaction_to: Option<NaiveDate>,
    pub sort: SortState,
}

impl PeopleQuery {
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.organization_ids.is_empty()
            || self.has_date_bounds()
    }

    fn has_date_bounds(&self) -> bool {
        self.last_interaction_from.is_some() || self.last_interaction_to.is_some()
    }
}

pub fn has_active_filters(query: &PeopleQuery) -> bool {
    query.has_active_filters()
}

/// A person with the date of their most recent interaction.
#[derive(Debug, Clone, Serialize)]
pub struct PersonSummary {
    #[serde(flatten)]
    pub person: Person,
    pub last_interaction: Option<DateTime<Utc>>,
}

/// Latest interaction per person. Equal dates resolve to the one recorded last.
pub fn last_interactions(interactions: &[Interaction]) -> HashMap<Id<Person>, &Interaction> {
    let mut latest: HashMap<Id<Person>, &Interaction> = HashMap::new();
    for interaction in interactions {
        latest
            .entry(interaction.person_id)
            .and_modify(|current| {
                if (interaction.date, interaction.created_at) > (current.date, current.created_at) {
                    *current = interaction;
                }
            })
            .or_insert(interaction);
    }
    latest
}

/// Case-insensitive substring match over name, notes, email, phone and linkedin.
pub fn matches_search(person: &Person, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let contact = &person.contact_info;
    [
        Some(person.name.as_str()),
        person.notes.as_deref(),
        contact.email.as_deref(),
        contact.phone.as_deref(),
        contact.linkedin.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_and_sort(
    people: Vec<Person>,
    interactions: &[Interaction],
    query: &PeopleQuery,
) -> Vec<PersonSummary> {
    let latest = last_interactions(interactions);
    let selected: HashSet<Id<Organization>> = query.organization_ids.iter().copied().collect();

    let mut rows: Vec<PersonSummary> = people
        .into_iter()
        .filter(|person| matches_search(person, &query.search))
        .filter(|person| {
            selected.is_empty()
                || person
                    .organizations
                    .iter()
                    .any(|m| selected.contains(&m.organization.id))
        })
        .map(|person| {
            let last_interaction = latest.get(&person.id).map(|i| i.date);
            PersonSummary {
                person,
                last_interaction,
            }
        })
        .filter(|row| within_bounds(row.last_interaction, query))
        .collect();

    rows.sort_by(|a, b| compare(a, b, query.sort));
    rows
}

fn within_bounds(last: Option<DateTime<Utc>>, query: &PeopleQuery) -> bool {
    if !query.has_date_bounds() {
        return true;
    }
    let Some(last) = last else {
        return false;
    };
    let day = last.date_naive();
    query.last_interaction_from.map_or(true, |from| day >= from)
        && query.last_interaction_to.map_or(true, |to| day <= to)
}

fn compare(a: &PersonSummary, b: &PersonSummary, sort: SortState) -> Ordering {
    let primary = match sort.field {
        SortField::Name => a.person.name.to_lowercase().cmp(&b.person.name.to_lowercase()),
        SortField::CreatedAt => a.person.created_at.cmp(&b.person.created_at),
        // None orders before Some, so the never-contacted come first ascending.
        SortField::LastInteraction => a.last_interaction.cmp(&b.last_interaction),
    };
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary
        .then_with(|| a.person.name.to_lowercase().cmp(&b.person.name.to_lowercase()))
        .then_with(|| a.person.id.cmp(&b.person.id))
}

pub fn people_view(
    conn: &Connection,
    owner_id: Id<User>,
    query: &PeopleQuery,
) -> PrmResult<Vec<PersonSummary>> {
    let people = person_repo::find_by_owner(conn, owner_id)?;
    let interactions = interaction_repo::find_by_owner(conn, owner_id)?;
    Ok(filter_and_sort(people, &interactions, query))
}

pub fn all_people(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Person>> {
    person_repo::find_by_owner(conn, owner_id)
}

pub fn find_by_name(conn: &Connection, owner_id: Id<User>, query: &str) -> PrmResult<Vec<Person>> {
    person_repo::find_by_name(conn, owner_id, query)
}

pub fn get_person(
    conn: &Connection,
    owner_id: Id<User>,
    person_id: Id<Person>,
) -> PrmResult<Option<Person>> {
    person_repo::find_by_id(conn, owner_id, person_id)
}
