use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::geo::GeoPoint;
use super::ids::Id;
use super::person::Person;

/// The type recorded when the caller does not pick one.
pub const DEFAULT_INTERACTION_TYPE: &str = "met";

/// A single touchpoint with a person, optionally at an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Id<Interaction>,
    pub person_id: Id<Person>,
    pub event_id: Option<Id<Event>>,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub interaction_type: String,
    pub sentiment: Option<String>,
    pub notes: Option<String>,
    pub location_name: Option<String>,
    pub coordinates: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    pub fn create(person_id: Id<Person>, date: DateTime<Utc>, interaction_type: String) -> Self {
        Self {
            id: Id::generate(),
            person_id,
            event_id: None,
            date,
            interaction_type,
            sentiment: None,
            notes: None,
            location_name: None,
            coordinates: None,
            created_at: Utc::now(),
        }
    }
}

fn default_interaction_type() -> String {
    DEFAULT_INTERACTION_TYPE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionDraft {
    pub person_id: Id<Person>,
    #[serde(default)]
    pub event_id: Option<Id<Event>>,
    pub date: DateTime<Utc>,
    #[serde(default = "default_interaction_type", rename = "type")]
    pub interaction_type: String,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}

impl InteractionDraft {
    pub fn new(person_id: Id<Person>, date: DateTime<Utc>, interaction_type: impl Into<String>) -> Self {
        Self {
            person_id,
            event_id: None,
            date,
            interaction_type: interaction_type.into(),
            sentiment: None,
            notes: None,
            location_name: None,
            coordinates: None,
        }
    }
}

/// One row of a batch logged against an event. Date and place come from
/// the event itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAttendance {
    pub person_id: Option<Id<Person>>,
    #[serde(default = "default_interaction_type", rename = "type")]
    pub interaction_type: String,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EventAttendance {
    pub fn new(person_id: Id<Person>) -> Self {
        Self {
            person_id: Some(person_id),
            interaction_type: default_interaction_type(),
            sentiment: None,
            notes: None,
        }
    }
}
