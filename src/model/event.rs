use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use super::ids::Id;

/// Something that happened (or will happen) at a place: a conference,
/// a dinner, a meetup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Id<Event>,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub location_name: String,
    pub coordinates: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn create(name: String, date: DateTime<Utc>, location_name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            event_type: None,
            date,
            end_date: None,
            description: None,
            location_name,
            coordinates: None,
            created_at: Utc::now(),
        }
    }

    /// An event counts as upcoming from its start time onwards.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date >= now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>, location_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_type: None,
            date,
            end_date: None,
            description: None,
            location_name: location_name.into(),
            coordinates: None,
        }
    }
}
