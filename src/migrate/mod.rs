//! Import of the legacy `profiles.json` file: an array of
//! `{id, name, location: [lat, lng], met_at, met_on, notes, tags}`.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;

use crate::error::PrmResult;
use crate::model::*;
use crate::ops::{interaction_ops, person_ops};
use crate::validation;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub people: usize,
    pub interactions: usize,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct LegacyProfile {
    name: String,
    #[serde(default)]
    location: Option<[f64; 2]>,
    #[serde(default)]
    met_at: Option<String>,
    #[serde(default)]
    met_on: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

pub fn import_profiles(conn: &Connection, owner_id: Id<User>, path: &Path) -> PrmResult<ImportStats> {
    let json = std::fs::read_to_string(path)?;
    import_profiles_json(conn, owner_id, &json)
}

/// Entries that fail to parse or validate are skipped and counted.
pub fn import_profiles_json(
    conn: &Connection,
    owner_id: Id<User>,
    json: &str,
) -> PrmResult<ImportStats> {
    let entries: Vec<Value> = serde_json::from_str(json)?;
    let mut stats = ImportStats::default();

    for (index, entry) in entries.into_iter().enumerate() {
        let profile: LegacyProfile = match serde_json::from_value(entry) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable profile");
                stats.skipped += 1;
                continue;
            }
        };

        let coordinates = profile
            .location
            .map(|[lat, lng]| GeoPoint::new(lat, lng))
            .and_then(|p| validation::geo_point(p).ok());

        let mut draft = PersonDraft::named(profile.name.clone());
        draft.coordinates = coordinates;
        draft.notes = merged_notes(profile.notes.as_deref(), &profile.tags);

        let person = match person_ops::add_person(conn, owner_id, &draft) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping invalid profile");
                stats.skipped += 1;
                continue;
            }
        };
        stats.people += 1;

        if let Some(date) = profile.met_on.as_deref().and_then(parse_met_on) {
            let mut met = InteractionDraft::new(person.id, date, DEFAULT_INTERACTION_TYPE);
            met.location_name = profile.met_at.clone();
            met.coordinates = coordinates;
            interaction_ops::log_interaction(conn, owner_id, &met)?;
            stats.interactions += 1;
        }
    }

    tracing::info!(
        people = stats.people,
        interactions = stats.interactions,
        skipped = stats.skipped,
        "profile import finished"
    );
    Ok(stats)
}

/// Tags have no home of their own, so they trail the notes.
fn merged_notes(notes: Option<&str>, tags: &[String]) -> Option<String> {
    let notes = validation::trim_optional(notes);
    let tags = validation::string_list(tags);
    match (notes, tags.is_empty()) {
        (notes, true) => notes,
        (None, false) => Some(format!("Tags: {}", tags.join(", "))),
        (Some(n), false) => Some(format!("{}\n\nTags: {}", n, tags.join(", "))),
    }
}

fn parse_met_on(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
