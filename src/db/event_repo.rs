use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{format_timestamp, parse_id, parse_timestamp, point_from_columns};
use crate::error::PrmResult;
use crate::model::{Event, Id, User};

const EVENT_COLUMNS: &str =
    "id, name, type, date, end_date, description, location_name, location_lat, location_lng, created_at";

pub fn insert(conn: &Connection, owner_id: Id<User>, event: &Event) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO events (id, user_id, name, type, date, end_date, description,
         location_name, location_lat, location_lng, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            event.id.value.to_string(),
            owner_id.value.to_string(),
            event.name,
            event.event_type,
            format_timestamp(event.date),
            event.end_date.map(format_timestamp),
            event.description,
            event.location_name,
            event.coordinates.map(|p| p.lat),
            event.coordinates.map(|p| p.lng),
            format_timestamp(event.created_at),
        ],
    )?;
    Ok(())
}

/// Returns false when no row owned by `owner_id` matched.
pub fn update(conn: &Connection, owner_id: Id<User>, event: &Event) -> PrmResult<bool> {
    let changed = conn.execute(
        "UPDATE events SET name = ?1, type = ?2, date = ?3, end_date = ?4, description = ?5,
         location_name = ?6, location_lat = ?7, location_lng = ?8
         WHERE id = ?9 AND user_id = ?10",
        params![
            event.name,
            event.event_type,
            format_timestamp(event.date),
            event.end_date.map(format_timestamp),
            event.description,
            event.location_name,
            event.coordinates.map(|p| p.lat),
            event.coordinates.map(|p| p.lng),
            event.id.value.to_string(),
            owner_id.value.to_string(),
        ],
    )?;
    Ok(changed > 0)
}

/// Interactions logged at the event survive with their event link cleared.
pub fn delete(conn: &Connection, owner_id: Id<User>, id: Id<Event>) -> PrmResult<bool> {
    let changed = conn.execute(
        "DELETE FROM events WHERE id = ?1 AND user_id = ?2",
        params![id.value.to_string(), owner_id.value.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn find_by_id(conn: &Connection, owner_id: Id<User>, id: Id<Event>) -> PrmResult<Option<Event>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM events WHERE id = ?1 AND user_id = ?2",
        EVENT_COLUMNS
    ))?;
    let row = stmt
        .query_row(
            params![id.value.to_string(), owner_id.value.to_string()],
            read_columns,
        )
        .optional()?;
    row.map(into_event).transpose()
}

/// All of the owner's events, most recent date first.
pub fn find_by_owner(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Event>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM events WHERE user_id = ?1 ORDER BY date DESC",
        EVENT_COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![owner_id.value.to_string()], read_columns)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(into_event).collect()
}

type EventRow = (
    String,
    String,
    Option<String>,
    String,
    Option<String>,
    Option<String>,
    String,
    Option<f64>,
    Option<f64>,
    String,
);

fn read_columns(row: &Row) -> rusqlite::Result<EventRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn into_event(
    (id, name, event_type, date, end_date, description, location_name, lat, lng, created_at): EventRow,
) -> PrmResult<Event> {
    Ok(Event {
        id: parse_id(&id)?,
        name,
        event_type,
        date: parse_timestamp(&date)?,
        end_date: end_date.as_deref().map(parse_timestamp).transpose()?,
        description,
        location_name,
        coordinates: point_from_columns(lat, lng),
        created_at: parse_timestamp(&created_at)?,
    })
}
