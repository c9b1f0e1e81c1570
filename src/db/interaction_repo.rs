use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{
    format_timestamp, parse_id, parse_optional_id, parse_timestamp, point_from_columns,
};
use crate::error::PrmResult;
use crate::model::{Event, Id, Interaction, Person, User};

const INTERACTION_COLUMNS: &str = "id, person_id, event_id, date, type, sentiment, notes,
    location_name, location_lat, location_lng, created_at";

pub fn insert(conn: &Connection, owner_id: Id<User>, interaction: &Interaction) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO interactions (id, user_id, person_id, event_id, date, type, sentiment, notes,
         location_name, location_lat, location_lng, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            interaction.id.value.to_string(),
            owner_id.value.to_string(),
            interaction.person_id.value.to_string(),
            interaction.event_id.map(|id| id.value.to_string()),
            format_timestamp(interaction.date),
            interaction.interaction_type,
            interaction.sentiment,
            interaction.notes,
            interaction.location_name,
            interaction.coordinates.map(|p| p.lat),
            interaction.coordinates.map(|p| p.lng),
            format_timestamp(interaction.created_at),
        ],
    )?;
    Ok(())
}

/// Returns false when no row owned by `owner_id` matched.
pub fn update(conn: &Connection, owner_id: Id<User>, interaction: &Interaction) -> PrmResult<bool> {
    let changed = conn.execute(
        "UPDATE interactions SET person_id = ?1, event_id = ?2, date = ?3, type = ?4,
         sentiment = ?5, notes = ?6, location_name = ?7, location_lat = ?8, location_lng = ?9
         WHERE id = ?10 AND user_id = ?11",
        params![
            interaction.person_id.value.to_string(),
            interaction.event_id.map(|id| id.value.to_string()),
            format_timestamp(interaction.date),
            interaction.interaction_type,
            interaction.sentiment,
            interaction.notes,
            interaction.location_name,
            interaction.coordinates.map(|p| p.lat),
            interaction.coordinates.map(|p| p.lng),
            interaction.id.value.to_string(),
            owner_id.value.to_string(),
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete(conn: &Connection, owner_id: Id<User>, id: Id<Interaction>) -> PrmResult<bool> {
    let changed = conn.execute(
        "DELETE FROM interactions WHERE id = ?1 AND user_id = ?2",
        params![id.value.to_string(), owner_id.value.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn find_by_id(
    conn: &Connection,
    owner_id: Id<User>,
    id: Id<Interaction>,
) -> PrmResult<Option<Interaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM interactions WHERE id = ?1 AND user_id = ?2",
        INTERACTION_COLUMNS
    ))?;
    let row = stmt
        .query_row(
            params![id.value.to_string(), owner_id.value.to_string()],
            read_columns,
        )
        .optional()?;
    row.map(into_interaction).transpose()
}

/// Newest first.
pub fn find_by_owner(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Interaction>> {
    query_list(
        conn,
        &format!(
            "SELECT {} FROM interactions WHERE user_id = ?1 ORDER BY date DESC, created_at DESC",
            INTERACTION_COLUMNS
        ),
        &owner_id.value.to_string(),
    )
}

/// Newest first.
pub fn find_by_person(conn: &Connection, person_id: Id<Person>) -> PrmResult<Vec<Interaction>> {
    query_list(
        conn,
        &format!(
            "SELECT {} FROM interactions WHERE person_id = ?1 ORDER BY date DESC, created_at DESC",
            INTERACTION_COLUMNS
        ),
        &person_id.value.to_string(),
    )
}

pub fn find_by_event(conn: &Connection, event_id: Id<Event>) -> PrmResult<Vec<Interaction>> {
    query_list(
        conn,
        &format!(
            "SELECT {} FROM interactions WHERE event_id = ?1 ORDER BY date DESC, created_at DESC",
            INTERACTION_COLUMNS
        ),
        &event_id.value.to_string(),
    )
}

/// Interactions dated within `[from, to]`, oldest first.
pub fn find_in_range(
    conn: &Connection,
    owner_id: Id<User>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> PrmResult<Vec<Interaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM interactions WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
         ORDER BY date ASC, created_at ASC",
        INTERACTION_COLUMNS
    ))?;
    let rows = stmt
        .query_map(
            params![
                owner_id.value.to_string(),
                format_timestamp(from),
                format_timestamp(to),
            ],
            read_columns,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(into_interaction).collect()
}

pub fn count_by_owner(conn: &Connection, owner_id: Id<User>) -> PrmResult<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM interactions WHERE user_id = ?1",
        params![owner_id.value.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn query_list(conn: &Connection, sql: &str, key: &str) -> PrmResult<Vec<Interaction>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![key], read_columns)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(into_interaction).collect()
}

type InteractionRow = (
    String,
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<f64>,
    String,
);

fn read_columns(row: &Row) -> rusqlite::Result<InteractionRow> {
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
        row.get(10)?,
    ))
}

fn into_interaction(
    (
        id,
        person_id,
        event_id,
        date,
        interaction_type,
        sentiment,
        notes,
        location_name,
        lat,
        lng,
        created_at,
    ): InteractionRow,
) -> PrmResult<Interaction> {
    Ok(Interaction {
        id: parse_id(&id)?,
        person_id: parse_id(&person_id)?,
        event_id: parse_optional_id(event_id)?,
        date: parse_timestamp(&date)?,
        interaction_type,
        sentiment,
        notes,
        location_name,
        coordinates: point_from_columns(lat, lng),
        created_at: parse_timestamp(&created_at)?,
    })
}
