use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{format_timestamp, parse_id, parse_timestamp};
use crate::error::PrmResult;
use crate::model::User;

const USER_COLUMNS: &str = "id, name, email, api_token, created_at";

pub fn insert(conn: &Connection, user: &User) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, api_token, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id.value.to_string(),
            user.name,
            user.email,
            user.api_token,
            format_timestamp(user.created_at),
        ],
    )?;
    Ok(())
}

pub fn find_by_token(conn: &Connection, token: &str) -> PrmResult<Option<User>> {
    find_one(
        conn,
        &format!("SELECT {} FROM users WHERE api_token = ?1", USER_COLUMNS),
        token,
    )
}

/// The earliest user, which the interactive shell treats as "you".
pub fn find_first(conn: &Connection) -> PrmResult<Option<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY created_at LIMIT 1",
        USER_COLUMNS
    ))?;
    let row = stmt.query_row([], read_columns).optional()?;
    row.map(into_user).transpose()
}

pub fn list(conn: &Connection) -> PrmResult<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users ORDER BY created_at",
        USER_COLUMNS
    ))?;
    let rows = stmt
        .query_map([], read_columns)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(into_user).collect()
}

fn find_one(conn: &Connection, sql: &str, key: &str) -> PrmResult<Option<User>> {
    let mut stmt = conn.prepare(sql)?;
    let row = stmt.query_row(params![key], read_columns).optional()?;
    row.map(into_user).transpose()
}

type UserRow = (String, String, String, String, String);

fn read_columns(row: &Row) -> rusqlite::Result<UserRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_user((id, name, email, api_token, created_at): UserRow) -> PrmResult<User> {
    Ok(User {
        id: parse_id(&id)?,
        name,
        email,
        api_token,
        created_at: parse_timestamp(&created_at)?,
    })
}
