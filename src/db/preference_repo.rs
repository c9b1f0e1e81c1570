use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::format_timestamp;
use crate::error::PrmResult;
use crate::model::{Id, Preference, User};

/// Every stored preference for the owner, ordered by key.
pub fn find_by_owner(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Preference>> {
    let mut stmt =
        conn.prepare("SELECT key, value FROM user_preferences WHERE user_id = ?1 ORDER BY key")?;
    let rows = stmt
        .query_map(params![owner_id.value.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(key, value)| {
            Ok(Preference {
                key,
                value: serde_json::from_str(&value)?,
            })
        })
        .collect()
}

pub fn find(conn: &Connection, owner_id: Id<User>, key: &str) -> PrmResult<Option<Vec<String>>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM user_preferences WHERE user_id = ?1 AND key = ?2",
            params![owner_id.value.to_string(), key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.map(|v| serde_json::from_str(&v)).transpose()?)
}

/// Insert or replace the value stored under `(owner, key)`.
pub fn upsert(conn: &Connection, owner_id: Id<User>, key: &str, value: &[String]) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO user_preferences (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![
            owner_id.value.to_string(),
            key,
            serde_json::to_string(value)?,
            format_timestamp(Utc::now()),
        ],
    )?;
    Ok(())
}
