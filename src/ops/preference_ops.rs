use rusqlite::Connection;

use crate::db::preference_repo;
use crate::error::PrmResult;
use crate::model::{Id, Preference, User};
use crate::validation;

/// Stores `values` under `key`, trimmed and de-duplicated.
pub fn set_preference(
    conn: &Connection,
    owner_id: Id<User>,
    key: &str,
    values: &[String],
) -> PrmResult<Preference> {
    let key = validation::non_blank(key, "key")?;
    let value = validation::string_list(values);
    preference_repo::upsert(conn, owner_id, &key, &value)?;
    tracing::debug!(key = %key, entries = value.len(), "preference saved");
    Ok(Preference { key, value })
}
