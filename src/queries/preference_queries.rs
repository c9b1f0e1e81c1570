use rusqlite::Connection;

use crate::db::preference_repo;
use crate::error::PrmResult;
use crate::model::{Id, Preference, PreferenceKey, Preferences, User};

/// Rows as stored, known or not.
pub fn stored(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Preference>> {
    preference_repo::find_by_owner(conn, owner_id)
}

/// The lists the app offers, falling back to defaults for keys that were
/// never saved or were saved empty.
pub fn resolved(conn: &Connection, owner_id: Id<User>) -> PrmResult<Preferences> {
    let mut prefs = Preferences::default();
    for key in PreferenceKey::ALL {
        if let Some(value) = preference_repo::find(conn, owner_id, key.as_str())? {
            if !value.is_empty() {
                prefs.set(*key, value);
            }
        }
    }
    Ok(prefs)
}
