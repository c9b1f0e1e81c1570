use rusqlite::Connection;

use crate::db::user_repo;
use crate::error::PrmResult;
use crate::model::User;
use crate::validation;

/// Creates a user with a freshly generated api token.
pub fn create_user(conn: &Connection, name: &str, email: &str) -> PrmResult<User> {
    let valid_name = validation::non_blank(name, "name")?;
    let user = User::create(valid_name, email.trim().to_string());
    user_repo::insert(conn, &user)?;
    tracing::info!(user_id = %user.id, "user created");
    Ok(user)
}
