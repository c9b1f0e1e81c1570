use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;

/// The owner of a network. Every other record hangs off a user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id<User>,
    pub name: String,
    pub email: String,
    /// Opaque bearer token presented to the HTTP api.
    #[serde(skip_serializing, default)]
    pub api_token: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn create(name: String, email: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            email,
            api_token: Self::generate_token(),
            created_at: Utc::now(),
        }
    }

    /// Two v4 uuids rendered as 64 hex characters.
    pub fn generate_token() -> String {
        format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        )
    }
}
