use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;

/// A company, school, club, or any other group people belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Id<Organization>,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            website: None,
            industry: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationDraft {
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
}

impl OrganizationDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
