use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use super::ids::Id;
use super::organization::Organization;
use crate::validation::trim_optional;

/// Handles for reaching a person. Well-known channels get their own field;
/// anything else lands in `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl ContactInfo {
    /// Trims every handle and drops the blank ones.
    pub fn normalized(&self) -> Self {
        Self {
            phone: trim_optional(self.phone.as_deref()),
            email: trim_optional(self.email.as_deref()),
            linkedin: trim_optional(self.linkedin.as_deref()),
            instagram: trim_optional(self.instagram.as_deref()),
            twitter: trim_optional(self.twitter.as_deref()),
            other: self
                .other
                .iter()
                .filter_map(|(k, v)| {
                    let key = k.trim();
                    let value = v.trim();
                    (!key.is_empty() && !value.is_empty())
                        .then(|| (key.to_string(), value.to_string()))
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.email.is_none()
            && self.linkedin.is_none()
            && self.instagram.is_none()
            && self.twitter.is_none()
            && self.other.is_empty()
    }
}

/// An organization a person belongs to, with their role there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    #[serde(flatten)]
    pub organization: Organization,
    pub role: Option<String>,
}

/// A requested link from a person to one of the owner's organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationLink {
    pub organization_id: Id<Organization>,
    #[serde(default)]
    pub role: Option<String>,
}

impl OrganizationLink {
    pub fn new(organization_id: Id<Organization>) -> Self {
        Self {
            organization_id,
            role: None,
        }
    }
}

/// Someone in your network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Id<Person>,
    pub name: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub coordinates: Option<GeoPoint>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub organizations: Vec<Membership>,
}

impl Person {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            contact_info: ContactInfo::default(),
            location_name: None,
            location_address: None,
            coordinates: None,
            notes: None,
            created_at: Utc::now(),
            organizations: Vec::new(),
        }
    }

    pub fn belongs_to(&self, organization_id: Id<Organization>) -> bool {
        self.organizations
            .iter()
            .any(|m| m.organization.id == organization_id)
    }
}

/// Caller input for creating or replacing a person.
///
/// `organizations: None` leaves existing links alone on update;
/// `Some(vec![])` clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonDraft {
    pub name: String,
    pub contact_info: ContactInfo,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub coordinates: Option<GeoPoint>,
    pub notes: Option<String>,
    pub organizations: Option<Vec<OrganizationLink>>,
}

impl PersonDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Draft carrying the current values of `person`, links included.
    pub fn from_person(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            contact_info: person.contact_info.clone(),
            location_name: person.location_name.clone(),
            location_address: person.location_address.clone(),
            coordinates: person.coordinates,
            notes: person.notes.clone(),
            organizations: Some(
                person
                    .organizations
                    .iter()
                    .map(|m| OrganizationLink {
                        organization_id: m.organization.id,
                        role: m.role.clone(),
                    })
                    .collect(),
            ),
        }
    }
}
