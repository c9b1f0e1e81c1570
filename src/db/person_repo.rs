use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::organization_repo::{self, ORGANIZATION_COLUMNS};
use crate::db::{format_timestamp, parse_id, parse_timestamp, point_from_columns};
use crate::error::PrmResult;
use crate::model::{ContactInfo, Id, Membership, OrganizationLink, Person, User};

const PERSON_COLUMNS: &str = "id, name, contact_info, location_name, location_address,
    current_location_lat, current_location_lng, notes, created_at";

pub fn insert(conn: &Connection, owner_id: Id<User>, person: &Person) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO people (id, user_id, name, contact_info, location_name, location_address,
         current_location_lat, current_location_lng, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            person.id.value.to_string(),
            owner_id.value.to_string(),
            person.name,
            serde_json::to_string(&person.contact_info)?,
            person.location_name,
            person.location_address,
            person.coordinates.map(|p| p.lat),
            person.coordinates.map(|p| p.lng),
            person.notes,
            format_timestamp(person.created_at),
        ],
    )?;
    Ok(())
}

/// Returns false when no row owned by `owner_id` matched.
pub fn update(conn: &Connection, owner_id: Id<User>, person: &Person) -> PrmResult<bool> {
    let changed = conn.execute(
        "UPDATE people SET name = ?1, contact_info = ?2, location_name = ?3, location_address = ?4,
         current_location_lat = ?5, current_location_lng = ?6, notes = ?7, updated_at = datetime('now')
         WHERE id = ?8 AND user_id = ?9",
        params![
            person.name,
            serde_json::to_string(&person.contact_info)?,
            person.location_name,
            person.location_address,
            person.coordinates.map(|p| p.lat),
            person.coordinates.map(|p| p.lng),
            person.notes,
            person.id.value.to_string(),
            owner_id.value.to_string(),
        ],
    )?;
    Ok(changed > 0)
}

/// Deletes the person; memberships and interactions go with it.
pub fn delete(conn: &Connection, owner_id: Id<User>, id: Id<Person>) -> PrmResult<bool> {
    let changed = conn.execute(
        "DELETE FROM people WHERE id = ?1 AND user_id = ?2",
        params![id.value.to_string(), owner_id.value.to_string()],
    )?;
    Ok(changed > 0)
}

/// Replaces every organization link of a person.
pub fn set_organizations(
    conn: &Connection,
    person_id: Id<Person>,
    links: &[OrganizationLink],
) -> PrmResult<()> {
    conn.execute(
        "DELETE FROM people_organizations WHERE person_id = ?1",
        params![person_id.value.to_string()],
    )?;

    for link in links {
        conn.execute(
            "INSERT OR REPLACE INTO people_organizations (person_id, organization_id, role)
             VALUES (?1, ?2, ?3)",
            params![
                person_id.value.to_string(),
                link.organization_id.value.to_string(),
                link.role,
            ],
        )?;
    }

    Ok(())
}

pub fn find_by_id(
    conn: &Connection,
    owner_id: Id<User>,
    id: Id<Person>,
) -> PrmResult<Option<Person>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM people WHERE id = ?1 AND user_id = ?2",
        PERSON_COLUMNS
    ))?;

    let row = stmt
        .query_row(
            params![id.value.to_string(), owner_id.value.to_string()],
            read_columns,
        )
        .optional()?;

    match row {
        Some(row) => {
            let mut person = into_person(row)?;
            person.organizations = find_memberships(conn, person.id)?;
            Ok(Some(person))
        }
        None => Ok(None),
    }
}

/// Every person the owner has, newest first, memberships included.
pub fn find_by_owner(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Person>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM people WHERE user_id = ?1 ORDER BY created_at DESC",
        PERSON_COLUMNS
    ))?;

    let rows = stmt
        .query_map(params![owner_id.value.to_string()], read_columns)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut memberships = memberships_by_owner(conn, owner_id)?;
    rows.into_iter()
        .map(|row| {
            let mut person = into_person(row)?;
            person.organizations = memberships.remove(&person.id).unwrap_or_default();
            Ok(person)
        })
        .collect()
}

/// Case-insensitive name substring match, ordered by name.
pub fn find_by_name(conn: &Connection, owner_id: Id<User>, query: &str) -> PrmResult<Vec<Person>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM people WHERE user_id = ?1 AND instr(LOWER(name), ?2) > 0
         ORDER BY name COLLATE NOCASE",
        PERSON_COLUMNS
    ))?;

    let rows = stmt
        .query_map(
            params![owner_id.value.to_string(), query.trim().to_lowercase()],
            read_columns,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|row| {
            let mut person = into_person(row)?;
            person.organizations = find_memberships(conn, person.id)?;
            Ok(person)
        })
        .collect()
}

pub fn find_memberships(conn: &Connection, person_id: Id<Person>) -> PrmResult<Vec<Membership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT po.role, {} FROM people_organizations po
         JOIN organizations o ON o.id = po.organization_id
         WHERE po.person_id = ?1
         ORDER BY o.name COLLATE NOCASE",
        ORGANIZATION_COLUMNS
    ))?;

    let rows = stmt
        .query_map(params![person_id.value.to_string()], |row| {
            let role: Option<String> = row.get(0)?;
            Ok((role, organization_repo::read_columns_at(row, 1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(role, org)| {
            Ok(Membership {
                organization: organization_repo::into_organization(org)?,
                role,
            })
        })
        .collect()
}

fn memberships_by_owner(
    conn: &Connection,
    owner_id: Id<User>,
) -> PrmResult<HashMap<Id<Person>, Vec<Membership>>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT po.person_id, po.role, {} FROM people_organizations po
         JOIN organizations o ON o.id = po.organization_id
         JOIN people p ON p.id = po.person_id
         WHERE p.user_id = ?1
         ORDER BY o.name COLLATE NOCASE",
        ORGANIZATION_COLUMNS
    ))?;

    let rows = stmt
        .query_map(params![owner_id.value.to_string()], |row| {
            let person_id: String = row.get(0)?;
            let role: Option<String> = row.get(1)?;
            Ok((person_id, role, organization_repo::read_columns_at(row, 2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut grouped: HashMap<Id<Person>, Vec<Membership>> = HashMap::new();
    for (person_id, role, org) in rows {
        grouped
            .entry(parse_id(&person_id)?)
            .or_default()
            .push(Membership {
                organization: organization_repo::into_organization(org)?,
                role,
            });
    }
    Ok(grouped)
}

type PersonRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<f64>,
    Option<String>,
    String,
);

fn read_columns(row: &rusqlite::Row) -> rusqlite::Result<PersonRow> {
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
    ))
}

fn into_person(
    (id, name, contact_json, location_name, location_address, lat, lng, notes, created_at): PersonRow,
) -> PrmResult<Person> {
    let contact_info: ContactInfo = serde_json::from_str(&contact_json)?;
    Ok(Person {
        id: parse_id(&id)?,
        name,
        contact_info,
        location_name,
        location_address,
        coordinates: point_from_columns(lat, lng),
        notes,
        created_at: parse_timestamp(&created_at)?,
        organizations: Vec::new(),
    })
}
