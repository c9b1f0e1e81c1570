use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{format_timestamp, parse_id, parse_timestamp};
use crate::error::PrmResult;
use crate::model::{Id, Organization, User};

pub(crate) const ORGANIZATION_COLUMNS: &str = "o.id, o.name, o.website, o.industry, o.created_at";

pub fn insert(conn: &Connection, owner_id: Id<User>, org: &Organization) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO organizations (id, user_id, name, website, industry, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            org.id.value.to_string(),
            owner_id.value.to_string(),
            org.name,
            org.website,
            org.industry,
            format_timestamp(org.created_at),
        ],
    )?;
    Ok(())
}

/// Returns false when no row owned by `owner_id` matched.
pub fn update(conn: &Connection, owner_id: Id<User>, org: &Organization) -> PrmResult<bool> {
    let changed = conn.execute(
        "UPDATE organizations SET name = ?1, website = ?2, industry = ?3
         WHERE id = ?4 AND user_id = ?5",
        params![
            org.name,
            org.website,
            org.industry,
            org.id.value.to_string(),
            owner_id.value.to_string(),
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete(conn: &Connection, owner_id: Id<User>, id: Id<Organization>) -> PrmResult<bool> {
    let changed = conn.execute(
        "DELETE FROM organizations WHERE id = ?1 AND user_id = ?2",
        params![id.value.to_string(), owner_id.value.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn find_by_id(
    conn: &Connection,
    owner_id: Id<User>,
    id: Id<Organization>,
) -> PrmResult<Option<Organization>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM organizations o WHERE o.id = ?1 AND o.user_id = ?2",
        ORGANIZATION_COLUMNS
    ))?;
    let row = stmt
        .query_row(
            params![id.value.to_string(), owner_id.value.to_string()],
            read_columns,
        )
        .optional()?;
    row.map(into_organization).transpose()
}

/// Exact, case-insensitive name lookup.
pub fn find_by_name(
    conn: &Connection,
    owner_id: Id<User>,
    name: &str,
) -> PrmResult<Option<Organization>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM organizations o WHERE o.user_id = ?1 AND o.name = ?2 COLLATE NOCASE",
        ORGANIZATION_COLUMNS
    ))?;
    let row = stmt
        .query_row(params![owner_id.value.to_string(), name], read_columns)
        .optional()?;
    row.map(into_organization).transpose()
}

pub fn find_by_owner(conn: &Connection, owner_id: Id<User>) -> PrmResult<Vec<Organization>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM organizations o WHERE o.user_id = ?1 ORDER BY o.name COLLATE NOCASE",
        ORGANIZATION_COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![owner_id.value.to_string()], read_columns)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(into_organization).collect()
}

pub(crate) type OrganizationRow = (String, String, Option<String>, Option<String>, String);

/// Reads the five organization columns starting at `offset`.
pub(crate) fn read_columns_at(row: &Row, offset: usize) -> rusqlite::Result<OrganizationRow> {
    Ok((
        row.get(offset)?,
        row.get(offset + 1)?,
        row.get(offset + 2)?,
        row.get(offset + 3)?,
        row.get(offset + 4)?,
    ))
}

fn read_columns(row: &Row) -> rusqlite::Result<OrganizationRow> {
    read_columns_at(row, 0)
}

pub(crate) fn into_organization(
    (id, name, website, industry, created_at): OrganizationRow,
) -> PrmResult<Organization> {
    Ok(Organization {
        id: parse_id(&id)?,
        name,
        website,
        industry,
        created_at: parse_timestamp(&created_at)?,
    })
}
