use rusqlite::Connection;

use crate::db::organization_repo;
use crate::error::{PrmError, PrmResult};
use crate::model::{Id, Organization, OrganizationDraft, User};
use crate::validation::{self, trim_optional};

pub fn add_organization(
    conn: &Connection,
    owner_id: Id<User>,
    draft: &OrganizationDraft,
) -> PrmResult<Organization> {
    let name = validation::non_blank(&draft.name, "name")?;
    ensure_name_free(conn, owner_id, &name, None)?;

    let mut org = Organization::create(name);
    org.website = trim_optional(draft.website.as_deref());
    org.industry = trim_optional(draft.industry.as_deref());

    organization_repo::insert(conn, owner_id, &org)?;
    tracing::info!(organization_id = %org.id, "organization added");
    Ok(org)
}

pub fn update_organization(
    conn: &Connection,
    owner_id: Id<User>,
    organization_id: Id<Organization>,
    draft: &OrganizationDraft,
) -> PrmResult<Organization> {
    let mut org = organization_repo::find_by_id(conn, owner_id, organization_id)?
        .ok_or_else(|| PrmError::not_found("Organization", organization_id))?;

    let name = validation::non_blank(&draft.name, "name")?;
    ensure_name_free(conn, owner_id, &name, Some(organization_id))?;

    org.name = name;
    org.website = trim_optional(draft.website.as_deref());
    org.industry = trim_optional(draft.industry.as_deref());

    organization_repo::update(conn, owner_id, &org)?;
    tracing::info!(organization_id = %org.id, "organization updated");
    Ok(org)
}

/// Memberships pointing at the organization are removed with it.
pub fn delete_organization(
    conn: &Connection,
    owner_id: Id<User>,
    organization_id: Id<Organization>,
) -> PrmResult<()> {
    if !organization_repo::delete(conn, owner_id, organization_id)? {
        return Err(PrmError::not_found("Organization", organization_id));
    }
    tracing::info!(organization_id = %organization_id, "organization deleted");
    Ok(())
}

fn ensure_name_free(
    conn: &Connection,
    owner_id: Id<User>,
    name: &str,
    except: Option<Id<Organization>>,
) -> PrmResult<()> {
    match organization_repo::find_by_name(conn, owner_id, name)? {
        Some(existing) if Some(existing.id) != except => Err(PrmError::AlreadyExists {
            entity_type: "Organization".into(),
            identifier: existing.name,
        }),
        _ => Ok(()),
    }
}
