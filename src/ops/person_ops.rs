use rusqlite::Connection;

use crate::db::{organization_repo, person_repo};
use crate::error::{PrmError, PrmResult};
use crate::model::{Id, OrganizationLink, Person, PersonDraft, User};
use crate::validation::{self, trim_optional};

pub fn add_person(conn: &Connection, owner_id: Id<User>, draft: &PersonDraft) -> PrmResult<Person> {
    let mut person = Person::create(String::new());
    apply_draft(&mut person, draft)?;
    let links = match &draft.organizations {
        Some(links) => owned_links(conn, owner_id, links)?,
        None => Vec::new(),
    };

    let tx = conn.unchecked_transaction()?;
    person_repo::insert(&tx, owner_id, &person)?;
    person_repo::set_organizations(&tx, person.id, &links)?;
    tx.commit()?;

    person.organizations = person_repo::find_memberships(conn, person.id)?;
    tracing::info!(person_id = %person.id, organizations = links.len(), "person added");
    Ok(person)
}

/// Replaces every scalar field. Organization links are only touched when the
/// draft carries a list.
pub fn update_person(
    conn: &Connection,
    owner_id: Id<User>,
    person_id: Id<Person>,
    draft: &PersonDraft,
) -> PrmResult<Person> {
    let mut person = person_repo::find_by_id(conn, owner_id, person_id)?
        .ok_or_else(|| PrmError::not_found("Person", person_id))?;
    apply_draft(&mut person, draft)?;
    let links = match &draft.organizations {
        Some(links) => Some(owned_links(conn, owner_id, links)?),
        None => None,
    };

    let tx = conn.unchecked_transaction()?;
    if !person_repo::update(&tx, owner_id, &person)? {
        return Err(PrmError::not_found("Person", person_id));
    }
    if let Some(links) = &links {
        person_repo::set_organizations(&tx, person.id, links)?;
    }
    tx.commit()?;

    person.organizations = person_repo::find_memberships(conn, person.id)?;
    tracing::info!(person_id = %person.id, "person updated");
    Ok(person)
}

pub fn delete_person(conn: &Connection, owner_id: Id<User>, person_id: Id<Person>) -> PrmResult<()> {
    if !person_repo::delete(conn, owner_id, person_id)? {
        return Err(PrmError::not_found("Person", person_id));
    }
    tracing::info!(person_id = %person_id, "person deleted");
    Ok(())
}

fn apply_draft(person: &mut Person, draft: &PersonDraft) -> PrmResult<()> {
    person.name = validation::non_blank(&draft.name, "name")?;
    person.contact_info = draft.contact_info.normalized();
    person.location_name = trim_optional(draft.location_name.as_deref());
    person.location_address = trim_optional(draft.location_address.as_deref());
    person.coordinates = validation::optional_geo_point(draft.coordinates)?;
    person.notes = trim_optional(draft.notes.as_deref());
    Ok(())
}

/// Every linked organization must belong to the owner. Repeated ids keep
/// the first role given.
fn owned_links(
    conn: &Connection,
    owner_id: Id<User>,
    links: &[OrganizationLink],
) -> PrmResult<Vec<OrganizationLink>> {
    let mut out: Vec<OrganizationLink> = Vec::with_capacity(links.len());
    for link in links {
        if out.iter().any(|l| l.organization_id == link.organization_id) {
            continue;
        }
        organization_repo::find_by_id(conn, owner_id, link.organization_id)?
            .ok_or_else(|| PrmError::not_found("Organization", link.organization_id))?;
        out.push(OrganizationLink {
            organization_id: link.organization_id,
            role: trim_optional(link.role.as_deref()),
        });
    }
    Ok(out)
}
