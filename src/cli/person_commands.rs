use chrono::NaiveDate;

use crate::cli::context::CLIContext;
use crate::model::*;
use crate::ops::*;
use crate::queries::person_queries::{PeopleQuery, SortDirection, SortField, SortState};
use crate::queries::*;

/// Tokens accepted after `people`: `org:<name>`, `from:<date>`, `to:<date>`,
/// `sort:<name|created|last>`, `desc`; everything else is search text.
#[derive(Debug, Default, PartialEq)]
pub struct ListArgs {
    pub search: String,
    pub organizations: Vec<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortState,
}

pub fn parse_list_args(args: &str) -> Result<ListArgs, String> {
    let mut parsed = ListArgs::default();
    let mut words = Vec::new();
    for token in args.split_whitespace() {
        match token.split_once(':') {
            Some(("org", name)) => parsed.organizations.push(name.replace('_', " ")),
            Some(("from", date)) => parsed.from = Some(parse_day(date)?),
            Some(("to", date)) => parsed.to = Some(parse_day(date)?),
            Some(("sort", field)) => {
                let field =
                    SortField::parse(field).ok_or_else(|| format!("Unknown sort field: {}", field))?;
                parsed.sort = SortState::new(field, parsed.sort.direction);
            }
            _ if token.eq_ignore_ascii_case("desc") => parsed.sort.direction = SortDirection::Desc,
            _ => words.push(token),
        }
    }
    parsed.search = words.join(" ");
    Ok(parsed)
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("Invalid date: {}", s))
}

pub fn list(ctx: &CLIContext, args: &str) {
    let parsed = match parse_list_args(args) {
        Ok(p) => p,
        Err(msg) => {
            println!("{}", msg);
            return;
        }
    };

    let mut organization_ids = Vec::new();
    for name in &parsed.organizations {
        match ctx.find_organization(name) {
            Some(org) => organization_ids.push(org.id),
            None => return,
        }
    }

    let query = PeopleQuery {
        search: parsed.search,
        organization_ids,
        last_interaction_from: parsed.from,
        last_interaction_to: parsed.to,
        sort: parsed.sort,
    };

    let rows = match person_queries::people_view(&ctx.conn, ctx.owner_id(), &query) {
        Ok(rows) => rows,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };

    if rows.is_empty() {
        if query.has_active_filters() {
            println!("No people match those filters.");
        } else {
            println!("No people in your network yet. Use 'add-person' to add someone.");
        }
        return;
    }

    println!("People ({}):", rows.len());
    println!();
    let now = CLIContext::now();
    for row in &rows {
        let orgs = if row.person.organizations.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = row
                .person
                .organizations
                .iter()
                .map(|m| m.organization.name.as_str())
                .collect();
            format!(" [{}]", names.join(", "))
        };
        let place = row
            .person
            .location_name
            .as_ref()
            .map(|l| format!(" ({})", l))
            .unwrap_or_default();
        let last_contact = row
            .last_interaction
            .map(|d| {
                format!(
                    " - last contact: {}",
                    CLIContext::format_days_ago(interaction_queries::days_since(d, now))
                )
            })
            .unwrap_or_default();
        println!("  {}{}{}{}", row.person.name, orgs, place, last_contact);
    }
}

pub fn find(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: find <query>");
        return;
    }
    let people = person_queries::find_by_name(&ctx.conn, ctx.owner_id(), args).unwrap_or_default();
    if people.is_empty() {
        println!("No people found matching '{}'", args);
        return;
    }
    for person in &people {
        println!("  {}", person.name);
    }
}

pub fn add(ctx: &CLIContext, args: &str) {
    println!("Adding a new person (press Enter to skip optional fields)");
    println!();

    let name = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Name (required): ") {
            Some(s) if s.is_empty() => {
                println!("Name is required.");
                return;
            }
            Some(s) => s,
            None => return,
        }
    };

    let mut draft = PersonDraft::named(name);
    if !prompt_details(ctx, &mut draft) {
        return;
    }

    match person_ops::add_person(&ctx.conn, ctx.owner_id(), &draft) {
        Ok(p) => println!("Added {}", p.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn show(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: show-person <name>");
        return;
    }
    let Some(person) = ctx.find_person(args) else {
        return;
    };

    println!();
    println!("{}", person.name);
    let contact = &person.contact_info;
    for (label, value) in [
        ("Email", &contact.email),
        ("Phone", &contact.phone),
        ("LinkedIn", &contact.linkedin),
        ("Instagram", &contact.instagram),
        ("Twitter", &contact.twitter),
    ] {
        if let Some(v) = value {
            println!("  {}: {}", label, v);
        }
    }
    for (key, value) in &contact.other {
        println!("  {}: {}", key, value);
    }
    if let Some(loc) = &person.location_name {
        println!("  Location: {}", loc);
    }
    if let Some(addr) = &person.location_address {
        println!("  Address: {}", addr);
    }
    if let Some(point) = person.coordinates {
        println!("  Coordinates: {:.5}, {:.5}", point.lat, point.lng);
    }
    for membership in &person.organizations {
        match &membership.role {
            Some(role) => println!("  Works with: {} ({})", membership.organization.name, role),
            None => println!("  Works with: {}", membership.organization.name),
        }
    }
    if let Some(notes) = &person.notes {
        println!("  Notes: {}", notes);
    }

    crate::cli::interaction_commands::print_history(ctx, &person);
}

pub fn edit(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: edit-person <name>");
        return;
    }
    let Some(person) = ctx.find_person(args) else {
        return;
    };

    println!("Editing {} (Enter keeps a value, '-' clears it)", person.name);
    let mut draft = PersonDraft::from_person(&person);
    match ctx.prompt_keep("Name", Some(person.name.as_str())) {
        Some(Some(name)) => draft.name = name,
        Some(None) => {
            println!("Name is required.");
            return;
        }
        None => return,
    }
    if !prompt_details(ctx, &mut draft) {
        return;
    }

    match person_ops::update_person(&ctx.conn, ctx.owner_id(), person.id, &draft) {
        Ok(p) => println!("Updated {}", p.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: delete-person <name>");
        return;
    }
    let Some(person) = ctx.find_person(args) else {
        return;
    };
    let confirm = ctx
        .prompt(&format!("Delete {} and their interactions? (y/n): ", person.name))
        .unwrap_or_default();
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return;
    }
    match person_ops::delete_person(&ctx.conn, ctx.owner_id(), person.id) {
        Ok(()) => println!("Deleted {}", person.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// Fills the optional fields of `draft`. Returns false on EOF.
fn prompt_details(ctx: &CLIContext, draft: &mut PersonDraft) -> bool {
    macro_rules! keep {
        ($label:expr, $field:expr) => {
            match ctx.prompt_keep($label, $field.as_deref()) {
                Some(v) => $field = v,
                None => return false,
            }
        };
    }

    keep!("Email", draft.contact_info.email);
    keep!("Phone", draft.contact_info.phone);
    keep!("LinkedIn", draft.contact_info.linkedin);
    keep!("Location", draft.location_name);
    keep!("Address", draft.location_address);

    let current = draft
        .coordinates
        .map(|p| format!("{}, {}", p.lat, p.lng));
    match ctx.prompt_keep("Coordinates (lat, lng)", current.as_deref()) {
        Some(Some(s)) => match CLIContext::parse_coordinates(&s) {
            Some(point) => draft.coordinates = Some(point),
            None => println!("Invalid coordinates, skipping."),
        },
        Some(None) => draft.coordinates = None,
        None => return false,
    }

    keep!("Notes", draft.notes);

    let current_orgs = current_org_names(ctx, draft);
    match ctx.prompt_keep("Organizations (comma-separated)", current_orgs.as_deref()) {
        Some(Some(s)) => {
            if Some(s.as_str()) != current_orgs.as_deref() {
                draft.organizations = Some(resolve_organizations(ctx, &s));
            }
        }
        Some(None) => draft.organizations = Some(Vec::new()),
        None => return false,
    }
    true
}

fn current_org_names(ctx: &CLIContext, draft: &PersonDraft) -> Option<String> {
    let links = draft.organizations.as_ref()?;
    if links.is_empty() {
        return None;
    }
    let orgs = crate::db::organization_repo::find_by_owner(&ctx.conn, ctx.owner_id())
        .unwrap_or_default();
    let names: Vec<&str> = links
        .iter()
        .filter_map(|l| orgs.iter().find(|o| o.id == l.organization_id))
        .map(|o| o.name.as_str())
        .collect();
    Some(names.join(", "))
}

/// Unknown names become new organizations.
fn resolve_organizations(ctx: &CLIContext, input: &str) -> Vec<OrganizationLink> {
    let mut links = Vec::new();
    for name in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let existing = crate::db::organization_repo::find_by_name(&ctx.conn, ctx.owner_id(), name)
            .ok()
            .flatten();
        let org = match existing {
            Some(org) => org,
            None => match organization_ops::add_organization(
                &ctx.conn,
                ctx.owner_id(),
                &OrganizationDraft::named(name),
            ) {
                Ok(org) => {
                    println!("Created organization {}", org.name);
                    org
                }
                Err(e) => {
                    ctx.print_error(&e);
                    continue;
                }
            },
        };
        links.push(OrganizationLink::new(org.id));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_filters_from_search_words() {
        let parsed =
            parse_list_args("ada org:Acme_Labs from:2024-01-01 sort:last desc lovelace").unwrap();
        assert_eq!(parsed.search, "ada lovelace");
        assert_eq!(parsed.organizations, vec!["Acme Labs".to_string()]);
        assert_eq!(parsed.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(
            parsed.sort,
            SortState::new(SortField::LastInteraction, SortDirection::Desc)
        );
    }

    #[test]
    fn desc_applies_regardless_of_position() {
        let parsed = parse_list_args("desc sort:created").unwrap();
        assert_eq!(parsed.sort, SortState::new(SortField::CreatedAt, SortDirection::Desc));
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(parse_list_args("to:yesterday").is_err());
    }
}
