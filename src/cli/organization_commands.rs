use crate::cli::context::CLIContext;
use crate::db::organization_repo;
use crate::model::*;
use crate::ops::*;
use crate::queries::*;

pub fn list(ctx: &CLIContext) {
    let orgs = organization_repo::find_by_owner(&ctx.conn, ctx.owner_id()).unwrap_or_default();
    if orgs.is_empty() {
        println!("No organizations yet. Use 'add-org' to create one.");
        return;
    }
    let people = person_queries::all_people(&ctx.conn, ctx.owner_id()).unwrap_or_default();
    println!("Organizations ({}):", orgs.len());
    for org in &orgs {
        let members = people.iter().filter(|p| p.belongs_to(org.id)).count();
        let industry = org
            .industry
            .as_ref()
            .map(|i| format!(" - {}", i))
            .unwrap_or_default();
        println!("  {}{} ({} people)", org.name, industry, members);
    }
}

pub fn add(ctx: &CLIContext, args: &str) {
    let name = if !args.is_empty() {
        args.to_string()
    } else {
        match ctx.prompt("Name: ") {
            Some(s) if !s.is_empty() => s,
            _ => {
                println!("Name is required.");
                return;
            }
        }
    };
    let draft = OrganizationDraft {
        name,
        website: ctx.prompt("Website (optional): ").filter(|s| !s.is_empty()),
        industry: ctx.prompt("Industry (optional): ").filter(|s| !s.is_empty()),
    };
    match organization_ops::add_organization(&ctx.conn, ctx.owner_id(), &draft) {
        Ok(org) => println!("Added {}", org.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: delete-org <name>");
        return;
    }
    let Some(org) = ctx.find_organization(args) else {
        return;
    };
    let confirm = ctx
        .prompt(&format!("Delete {}? People stay, memberships go. (y/n): ", org.name))
        .unwrap_or_default();
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return;
    }
    match organization_ops::delete_organization(&ctx.conn, ctx.owner_id(), org.id) {
        Ok(()) => println!("Deleted {}", org.name),
        Err(e) => ctx.print_error(&e),
    }
}
