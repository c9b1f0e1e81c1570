pub mod context;
pub mod person_commands;
pub mod organization_commands;
pub mod event_commands;
pub mod interaction_commands;
pub mod settings_commands;

use rusqlite::Connection;

use crate::config::Config;
use crate::db::user_repo;
use crate::ops::user_ops;
use context::CLIContext;

/// Run the interactive REPL.
pub fn run(conn: Connection, config: Config) {
    println!("Globe - Personal Relationship Manager");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let ctx = match load_or_init(conn, config) {
        Some(ctx) => ctx,
        None => return,
    };

    repl_loop(&ctx);
}

fn load_or_init(conn: Connection, config: Config) -> Option<CLIContext> {
    match user_repo::find_first(&conn) {
        Ok(Some(user)) => {
            println!("Loaded network for {}", user.name);
            Some(CLIContext::new(conn, user, config))
        }
        Ok(None) => {
            println!("No existing network found.");
            init_new_network(conn, config)
        }
        Err(e) => {
            println!("Error loading data: {}", e);
            None
        }
    }
}

fn init_new_network(conn: Connection, config: Config) -> Option<CLIContext> {
    println!();
    print!("What's your name? ");
    use std::io::Write;
    std::io::stdout().flush().ok();

    let mut name = String::new();
    std::io::stdin().read_line(&mut name).ok()?;
    let name = name.trim().to_string();

    let name_lower = name.to_lowercase();
    if name_lower == "exit" || name_lower == "quit" || name_lower == "q" {
        return None;
    }

    let user = match user_ops::create_user(&conn, &name, "") {
        Ok(u) => u,
        Err(e) => {
            println!("Error: {}. Please restart and try again.", e);
            return None;
        }
    };

    println!("Welcome, {}! Your network has been created.", user.name);
    println!("API token (for 'globe serve'): {}", user.api_token);
    println!();

    Some(CLIContext::new(conn, user, config))
}

fn repl_loop(ctx: &CLIContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,

            // People
            "people" | "list" | "ls" => person_commands::list(ctx, args),
            "find" => person_commands::find(ctx, args),
            "add-person" => person_commands::add(ctx, args),
            "show-person" | "show" | "view" => person_commands::show(ctx, args),
            "edit-person" => person_commands::edit(ctx, args),
            "delete-person" => person_commands::delete(ctx, args),

            // Organizations
            "orgs" | "organizations" => organization_commands::list(ctx),
            "add-org" => organization_commands::add(ctx, args),
            "delete-org" => organization_commands::delete(ctx, args),

            // Events
            "events" => event_commands::list(ctx, args),
            "add-event" => event_commands::add(ctx, args),
            "show-event" => event_commands::show(ctx, args),
            "delete-event" => event_commands::delete(ctx, args),
            "batch-log" => event_commands::batch_log(ctx, args),

            // Interactions
            "log" => interaction_commands::log(ctx, args),
            "history" => interaction_commands::history(ctx, args),

            // Other
            "map" => settings_commands::map(ctx, args),
            "settings" => settings_commands::show(ctx),
            "set-pref" => settings_commands::set_pref(ctx, args),
            "stats" => interaction_commands::print_stats(ctx),

            _ => println!("Unknown command: {}. Type 'help' for commands.", command),
        }
    }
}

/// Split input into the command word and the rest.
fn parse_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn print_help() {
    println!(r#"
COMMANDS:

  People:
    people [filters]        List people. Filters: search words, org:<name>,
                            from:<YYYY-MM-DD>, to:<YYYY-MM-DD>,
                            sort:<name|created|last>, desc
    find <query>            Search people by name
    add-person [name]       Add a new person (interactive)
    show-person <name>      Show person details and history
    edit-person <name>      Edit a person
    delete-person <name>    Delete a person and their interactions

  Organizations:
    orgs                    List organizations
    add-org [name]          Create an organization
    delete-org <name>       Delete an organization

  Events:
    events [filters]        List events. Filters: upcoming, past, type:<t>,
                            search words
    add-event [name]        Create an event
    show-event <name>       Show an event and who you met there
    delete-event <name>     Delete an event
    batch-log <event>       Log everyone you met at an event

  Interactions:
    log <name>              Log an interaction
    history <name>          Show interaction history

  Other:
    map [zoom]              Show map clusters
    settings                Show lists and api token
    set-pref <key> <list>   Save a list (interaction_types, event_types, sentiments)
    stats                   Show statistics
    help                    Show this help
    exit / quit / q         Exit

TIPS:
  - Names are case-insensitive and partial matches work
  - When editing, Enter keeps a value and '-' clears it"#);
}
