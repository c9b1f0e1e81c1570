use crate::cli::context::CLIContext;
use crate::cli::interaction_commands::choose;
use crate::model::*;
use crate::ops::*;
use crate::queries::event_queries::{EventQuery, TimeFilter};
use crate::queries::*;

/// `events [upcoming|past] [type:<t>] [search words]`
pub fn parse_list_args(args: &str) -> EventQuery {
    let mut query = EventQuery::default();
    let mut words = Vec::new();
    for token in args.split_whitespace() {
        if let Some(t) = token.strip_prefix("type:") {
            query.event_type = Some(t.to_string());
        } else if let Some(time) = TimeFilter::parse(token).filter(|t| *t != TimeFilter::All) {
            query.time = time;
        } else {
            words.push(token);
        }
    }
    query.search = words.join(" ");
    query
}

pub fn list(ctx: &CLIContext, args: &str) {
    let query = parse_list_args(args);
    let now = CLIContext::now();
    let events = match event_queries::events_view(&ctx.conn, ctx.owner_id(), &query, now) {
        Ok(e) => e,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    if events.is_empty() {
        println!("No events found. Use 'add-event' to create one.");
        return;
    }

    let mut printed_past_header = false;
    println!("Events ({}):", events.len());
    for summary in &events {
        if !summary.upcoming && !printed_past_header {
            println!("  -- past --");
            printed_past_header = true;
        }
        let event = &summary.event;
        let kind = event
            .event_type
            .as_ref()
            .map(|t| format!(" [{}]", t))
            .unwrap_or_default();
        println!(
            "  {} {}{} @ {} ({} logged)",
            event.date.format("%Y-%m-%d"),
            event.name,
            kind,
            event.location_name,
            summary.interaction_count
        );
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

    let Some(date) = ctx
        .prompt("Date (YYYY-MM-DD or YYYY-MM-DD HH:MM): ")
        .and_then(|s| CLIContext::parse_datetime(&s))
    else {
        println!("A valid date is required.");
        return;
    };
    let location = ctx.prompt("Location: ").unwrap_or_default();

    let mut draft = EventDraft::new(name, date, location);
    let prefs = preference_queries::resolved(&ctx.conn, ctx.owner_id()).unwrap_or_default();
    draft.event_type = choose(ctx, "Type", &prefs.event_types, "other");
    draft.end_date = ctx
        .prompt("End date (optional): ")
        .and_then(|s| CLIContext::parse_datetime(&s));
    draft.coordinates = ctx
        .prompt("Coordinates (lat, lng, optional): ")
        .and_then(|s| CLIContext::parse_coordinates(&s));
    draft.description = ctx.prompt("Description (optional): ").filter(|s| !s.is_empty());

    match event_ops::add_event(&ctx.conn, ctx.owner_id(), &draft) {
        Ok(e) => println!("Added {}", e.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn show(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: show-event <name>");
        return;
    }
    let Some(event) = ctx.find_event(args) else {
        return;
    };

    println!();
    println!("{}", event.name);
    println!("  When: {}", event.date.format("%Y-%m-%d %H:%M"));
    if let Some(end) = event.end_date {
        println!("  Until: {}", end.format("%Y-%m-%d %H:%M"));
    }
    println!("  Where: {}", event.location_name);
    if let Some(t) = &event.event_type {
        println!("  Type: {}", t);
    }
    if let Some(d) = &event.description {
        println!("  {}", d);
    }

    let interactions =
        interaction_queries::for_event(&ctx.conn, ctx.owner_id(), event.id).unwrap_or_default();
    if interactions.is_empty() {
        println!("  Nobody logged yet. Use 'batch-log {}'.", event.name);
        return;
    }
    let people = person_queries::all_people(&ctx.conn, ctx.owner_id()).unwrap_or_default();
    println!("  People met ({}):", interactions.len());
    for i in &interactions {
        let name = people
            .iter()
            .find(|p| p.id == i.person_id)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        println!("    {} ({})", name, i.interaction_type);
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: delete-event <name>");
        return;
    }
    let Some(event) = ctx.find_event(args) else {
        return;
    };
    let confirm = ctx
        .prompt(&format!("Delete {}? Logged interactions are kept. (y/n): ", event.name))
        .unwrap_or_default();
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled.");
        return;
    }
    match event_ops::delete_event(&ctx.conn, ctx.owner_id(), event.id) {
        Ok(()) => println!("Deleted {}", event.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// Logs everyone met at an event in one go.
pub fn batch_log(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: batch-log <event>");
        return;
    }
    let Some(event) = ctx.find_event(args) else {
        return;
    };
    let prefs = preference_queries::resolved(&ctx.conn, ctx.owner_id()).unwrap_or_default();

    println!("Who did you meet at {}? Empty name to finish.", event.name);
    let mut rows: Vec<EventAttendance> = Vec::new();
    loop {
        let name = match ctx.prompt("Person: ") {
            Some(s) if !s.is_empty() => s,
            _ => break,
        };
        let Some(person) = ctx.find_person(&name) else {
            continue;
        };
        let mut row = EventAttendance::new(person.id);
        if let Some(t) = choose(ctx, "Type", &prefs.interaction_types, DEFAULT_INTERACTION_TYPE) {
            row.interaction_type = t;
        }
        row.sentiment = ctx
            .prompt(&format!("Sentiment ({}, optional): ", prefs.sentiments.join("/")))
            .filter(|s| !s.is_empty());
        row.notes = ctx.prompt("Notes (optional): ").filter(|s| !s.is_empty());
        rows.push(row);
    }

    if rows.is_empty() {
        println!("Add at least one person.");
        return;
    }

    match interaction_ops::log_batch_for_event(&ctx.conn, ctx.owner_id(), event.id, &rows) {
        Ok(logged) => println!("Logged {} interaction(s) at {}", logged.len(), event.name),
        Err(e) => ctx.print_error(&e),
    }
}
