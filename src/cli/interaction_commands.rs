use crate::cli::context::CLIContext;
use crate::model::*;
use crate::ops::*;
use crate::queries::*;

pub fn log(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: log <name>");
        return;
    }
    if let Some(person) = ctx.find_person(args) {
        log_for_person(ctx, &person);
    }
}

pub fn log_for_person(ctx: &CLIContext, person: &Person) {
    println!("Logging interaction with {}", person.name);

    let prefs = preference_queries::resolved(&ctx.conn, ctx.owner_id()).unwrap_or_default();
    let Some(interaction_type) = choose(ctx, "Type", &prefs.interaction_types, DEFAULT_INTERACTION_TYPE)
    else {
        return;
    };

    let date_input = ctx.prompt("Date (YYYY-MM-DD, Enter for now): ").unwrap_or_default();
    let date = if date_input.is_empty() {
        CLIContext::now()
    } else {
        match CLIContext::parse_datetime(&date_input) {
            Some(d) => d,
            None => {
                println!("Invalid date.");
                return;
            }
        }
    };

    let mut draft = InteractionDraft::new(person.id, date, interaction_type);
    draft.sentiment = ctx
        .prompt(&format!("Sentiment ({}, optional): ", prefs.sentiments.join("/")))
        .filter(|s| !s.is_empty());
    draft.location_name = ctx.prompt("Where (optional): ").filter(|s| !s.is_empty());
    draft.notes = ctx.prompt("Notes (optional): ").filter(|s| !s.is_empty());

    match interaction_ops::log_interaction(&ctx.conn, ctx.owner_id(), &draft) {
        Ok(_) => println!("Logged interaction with {}", person.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn history(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: history <name>");
        return;
    }
    if let Some(person) = ctx.find_person(args) {
        print_history(ctx, &person);
    }
}

pub fn print_history(ctx: &CLIContext, person: &Person) {
    let interactions =
        interaction_queries::history(&ctx.conn, ctx.owner_id(), person.id).unwrap_or_default();
    println!();
    if interactions.is_empty() {
        println!("  No interactions with {} yet.", person.name);
        return;
    }
    let events = event_queries::all_events(&ctx.conn, ctx.owner_id()).unwrap_or_default();
    println!("  Interactions ({}):", interactions.len());
    for i in &interactions {
        let at = i
            .event_id
            .and_then(|id| events.iter().find(|e| e.id == id))
            .map(|e| format!(" at {}", e.name))
            .or_else(|| i.location_name.as_ref().map(|l| format!(" in {}", l)))
            .unwrap_or_default();
        let sentiment = i
            .sentiment
            .as_ref()
            .map(|s| format!(" ({})", s))
            .unwrap_or_default();
        println!(
            "    {} {}{}{}",
            i.date.format("%Y-%m-%d"),
            i.interaction_type,
            at,
            sentiment
        );
        if let Some(notes) = &i.notes {
            println!("      {}", notes);
        }
    }
}

pub fn print_stats(ctx: &CLIContext) {
    let stats = match stats_queries::stats(&ctx.conn, ctx.owner_id(), CLIContext::now()) {
        Ok(s) => s,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };

    println!("Network statistics:");
    println!("  People: {}", stats.total_people);
    println!("  Organizations: {}", stats.total_organizations);
    println!(
        "  Events: {} ({} upcoming, {} past)",
        stats.total_events, stats.upcoming_events, stats.past_events
    );
    println!("  Interactions: {}", stats.total_interactions);
    println!("  Never contacted: {}", stats.never_contacted);
    println!("  Not on the map: {}", stats.without_location);
    if let Some(gap) = &stats.longest_gap {
        println!(
            "  Longest gap: {} ({})",
            gap.name,
            CLIContext::format_days_ago(gap.days)
        );
    }
}

/// Numbered pick from `options`; Enter takes `default`. Free text is accepted
/// as-is.
pub fn choose(ctx: &CLIContext, label: &str, options: &[String], default: &str) -> Option<String> {
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    let input = ctx.prompt(&format!("{} [{}]: ", label, default))?;
    if input.is_empty() {
        return Some(default.to_string());
    }
    Some(
        input
            .parse::<usize>()
            .ok()
            .and_then(|i| options.get(i.wrapping_sub(1)))
            .cloned()
            .unwrap_or(input),
    )
}
