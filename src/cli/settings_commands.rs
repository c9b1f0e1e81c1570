use crate::cli::context::CLIContext;
use crate::model::*;
use crate::ops::*;
use crate::queries::map_queries::MapItem;
use crate::queries::*;

pub fn show(ctx: &CLIContext) {
    let prefs = match preference_queries::resolved(&ctx.conn, ctx.owner_id()) {
        Ok(p) => p,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    println!("Settings:");
    for key in PreferenceKey::ALL {
        println!("  {}: {}", key.as_str(), prefs.get(*key).join(", "));
    }
    println!("  api token: {}", ctx.user.api_token);
}

/// `set-pref <key> <a, b, c>`
pub fn set_pref(ctx: &CLIContext, args: &str) {
    let Some((key, values)) = args.split_once(char::is_whitespace) else {
        println!("Usage: set-pref <key> <value, value, ...>");
        return;
    };
    if PreferenceKey::from_key(key).is_none() {
        println!("Note: '{}' is not a key the app reads.", key);
    }
    let values: Vec<String> = values.split(',').map(str::to_string).collect();
    match preference_ops::set_preference(&ctx.conn, ctx.owner_id(), key, &values) {
        Ok(p) => println!("Saved {}: {}", p.key, p.value.join(", ")),
        Err(e) => ctx.print_error(&e),
    }
}

/// `map [zoom]` prints the clusters the map would draw.
pub fn map(ctx: &CLIContext, args: &str) {
    let zoom = if args.is_empty() {
        ctx.config.map.default_zoom
    } else {
        match args.trim().parse::<u8>() {
            Ok(z) => z,
            Err(_) => {
                println!("Usage: map [zoom]");
                return;
            }
        }
    };
    let options = ctx.config.cluster_options();
    let items = match map_queries::clustered_map(&ctx.conn, ctx.owner_id(), zoom, &options) {
        Ok(items) => items,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    if items.is_empty() {
        println!("Nobody on the map yet. Add coordinates with 'edit-person'.");
        return;
    }

    let people = person_queries::all_people(&ctx.conn, ctx.owner_id()).unwrap_or_default();
    let name_of = |id: Id<Person>| {
        people
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    };

    println!("Map at zoom {}:", zoom);
    for item in &items {
        match item {
            MapItem::Point(p) => println!(
                "  {} ({:.4}, {:.4})",
                p.name, p.coordinates.lat, p.coordinates.lng
            ),
            MapItem::Cluster(c) => {
                let names: Vec<String> = c.members.iter().take(3).map(|id| name_of(*id)).collect();
                let more = if c.point_count > 3 { ", ..." } else { "" };
                println!(
                    "  cluster of {} [{}] near ({:.4}, {:.4}): {}{} (splits at zoom {})",
                    c.point_count_abbreviated,
                    c.tier.color(),
                    c.coordinates.lat,
                    c.coordinates.lng,
                    names.join(", "),
                    more,
                    c.expansion_zoom
                );
            }
        }
    }
}
