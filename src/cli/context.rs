use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use std::io::{self, Write};

use crate::config::Config;
use crate::db::organization_repo;
use crate::error::PrmError;
use crate::model::*;
use crate::queries::*;

pub struct CLIContext {
    pub conn: Connection,
    pub user: User,
    pub config: Config,
}

impl CLIContext {
    pub fn new(conn: Connection, user: User, config: Config) -> Self {
        Self { conn, user, config }
    }

    pub fn owner_id(&self) -> Id<User> {
        self.user.id
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Prompt showing the current value; an empty answer keeps it, `-` clears it.
    pub fn prompt_keep(&self, label: &str, current: Option<&str>) -> Option<Option<String>> {
        let shown = current.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let input = self.prompt(&format!("{}{}: ", label, shown))?;
        Some(match input.as_str() {
            "" => current.map(str::to_string),
            "-" => None,
            _ => Some(input),
        })
    }

    /// Find a person by name query. Prints why when nothing or too much matches.
    pub fn find_person(&self, args: &str) -> Option<Person> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }
        let people =
            person_queries::find_by_name(&self.conn, self.owner_id(), query).unwrap_or_default();
        pick("person", query, people, |p| p.name.as_str())
    }

    pub fn find_organization(&self, args: &str) -> Option<Organization> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }
        let lower = query.to_lowercase();
        let orgs: Vec<Organization> = organization_repo::find_by_owner(&self.conn, self.owner_id())
            .unwrap_or_default()
            .into_iter()
            .filter(|o| o.name.to_lowercase().contains(&lower))
            .collect();
        pick("organization", query, orgs, |o| o.name.as_str())
    }

    pub fn find_event(&self, args: &str) -> Option<Event> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }
        let lower = query.to_lowercase();
        let events: Vec<Event> = event_queries::all_events(&self.conn, self.owner_id())
            .unwrap_or_default()
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&lower))
            .collect();
        pick("event", query, events, |e| e.name.as_str())
    }

    pub fn format_days_ago(days: i64) -> String {
        match days {
            0 => "today".into(),
            1 => "yesterday".into(),
            n if n < 7 => format!("{} days ago", n),
            n if n < 30 => format!("{} week(s) ago", n / 7),
            n if n < 365 => format!("{} month(s) ago", n / 30),
            n => format!("{} year(s) ago", n / 365),
        }
    }

    pub fn now() -> DateTime<Utc> {
        Utc::now()
    }

    /// Accepts `YYYY-MM-DD` or `YYYY-MM-DD HH:MM` (UTC).
    pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
            .ok()
            .map(|dt| dt.and_utc())
    }

    /// `lat, lng`
    pub fn parse_coordinates(s: &str) -> Option<GeoPoint> {
        let (lat, lng) = s.split_once(',')?;
        Some(GeoPoint::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?))
    }

    pub fn print_error(&self, e: &PrmError) {
        println!("Error: {}", e);
    }
}

fn pick<T: Clone>(kind: &str, query: &str, matches: Vec<T>, name: impl Fn(&T) -> &str) -> Option<T> {
    match matches.len() {
        0 => {
            println!("No {} found matching '{}'", kind, query);
            None
        }
        1 => matches.into_iter().next(),
        _ => {
            if let Some(exact) = matches.iter().find(|m| name(m).eq_ignore_ascii_case(query)) {
                return Some(exact.clone());
            }
            println!("Multiple matches found:");
            for m in &matches {
                println!("  {}", name(m));
            }
            println!("Please be more specific.");
            None
        }
    }
}
