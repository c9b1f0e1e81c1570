use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use globe::db::*;
use globe::error::PrmError;
use globe::model::*;
use globe::ops::*;
use globe::queries::event_queries::{self, EventQuery, TimeFilter};
use globe::queries::person_queries::{self, PeopleQuery, SortDirection, SortField, SortState};
use globe::queries::*;

fn setup() -> (rusqlite::Connection, User) {
    let conn = schema::test_connection();
    let user = user_ops::create_user(&conn, "Ada", "").unwrap();
    (conn, user)
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn add(conn: &rusqlite::Connection, user: &User, name: &str) -> Person {
    person_ops::add_person(conn, user.id, &PersonDraft::named(name)).unwrap()
}

fn log(conn: &rusqlite::Connection, user: &User, person: &Person, date: DateTime<Utc>) -> Interaction {
    interaction_ops::log_interaction(conn, user.id, &InteractionDraft::new(person.id, date, "call"))
        .unwrap()
}

fn names(rows: &[person_queries::PersonSummary]) -> Vec<&str> {
    rows.iter().map(|r| r.person.name.as_str()).collect()
}

// ==========================================================================
// PERSON QUERY TESTS
// ==========================================================================

#[test]
fn default_view_sorts_by_name_ignoring_case() {
    let (conn, user) = setup();
    for name in ["charlie", "Alice", "bob"] {
        add(&conn, &user, name);
    }
    let rows = person_queries::people_view(&conn, user.id, &PeopleQuery::default()).unwrap();
    assert_eq!(names(&rows), vec!["Alice", "bob", "charlie"]);
}

#[test]
fn search_matches_contact_handles() {
    let (conn, user) = setup();
    let mut draft = PersonDraft::named("Alice");
    draft.contact_info.linkedin = Some("linkedin.com/in/alice-rust".into());
    person_ops::add_person(&conn, user.id, &draft).unwrap();
    add(&conn, &user, "Bob");

    let query = PeopleQuery {
        search: "RUST".into(),
        ..PeopleQuery::default()
    };
    let rows = person_queries::people_view(&conn, user.id, &query).unwrap();
    assert_eq!(names(&rows), vec!["Alice"]);
}

#[test]
fn organization_filter_matches_any_selected() {
    let (conn, user) = setup();
    let acme = organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Acme"))
        .unwrap();
    let beta = organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Beta"))
        .unwrap();
    for (name, org) in [("Alice", Some(acme.id)), ("Bob", Some(beta.id)), ("Carol", None)] {
        let mut draft = PersonDraft::named(name);
        draft.organizations = org.map(|id| vec![OrganizationLink::new(id)]);
        person_ops::add_person(&conn, user.id, &draft).unwrap();
    }

    let query = PeopleQuery {
        organization_ids: vec![acme.id, beta.id],
        ..PeopleQuery::default()
    };
    assert!(query.has_active_filters());
    let rows = person_queries::people_view(&conn, user.id, &query).unwrap();
    assert_eq!(names(&rows), vec!["Alice", "Bob"]);
}

#[test]
fn date_bounds_are_inclusive_and_drop_never_contacted() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    let bob = add(&conn, &user, "Bob");
    add(&conn, &user, "Carol");
    log(&conn, &user, &alice, at(2026, 3, 1));
    log(&conn, &user, &bob, at(2026, 3, 15));

    let query = PeopleQuery {
        last_interaction_from: NaiveDate::from_ymd_opt(2026, 3, 1),
        last_interaction_to: NaiveDate::from_ymd_opt(2026, 3, 10),
        ..PeopleQuery::default()
    };
    let rows = person_queries::people_view(&conn, user.id, &query).unwrap();
    assert_eq!(names(&rows), vec!["Alice"]);
    assert_eq!(rows[0].last_interaction, Some(at(2026, 3, 1)));
}

#[test]
fn date_filter_uses_latest_interaction_only() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    log(&conn, &user, &alice, at(2026, 1, 5));
    log(&conn, &user, &alice, at(2026, 6, 5));

    let query = PeopleQuery {
        last_interaction_to: NaiveDate::from_ymd_opt(2026, 2, 1),
        ..PeopleQuery::default()
    };
    assert!(person_queries::people_view(&conn, user.id, &query).unwrap().is_empty());
}

#[test]
fn last_interaction_sort_puts_never_contacted_first() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    let bob = add(&conn, &user, "Bob");
    add(&conn, &user, "Carol");
    log(&conn, &user, &alice, at(2026, 5, 1));
    log(&conn, &user, &bob, at(2026, 2, 1));

    let mut query = PeopleQuery {
        sort: SortState::new(SortField::LastInteraction, SortDirection::Asc),
        ..PeopleQuery::default()
    };
    let rows = person_queries::people_view(&conn, user.id, &query).unwrap();
    assert_eq!(names(&rows), vec!["Carol", "Bob", "Alice"]);

    query.sort.toggle(SortField::LastInteraction);
    let rows = person_queries::people_view(&conn, user.id, &query).unwrap();
    assert_eq!(names(&rows), vec!["Alice", "Bob", "Carol"]);
}

#[test]
fn names_equal_but_for_case_fall_back_to_id_order() {
    let people: Vec<Person> = ["bob", "Bob", "BOB", "amy"]
        .into_iter()
        .map(|name| Person::create(name.into()))
        .collect();
    let mut bobs: Vec<Id<Person>> = people.iter().filter(|p| p.name != "amy").map(|p| p.id).collect();
    bobs.sort();

    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let query = PeopleQuery {
            sort: SortState::new(SortField::Name, direction),
            ..PeopleQuery::default()
        };
        let forward = person_queries::filter_and_sort(people.clone(), &[], &query);
        let mut reversed_input = people.clone();
        reversed_input.reverse();
        let backward = person_queries::filter_and_sort(reversed_input, &[], &query);

        let ids = |rows: &[person_queries::PersonSummary]| -> Vec<Id<Person>> {
            rows.iter().map(|r| r.person.id).collect()
        };
        assert_eq!(ids(&forward), ids(&backward));

        let bob_ids: Vec<Id<Person>> = forward
            .iter()
            .filter(|r| r.person.name != "amy")
            .map(|r| r.person.id)
            .collect();
        assert_eq!(bob_ids, bobs);
    }
}

#[test]
fn equal_last_interaction_dates_tie_break_by_name() {
    let alice = Person::create("alice".into());
    let bob = Person::create("Bob".into());
    let date = at(2026, 4, 1);
    let interactions = vec![
        Interaction::create(bob.id, date, "call".into()),
        Interaction::create(alice.id, date, "call".into()),
    ];
    let query = PeopleQuery {
        sort: SortState::new(SortField::LastInteraction, SortDirection::Desc),
        ..PeopleQuery::default()
    };
    let rows = person_queries::filter_and_sort(vec![bob, alice], &interactions, &query);
    assert_eq!(names(&rows), vec!["alice", "Bob"]);
}

#[test]
fn toggle_switches_field_back_to_ascending() {
    let mut sort = SortState::new(SortField::Name, SortDirection::Desc);
    sort.toggle(SortField::CreatedAt);
    assert_eq!(sort, SortState::new(SortField::CreatedAt, SortDirection::Asc));
    sort.toggle(SortField::CreatedAt);
    assert_eq!(sort.direction, SortDirection::Desc);
}

#[test]
fn sort_field_parse_accepts_aliases() {
    assert_eq!(SortField::parse("last"), Some(SortField::LastInteraction));
    assert_eq!(SortField::parse("created-at"), Some(SortField::CreatedAt));
    assert_eq!(SortField::parse("shoe size"), None);
}

#[test]
fn equal_dates_resolve_to_latest_recorded() {
    let person = Person::create("Alice".into());
    let date = at(2026, 4, 1);
    let first = Interaction::create(person.id, date, "call".into());
    let mut second = Interaction::create(person.id, date, "email".into());
    second.created_at = first.created_at + chrono::Duration::seconds(1);

    let interactions = vec![first, second.clone()];
    let latest = person_queries::last_interactions(&interactions);
    assert_eq!(latest[&person.id].id, second.id);
}

#[test]
fn no_filters_means_inactive() {
    assert!(!PeopleQuery::default().has_active_filters());
    let query = PeopleQuery {
        search: "   ".into(),
        ..PeopleQuery::default()
    };
    assert!(!person_queries::has_active_filters(&query));
}

// ==========================================================================
// INTERACTION QUERY TESTS
// ==========================================================================

#[test]
fn history_is_newest_first() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    log(&conn, &user, &alice, at(2026, 1, 1));
    log(&conn, &user, &alice, at(2026, 3, 1));

    let history = interaction_queries::history(&conn, user.id, alice.id).unwrap();
    assert_eq!(history[0].date, at(2026, 3, 1));
    assert_eq!(
        interaction_queries::days_since_last(&conn, user.id, alice.id, at(2026, 3, 11)).unwrap(),
        Some(10)
    );
}

#[test]
fn history_of_foreign_person_not_found() {
    let (conn, user) = setup();
    let stranger = user_ops::create_user(&conn, "Grace", "").unwrap();
    let theirs = add(&conn, &stranger, "Hopper");
    assert!(matches!(
        interaction_queries::history(&conn, user.id, theirs.id),
        Err(PrmError::NotFound { .. })
    ));
}

#[test]
fn days_since_never_negative() {
    assert_eq!(interaction_queries::days_since(at(2026, 5, 2), at(2026, 5, 1)), 0);
    assert_eq!(interaction_queries::days_since(at(2026, 4, 1), at(2026, 5, 1)), 30);
}

#[test]
fn in_range_covers_whole_days() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    log(&conn, &user, &alice, Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap());
    log(
        &conn,
        &user,
        &alice,
        Utc.with_ymd_and_hms(2026, 7, 3, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(500),
    );
    log(&conn, &user, &alice, at(2026, 7, 4));

    let day = |d| NaiveDate::from_ymd_opt(2026, 7, d).unwrap();
    let found = interaction_queries::in_range(&conn, user.id, day(1), day(3)).unwrap();
    assert_eq!(found.len(), 2);
    assert!(matches!(
        interaction_queries::in_range(&conn, user.id, day(3), day(1)),
        Err(PrmError::InvalidDateRange { .. })
    ));
}

#[test]
fn details_join_person_and_event_names() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    let conf = event_ops::add_event(&conn, user.id, &EventDraft::new("RustConf", at(2026, 9, 1), "Seattle"))
        .unwrap();
    interaction_ops::log_batch_for_event(&conn, user.id, conf.id, &[EventAttendance::new(alice.id)])
        .unwrap();

    let details = interaction_queries::with_details(&conn, user.id).unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].person.as_ref().unwrap().name, "Alice");
    assert_eq!(details[0].event.as_ref().unwrap().name, "RustConf");
    assert_eq!(interaction_queries::for_event(&conn, user.id, conf.id).unwrap().len(), 1);
}

// ==========================================================================
// EVENT QUERY TESTS
// ==========================================================================

fn seeded_events(conn: &rusqlite::Connection, user: &User) {
    let specs = [
        ("Old Meetup", Some("meetup"), at(2025, 1, 1)),
        ("Recent Dinner", Some("dinner"), at(2026, 9, 1)),
        ("Next Conf", Some("conference"), at(2026, 11, 1)),
        ("Later Conf", Some("Conference"), at(2027, 2, 1)),
    ];
    for (name, kind, date) in specs {
        let mut draft = EventDraft::new(name, date, "Somewhere");
        draft.event_type = kind.map(String::from);
        event_ops::add_event(conn, user.id, &draft).unwrap();
    }
}

#[test]
fn events_order_upcoming_then_past() {
    let (conn, user) = setup();
    seeded_events(&conn, &user);
    let now = at(2026, 10, 1);

    let rows = event_queries::events_view(&conn, user.id, &EventQuery::default(), now).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.event.name.as_str()).collect();
    assert_eq!(names, vec!["Next Conf", "Later Conf", "Recent Dinner", "Old Meetup"]);
    assert!(rows[0].upcoming);
    assert!(!rows[2].upcoming);
}

#[test]
fn event_a_fraction_of_a_second_ahead_is_upcoming() {
    let (conn, user) = setup();
    let now = Utc.with_ymd_and_hms(2026, 10, 1, 10, 0, 0).unwrap() + chrono::Duration::milliseconds(300);
    let soon = now + chrono::Duration::milliseconds(400);
    event_ops::add_event(&conn, user.id, &EventDraft::new("Soon", soon, "Here")).unwrap();

    let query = EventQuery {
        time: TimeFilter::Upcoming,
        ..EventQuery::default()
    };
    let rows = event_queries::events_view(&conn, user.id, &query, now).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event.date, soon);
    assert!(rows[0].upcoming);
}

#[test]
fn event_type_filter_ignores_case_and_all() {
    let (conn, user) = setup();
    seeded_events(&conn, &user);
    let now = at(2026, 10, 1);

    let query = EventQuery {
        event_type: Some("CONFERENCE".into()),
        ..EventQuery::default()
    };
    assert_eq!(event_queries::events_view(&conn, user.id, &query, now).unwrap().len(), 2);

    let all = EventQuery {
        event_type: Some("all".into()),
        time: TimeFilter::Past,
        ..EventQuery::default()
    };
    assert_eq!(event_queries::events_view(&conn, user.id, &all, now).unwrap().len(), 2);
}

#[test]
fn event_view_counts_interactions() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    let bob = add(&conn, &user, "Bob");
    let conf = event_ops::add_event(&conn, user.id, &EventDraft::new("RustConf", at(2026, 9, 1), "Seattle"))
        .unwrap();
    interaction_ops::log_batch_for_event(
        &conn,
        user.id,
        conf.id,
        &[EventAttendance::new(alice.id), EventAttendance::new(bob.id)],
    )
    .unwrap();

    let rows = event_queries::events_view(&conn, user.id, &EventQuery::default(), at(2026, 10, 1)).unwrap();
    assert_eq!(rows[0].interaction_count, 2);
}

#[test]
fn event_types_are_distinct_in_first_seen_order() {
    let (conn, user) = setup();
    seeded_events(&conn, &user);
    let events = event_queries::all_events(&conn, user.id).unwrap();
    // newest first: Later Conf, Next Conf, Recent Dinner, Old Meetup
    assert_eq!(
        event_queries::event_types(&events),
        vec!["Conference", "conference", "dinner", "meetup"]
    );
}

// ==========================================================================
// MAP QUERY TESTS
// ==========================================================================

#[test]
fn map_skips_people_without_coordinates() {
    let (conn, user) = setup();
    let mut draft = PersonDraft::named("Alice");
    draft.coordinates = Some(GeoPoint::new(37.77, -122.42));
    let alice = person_ops::add_person(&conn, user.id, &draft).unwrap();
    add(&conn, &user, "Nowhere Man");

    let collection = map_queries::people_map(&conn, user.id).unwrap();
    assert_eq!(collection.features.len(), 1);
    let json = serde_json::to_value(&collection).unwrap();
    assert_eq!(json["type"], "FeatureCollection");
    assert_eq!(json["features"][0]["geometry"]["coordinates"][0], -122.42);
    assert_eq!(json["features"][0]["properties"]["id"], alice.id.to_string());
}

#[test]
fn nearby_people_cluster_at_low_zoom() {
    let (conn, user) = setup();
    for (i, name) in ["A", "B", "C"].iter().enumerate() {
        let mut draft = PersonDraft::named(*name);
        draft.coordinates = Some(GeoPoint::new(37.77 + i as f64 * 0.001, -122.42));
        person_ops::add_person(&conn, user.id, &draft).unwrap();
    }

    let options = map_queries::ClusterOptions::default();
    let items = map_queries::clustered_map(&conn, user.id, 3, &options).unwrap();
    assert_eq!(items.len(), 1);
    assert!(matches!(&items[0], map_queries::MapItem::Cluster(c) if c.point_count == 3));

    let beyond = map_queries::clustered_map(&conn, user.id, options.max_zoom + 1, &options).unwrap();
    assert_eq!(beyond.len(), 3);
}

// ==========================================================================
// STATS AND PREFERENCE QUERY TESTS
// ==========================================================================

#[test]
fn stats_summarize_network() {
    let (conn, user) = setup();
    let alice = add(&conn, &user, "Alice");
    let bob = add(&conn, &user, "Bob");
    add(&conn, &user, "Carol");
    log(&conn, &user, &alice, at(2026, 9, 1));
    log(&conn, &user, &bob, at(2026, 6, 1));
    organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Acme")).unwrap();
    event_ops::add_event(&conn, user.id, &EventDraft::new("Soon", at(2026, 12, 1), "Here")).unwrap();

    let stats = stats_queries::stats(&conn, user.id, at(2026, 10, 1)).unwrap();
    assert_eq!(stats.total_people, 3);
    assert_eq!(stats.total_organizations, 1);
    assert_eq!(stats.upcoming_events, 1);
    assert_eq!(stats.past_events, 0);
    assert_eq!(stats.total_interactions, 2);
    assert_eq!(stats.never_contacted, 1);
    assert_eq!(stats.without_location, 3);
    let gap = stats.longest_gap.unwrap();
    assert_eq!(gap.name, "Bob");
    assert_eq!(gap.days, 122);
}

#[test]
fn resolved_preferences_fall_back_to_defaults() {
    let (conn, user) = setup();
    preference_ops::set_preference(&conn, user.id, "sentiments", &["good".to_string()]).unwrap();
    preference_ops::set_preference(&conn, user.id, "event_types", &[]).unwrap();
    preference_ops::set_preference(&conn, user.id, "favorite_color", &["teal".to_string()]).unwrap();

    let prefs = preference_queries::resolved(&conn, user.id).unwrap();
    assert_eq!(prefs.sentiments, vec!["good".to_string()]);
    assert_eq!(prefs.event_types, PreferenceKey::EventTypes.defaults());
    assert_eq!(prefs.interaction_types, PreferenceKey::InteractionTypes.defaults());
    assert_eq!(preference_queries::stored(&conn, user.id).unwrap().len(), 3);
}
