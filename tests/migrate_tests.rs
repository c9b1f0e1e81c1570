use std::io::Write;

use chrono::{TimeZone, Utc};
use globe::db::*;
use globe::migrate::{self, ImportStats};
use globe::model::*;
use globe::ops::user_ops;
use globe::queries::{interaction_queries, person_queries};

const PROFILES: &str = r#"[
    {"id": 1, "name": "Alice", "location": [37.77, -122.42], "met_at": "RustConf",
     "met_on": "2025-09-10", "notes": "Works on compilers", "tags": ["rust", "Rust", "llvm"]},
    {"id": 2, "name": "Bob", "location": [200.0, 10.0]},
    {"id": 3, "name": "   "},
    {"id": 4, "location": [1.0, 2.0]}
]"#;

fn setup() -> (rusqlite::Connection, User) {
    let conn = schema::test_connection();
    let user = user_ops::create_user(&conn, "Ada", "").unwrap();
    (conn, user)
}

#[test]
fn import_creates_people_and_met_interactions() {
    let (conn, user) = setup();
    let stats = migrate::import_profiles_json(&conn, user.id, PROFILES).unwrap();
    assert_eq!(
        stats,
        ImportStats {
            people: 2,
            interactions: 1,
            skipped: 2,
        }
    );

    let alice = &person_queries::find_by_name(&conn, user.id, "alice").unwrap()[0];
    assert_eq!(alice.coordinates, Some(GeoPoint::new(37.77, -122.42)));
    assert_eq!(
        alice.notes.as_deref(),
        Some("Works on compilers\n\nTags: rust, llvm")
    );

    let history = interaction_queries::history(&conn, user.id, alice.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].interaction_type, "met");
    assert_eq!(history[0].location_name.as_deref(), Some("RustConf"));
    assert_eq!(history[0].date, Utc.with_ymd_and_hms(2025, 9, 10, 0, 0, 0).unwrap());
}

#[test]
fn import_drops_invalid_coordinates_but_keeps_person() {
    let (conn, user) = setup();
    migrate::import_profiles_json(&conn, user.id, PROFILES).unwrap();
    let bob = &person_queries::find_by_name(&conn, user.id, "bob").unwrap()[0];
    assert_eq!(bob.coordinates, None);
    assert_eq!(bob.notes, None);
}

#[test]
fn import_reads_file() {
    let (conn, user) = setup();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROFILES.as_bytes()).unwrap();

    let stats = migrate::import_profiles(&conn, user.id, file.path()).unwrap();
    assert_eq!(stats.people, 2);
    assert_eq!(interaction_repo::count_by_owner(&conn, user.id).unwrap(), 1);
}

#[test]
fn import_rejects_non_array() {
    let (conn, user) = setup();
    assert!(migrate::import_profiles_json(&conn, user.id, r#"{"name": "Alice"}"#).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let (conn, user) = setup();
    let dir = tempfile::tempdir().unwrap();
    assert!(migrate::import_profiles(&conn, user.id, &dir.path().join("nope.json")).is_err());
}
