use chrono::{TimeZone, Utc};
use globe::db::*;
use globe::error::PrmError;
use globe::model::*;
use globe::ops::*;

fn setup() -> (rusqlite::Connection, User) {
    let conn = schema::test_connection();
    let user = user_ops::create_user(&conn, "Ada", "ada@example.com").unwrap();
    (conn, user)
}

fn person(conn: &rusqlite::Connection, user: &User, name: &str) -> Person {
    person_ops::add_person(conn, user.id, &PersonDraft::named(name)).unwrap()
}

fn event(conn: &rusqlite::Connection, user: &User) -> Event {
    let mut draft = EventDraft::new(
        "RustConf",
        Utc.with_ymd_and_hms(2026, 9, 10, 9, 0, 0).unwrap(),
        "Seattle",
    );
    draft.coordinates = Some(GeoPoint::new(47.6, -122.3));
    event_ops::add_event(conn, user.id, &draft).unwrap()
}

// ==========================================================================
// USER OPS TESTS
// ==========================================================================

#[test]
fn create_user_issues_token() {
    let (conn, user) = setup();
    assert_eq!(user.api_token.len(), 64);
    assert!(user_repo::find_by_token(&conn, &user.api_token).unwrap().is_some());
}

#[test]
fn create_user_rejects_blank_name() {
    let conn = schema::test_connection();
    assert!(matches!(
        user_ops::create_user(&conn, "  ", ""),
        Err(PrmError::BlankField { .. })
    ));
}

// ==========================================================================
// PERSON OPS TESTS
// ==========================================================================

#[test]
fn add_person_trims_and_normalizes() {
    let (conn, user) = setup();
    let mut draft = PersonDraft::named("  Alice  ");
    draft.contact_info.email = Some(" alice@example.com ".into());
    draft.contact_info.phone = Some("   ".into());
    draft.notes = Some("".into());

    let person = person_ops::add_person(&conn, user.id, &draft).unwrap();
    assert_eq!(person.name, "Alice");
    assert_eq!(person.contact_info.email.as_deref(), Some("alice@example.com"));
    assert_eq!(person.contact_info.phone, None);
    assert_eq!(person.notes, None);
}

#[test]
fn add_person_rejects_blank_name() {
    let (conn, user) = setup();
    let result = person_ops::add_person(&conn, user.id, &PersonDraft::named(""));
    assert!(matches!(result, Err(PrmError::BlankField { .. })));
}

#[test]
fn add_person_rejects_out_of_range_coordinates() {
    let (conn, user) = setup();
    let mut draft = PersonDraft::named("Alice");
    draft.coordinates = Some(GeoPoint::new(91.0, 0.0));
    let result = person_ops::add_person(&conn, user.id, &draft);
    assert!(matches!(result, Err(PrmError::InvalidCoordinates { .. })));
}

#[test]
fn add_person_links_organizations_once() {
    let (conn, user) = setup();
    let acme = organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Acme"))
        .unwrap();

    let mut draft = PersonDraft::named("Alice");
    draft.organizations = Some(vec![
        OrganizationLink {
            organization_id: acme.id,
            role: Some(" Engineer ".into()),
        },
        OrganizationLink::new(acme.id),
    ]);
    let person = person_ops::add_person(&conn, user.id, &draft).unwrap();

    assert_eq!(person.organizations.len(), 1);
    assert_eq!(person.organizations[0].role.as_deref(), Some("Engineer"));
    assert!(person.belongs_to(acme.id));
}

#[test]
fn add_person_refuses_someone_elses_organization() {
    let (conn, user) = setup();
    let stranger = user_ops::create_user(&conn, "Grace", "").unwrap();
    let theirs =
        organization_ops::add_organization(&conn, stranger.id, &OrganizationDraft::named("Navy"))
            .unwrap();

    let mut draft = PersonDraft::named("Alice");
    draft.organizations = Some(vec![OrganizationLink::new(theirs.id)]);
    let result = person_ops::add_person(&conn, user.id, &draft);

    assert!(matches!(result, Err(PrmError::NotFound { .. })));
    assert!(person_repo::find_by_owner(&conn, user.id).unwrap().is_empty());
}

#[test]
fn update_person_without_org_list_keeps_links() {
    let (conn, user) = setup();
    let acme = organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Acme"))
        .unwrap();
    let mut draft = PersonDraft::named("Alice");
    draft.organizations = Some(vec![OrganizationLink::new(acme.id)]);
    let person = person_ops::add_person(&conn, user.id, &draft).unwrap();

    let renamed = person_ops::update_person(&conn, user.id, person.id, &PersonDraft::named("Alicia"))
        .unwrap();
    assert_eq!(renamed.name, "Alicia");
    assert_eq!(renamed.organizations.len(), 1);

    let mut clear = PersonDraft::from_person(&renamed);
    clear.organizations = Some(Vec::new());
    let cleared = person_ops::update_person(&conn, user.id, person.id, &clear).unwrap();
    assert!(cleared.organizations.is_empty());
}

#[test]
fn update_person_not_found() {
    let (conn, user) = setup();
    let result = person_ops::update_person(&conn, user.id, Id::generate(), &PersonDraft::named("X"));
    assert!(matches!(result, Err(PrmError::NotFound { .. })));
}

#[test]
fn delete_person_twice_fails() {
    let (conn, user) = setup();
    let alice = person(&conn, &user, "Alice");
    person_ops::delete_person(&conn, user.id, alice.id).unwrap();
    assert!(matches!(
        person_ops::delete_person(&conn, user.id, alice.id),
        Err(PrmError::NotFound { .. })
    ));
}

// ==========================================================================
// ORGANIZATION OPS TESTS
// ==========================================================================

#[test]
fn duplicate_organization_name_rejected() {
    let (conn, user) = setup();
    organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Acme")).unwrap();
    let result = organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named(" acme "));
    assert!(matches!(result, Err(PrmError::AlreadyExists { .. })));
}

#[test]
fn update_organization_may_keep_its_own_name() {
    let (conn, user) = setup();
    let org = organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Acme"))
        .unwrap();

    let mut draft = OrganizationDraft::named("ACME");
    draft.industry = Some("Rockets".into());
    let updated = organization_ops::update_organization(&conn, user.id, org.id, &draft).unwrap();
    assert_eq!(updated.name, "ACME");
    assert_eq!(updated.industry.as_deref(), Some("Rockets"));
}

#[test]
fn rename_into_existing_organization_rejected() {
    let (conn, user) = setup();
    organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Acme")).unwrap();
    let beta = organization_ops::add_organization(&conn, user.id, &OrganizationDraft::named("Beta"))
        .unwrap();
    let result =
        organization_ops::update_organization(&conn, user.id, beta.id, &OrganizationDraft::named("Acme"));
    assert!(matches!(result, Err(PrmError::AlreadyExists { .. })));
}

// ==========================================================================
// EVENT OPS TESTS
// ==========================================================================

#[test]
fn event_end_before_start_rejected() {
    let (conn, user) = setup();
    let start = Utc.with_ymd_and_hms(2026, 9, 10, 9, 0, 0).unwrap();
    let mut draft = EventDraft::new("RustConf", start, "Seattle");
    draft.end_date = Some(start - chrono::Duration::hours(1));
    assert!(matches!(
        event_ops::add_event(&conn, user.id, &draft),
        Err(PrmError::InvalidDateRange { .. })
    ));
}

#[test]
fn event_requires_location_name() {
    let (conn, user) = setup();
    let draft = EventDraft::new("RustConf", Utc::now(), "  ");
    assert!(matches!(
        event_ops::add_event(&conn, user.id, &draft),
        Err(PrmError::BlankField { .. })
    ));
}

#[test]
fn update_event_replaces_fields() {
    let (conn, user) = setup();
    let original = event(&conn, &user);
    let mut draft = EventDraft::new("RustConf 2026", original.date, "Seattle, WA");
    draft.event_type = Some("conference".into());

    let updated = event_ops::update_event(&conn, user.id, original.id, &draft).unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.name, "RustConf 2026");
    assert_eq!(updated.event_type.as_deref(), Some("conference"));
}

// ==========================================================================
// INTERACTION OPS TESTS
// ==========================================================================

#[test]
fn log_interaction_requires_owned_person() {
    let (conn, user) = setup();
    let draft = InteractionDraft::new(Id::generate(), Utc::now(), "call");
    assert!(matches!(
        interaction_ops::log_interaction(&conn, user.id, &draft),
        Err(PrmError::NotFound { .. })
    ));
}

#[test]
fn log_interaction_rejects_blank_type() {
    let (conn, user) = setup();
    let alice = person(&conn, &user, "Alice");
    let draft = InteractionDraft::new(alice.id, Utc::now(), " ");
    assert!(matches!(
        interaction_ops::log_interaction(&conn, user.id, &draft),
        Err(PrmError::BlankField { .. })
    ));
}

#[test]
fn log_batch_is_all_or_nothing() {
    let (conn, user) = setup();
    let alice = person(&conn, &user, "Alice");
    let drafts = vec![
        InteractionDraft::new(alice.id, Utc::now(), "call"),
        InteractionDraft::new(Id::generate(), Utc::now(), "call"),
    ];

    assert!(interaction_ops::log_batch(&conn, user.id, &drafts).is_err());
    assert_eq!(interaction_repo::count_by_owner(&conn, user.id).unwrap(), 0);
}

#[test]
fn log_batch_rejects_empty() {
    let (conn, user) = setup();
    assert!(matches!(
        interaction_ops::log_batch(&conn, user.id, &[]),
        Err(PrmError::EmptySet { .. })
    ));
}

#[test]
fn batch_for_event_copies_date_and_place() {
    let (conn, user) = setup();
    let alice = person(&conn, &user, "Alice");
    let bob = person(&conn, &user, "Bob");
    let conf = event(&conn, &user);

    let rows = vec![
        EventAttendance::new(alice.id),
        EventAttendance {
            person_id: None,
            interaction_type: "met".into(),
            sentiment: None,
            notes: Some("forgot their name".into()),
        },
        EventAttendance {
            sentiment: Some("positive".into()),
            ..EventAttendance::new(bob.id)
        },
    ];
    let logged = interaction_ops::log_batch_for_event(&conn, user.id, conf.id, &rows).unwrap();

    assert_eq!(logged.len(), 2);
    for interaction in &logged {
        assert_eq!(interaction.event_id, Some(conf.id));
        assert_eq!(interaction.date, conf.date);
        assert_eq!(interaction.location_name.as_deref(), Some("Seattle"));
        assert_eq!(interaction.coordinates, conf.coordinates);
        assert_eq!(interaction.interaction_type, DEFAULT_INTERACTION_TYPE);
    }
    assert_eq!(logged[1].sentiment.as_deref(), Some("positive"));
}

#[test]
fn batch_for_event_without_people_fails() {
    let (conn, user) = setup();
    let conf = event(&conn, &user);
    let rows = vec![EventAttendance {
        person_id: None,
        interaction_type: "met".into(),
        sentiment: None,
        notes: None,
    }];
    assert!(matches!(
        interaction_ops::log_batch_for_event(&conn, user.id, conf.id, &rows),
        Err(PrmError::EmptySet { .. })
    ));
}

#[test]
fn batch_for_unknown_event_fails() {
    let (conn, user) = setup();
    let alice = person(&conn, &user, "Alice");
    let result = interaction_ops::log_batch_for_event(
        &conn,
        user.id,
        Id::generate(),
        &[EventAttendance::new(alice.id)],
    );
    assert!(matches!(result, Err(PrmError::NotFound { .. })));
}

#[test]
fn update_interaction_keeps_identity() {
    let (conn, user) = setup();
    let alice = person(&conn, &user, "Alice");
    let logged = interaction_ops::log_interaction(
        &conn,
        user.id,
        &InteractionDraft::new(alice.id, Utc::now(), "call"),
    )
    .unwrap();

    let mut draft = InteractionDraft::new(alice.id, logged.date, "email");
    draft.notes = Some("followed up".into());
    let updated = interaction_ops::update_interaction(&conn, user.id, logged.id, &draft).unwrap();

    assert_eq!(updated.id, logged.id);
    assert_eq!(updated.created_at, logged.created_at);
    let stored = interaction_repo::find_by_id(&conn, user.id, logged.id).unwrap().unwrap();
    assert_eq!(stored.interaction_type, "email");
    assert_eq!(stored.notes.as_deref(), Some("followed up"));
}

#[test]
fn delete_unknown_interaction_fails() {
    let (conn, user) = setup();
    assert!(matches!(
        interaction_ops::delete_interaction(&conn, user.id, Id::generate()),
        Err(PrmError::NotFound { .. })
    ));
}

// ==========================================================================
// PREFERENCE OPS TESTS
// ==========================================================================

#[test]
fn set_preference_cleans_values() {
    let (conn, user) = setup();
    let values: Vec<String> = vec![" coffee ".into(), "".into(), "Coffee".into(), "lunch".into()];
    let pref = preference_ops::set_preference(&conn, user.id, "interaction_types", &values).unwrap();

    assert_eq!(pref.value, vec!["coffee".to_string(), "lunch".to_string()]);
    assert_eq!(
        preference_repo::find(&conn, user.id, "interaction_types").unwrap(),
        Some(pref.value)
    );
}

#[test]
fn set_preference_rejects_blank_key() {
    let (conn, user) = setup();
    assert!(matches!(
        preference_ops::set_preference(&conn, user.id, " ", &[]),
        Err(PrmError::BlankField { .. })
    ));
}

// ==========================================================================
// OWNERSHIP TESTS
// ==========================================================================

fn not_found<T: std::fmt::Debug>(result: Result<T, PrmError>) -> bool {
    matches!(result, Err(PrmError::NotFound { .. }))
}

#[test]
fn other_users_cannot_change_or_delete_rows() {
    let (conn, owner) = setup();
    let stranger = user_ops::create_user(&conn, "Mallory", "").unwrap();

    let alice = person(&conn, &owner, "Alice");
    let acme = organization_ops::add_organization(&conn, owner.id, &OrganizationDraft::named("Acme"))
        .unwrap();
    let conf = event(&conn, &owner);
    let call = interaction_ops::log_interaction(
        &conn,
        owner.id,
        &InteractionDraft::new(alice.id, Utc::now(), "call"),
    )
    .unwrap();

    assert!(not_found(person_ops::update_person(&conn, stranger.id, alice.id, &PersonDraft::named("Eve"))));
    assert!(not_found(person_ops::delete_person(&conn, stranger.id, alice.id)));
    assert!(not_found(organization_ops::update_organization(
        &conn,
        stranger.id,
        acme.id,
        &OrganizationDraft::named("Evil Corp"),
    )));
    assert!(not_found(organization_ops::delete_organization(&conn, stranger.id, acme.id)));
    assert!(not_found(event_ops::update_event(
        &conn,
        stranger.id,
        conf.id,
        &EventDraft::new("Hijacked", conf.date, "Elsewhere"),
    )));
    assert!(not_found(event_ops::delete_event(&conn, stranger.id, conf.id)));
    assert!(not_found(interaction_ops::update_interaction(
        &conn,
        stranger.id,
        call.id,
        &InteractionDraft::new(alice.id, call.date, "email"),
    )));
    assert!(not_found(interaction_ops::delete_interaction(&conn, stranger.id, call.id)));
    assert!(not_found(interaction_ops::log_batch_for_event(
        &conn,
        stranger.id,
        conf.id,
        &[EventAttendance::new(alice.id)],
    )));

    let alice_now = person_repo::find_by_id(&conn, owner.id, alice.id).unwrap().unwrap();
    assert_eq!(alice_now.name, "Alice");
    let acme_now = organization_repo::find_by_id(&conn, owner.id, acme.id).unwrap().unwrap();
    assert_eq!(acme_now.name, "Acme");
    let conf_now = event_repo::find_by_id(&conn, owner.id, conf.id).unwrap().unwrap();
    assert_eq!(conf_now.name, "RustConf");
    let call_now = interaction_repo::find_by_id(&conn, owner.id, call.id).unwrap().unwrap();
    assert_eq!(call_now.interaction_type, "call");
}

#[test]
fn cannot_log_against_someone_elses_person_or_event() {
    let (conn, owner) = setup();
    let stranger = user_ops::create_user(&conn, "Mallory", "").unwrap();
    let alice = person(&conn, &owner, "Alice");
    let conf = event(&conn, &owner);
    let mallorys_friend = person(&conn, &stranger, "Trent");

    let own_person = InteractionDraft::new(alice.id, Utc::now(), "call");
    assert!(not_found(interaction_ops::log_interaction(&conn, stranger.id, &own_person)));

    let mut foreign_event = InteractionDraft::new(mallorys_friend.id, Utc::now(), "met");
    foreign_event.event_id = Some(conf.id);
    assert!(not_found(interaction_ops::log_interaction(&conn, stranger.id, &foreign_event)));
    assert_eq!(interaction_repo::count_by_owner(&conn, stranger.id).unwrap(), 0);
}
